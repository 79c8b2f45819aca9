use crate::battle::commands::TurnCommand;
use crate::battle::field::Field;
use crate::battle::state::{BattleContext, BattleEvent};
use crate::config::EngineConfig;
use crate::errors::CommandError;
use crate::phase::{Phase, PhaseKind, PhaseStatus};
use schema::BattlerIndex;
use tracing::debug;

/// Result of one [`BattleRunner::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A phase of this kind started and ended.
    Completed(PhaseKind),
    /// A phase of this kind is waiting for outside input.
    Suspended(PhaseKind),
    BattleOver,
}

/// Drives the phase loop of one battle.
///
/// At most one phase is current at a time. It is started, and unless it
/// suspends, ended before the next one is taken from the tree.
#[derive(Debug)]
pub struct BattleRunner {
    ctx: BattleContext,
    current: Option<Phase>,
    standby: Option<Phase>,
}

impl BattleRunner {
    pub fn new(config: EngineConfig, field: Field) -> Self {
        Self {
            ctx: BattleContext::new(config, field),
            current: None,
            standby: None,
        }
    }

    pub fn context(&self) -> &BattleContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut BattleContext {
        &mut self.ctx
    }

    pub fn current_phase(&self) -> Option<&Phase> {
        self.current.as_ref()
    }

    pub fn is_battle_over(&self) -> bool {
        self.ctx.battle_over
    }

    /// Start the next phase from the tree, unless one is already current.
    pub fn step(&mut self) -> StepOutcome {
        if let Some(phase) = &self.current {
            return StepOutcome::Suspended(phase.kind());
        }
        if self.ctx.battle_over {
            return StepOutcome::BattleOver;
        }

        let phase = self.ctx.next_phase();
        self.start(phase)
    }

    fn start(&mut self, phase: Phase) -> StepOutcome {
        let kind = phase.kind();
        debug!("Start phase {}", kind);

        let status = phase.start(&mut self.ctx);
        self.current = Some(phase);
        match status {
            PhaseStatus::Ended => {
                self.end_current();
                StepOutcome::Completed(kind)
            }
            PhaseStatus::Suspended => StepOutcome::Suspended(kind),
        }
    }

    /// End the current phase. A phase parked by [`BattleRunner::override_phase`]
    /// becomes current again, without being restarted.
    ///
    /// # Panics
    /// When no phase is current, i.e. a phase is ended twice.
    pub fn end_current(&mut self) {
        let Some(phase) = self.current.take() else {
            panic!("end_current called with no phase running");
        };
        debug!("End phase {}", phase.kind());
        if let Some(parked) = self.standby.take() {
            debug!("Resume phase {}", parked.kind());
            self.current = Some(parked);
        }
    }

    /// Step until a phase suspends or the battle ends.
    pub fn run_until_blocked(&mut self) -> StepOutcome {
        loop {
            match self.step() {
                StepOutcome::Completed(_) => continue,
                blocked => return blocked,
            }
        }
    }

    /// Step through one turn: until its `TurnEnd` and anything queued behind
    /// it have run, a phase suspends or the battle ends.
    pub fn run_turn(&mut self) -> StepOutcome {
        let mut turn_ended = false;
        loop {
            if turn_ended && self.ctx.phases.tree().is_empty() {
                return StepOutcome::Completed(PhaseKind::TurnEnd);
            }
            match self.step() {
                StepOutcome::Completed(PhaseKind::TurnEnd) => turn_ended = true,
                StepOutcome::Completed(_) => {}
                blocked => return blocked,
            }
        }
    }

    /// File a command ahead of its `Command` phase.
    pub fn queue_command(&mut self, battler: BattlerIndex, command: TurnCommand) -> Result<(), CommandError> {
        self.ctx.commands.submit(battler, command, &self.ctx.field)
    }

    /// Answer the suspended `Command` phase for `battler` and resume.
    pub fn submit_command(&mut self, battler: BattlerIndex, command: TurnCommand) -> Result<(), CommandError> {
        match &self.current {
            Some(Phase::Command { battler: waiting }) if *waiting == battler => {}
            _ => return Err(CommandError::NoPendingCommand(battler)),
        }
        self.queue_command(battler, command)?;
        self.end_current();
        Ok(())
    }

    /// The battler whose `Command` phase is currently waiting.
    pub fn awaiting_command(&self) -> Option<BattlerIndex> {
        match &self.current {
            Some(Phase::Command { battler }) => Some(*battler),
            _ => None,
        }
    }

    /// Start `phase` right away, parking the current phase until it ends.
    /// Refused (returns false) while another override is already running.
    pub fn override_phase(&mut self, phase: Phase) -> bool {
        if self.standby.is_some() {
            return false;
        }
        self.standby = self.current.take();
        self.start(phase);
        true
    }

    /// Remove and return the events recorded so far.
    pub fn take_events(&mut self) -> Vec<BattleEvent> {
        self.ctx.events.take()
    }
}
