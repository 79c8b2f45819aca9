use crate::battle::field::Field;
use crate::battle::speed_order::SpeedOrderContext;
use crate::phase::dynamic::{DynamicOutcome, DynamicQueueManager};
use crate::phase::move_queue::MoveActionQueue;
use crate::phase::tree::PhaseTree;
use crate::phase::{MovePhase, Phase, PhaseKind, PostSummonPhase, TimingModifier};
use schema::{BattlerIndex, Move};

/// When a multi-phase sequence (switching, entrances) should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum When {
    /// As soon as the running phase finishes.
    Eager,
    /// After the move currently being executed has fully ended.
    Deferred,
    /// After everything already queued, i.e. at the end of the turn.
    Delayed,
}

/// The phase tree together with the dynamic queues, as one API for phases to
/// schedule work through.
#[derive(Debug, Clone, Default)]
pub struct PhaseManager {
    phase_queue: PhaseTree,
    dynamic_queue_manager: DynamicQueueManager,
}

impl PhaseManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tree(&self) -> &PhaseTree {
        &self.phase_queue
    }

    pub fn dynamic_queues(&self) -> &DynamicQueueManager {
        &self.dynamic_queue_manager
    }

    /// Dynamic phases go to their queue and leave a marker in their place.
    fn check_dynamic(&mut self, phase: Phase) -> Phase {
        match self.dynamic_queue_manager.queue_dynamic_phase(phase) {
            DynamicOutcome::Deferred(phase_type) => Phase::DynamicMarker { phase_type },
            DynamicOutcome::Immediate(phase) => phase,
        }
    }

    /// Queue `phase` after everything currently pending.
    pub fn push_phase(&mut self, phase: Phase) {
        let phase = self.check_dynamic(phase);
        self.phase_queue.push_to_root(phase);
    }

    /// Queue `phase` to run once the running phase ends, after anything it
    /// already queued. New move uses wait for the next pending `MoveEnd`.
    pub fn unshift_phase(&mut self, phase: Phase) {
        let is_move = phase.is(PhaseKind::Move);
        let phase = self.check_dynamic(phase);
        if is_move {
            self.phase_queue.add_after(phase, PhaseKind::MoveEnd);
        } else {
            self.phase_queue.add_phase(phase, false);
        }
    }

    /// Queue `phase` one level below the running phase's children, so it runs
    /// before any of them.
    pub fn add_nested(&mut self, phase: Phase) {
        let phase = self.check_dynamic(phase);
        self.phase_queue.add_phase(phase, true);
    }

    /// Next phase to run. An exhausted tree means the turn is over: the dynamic
    /// queues are reset and a fresh `TurnInit` starts the next one.
    pub fn shift_phase(&mut self, speed: &SpeedOrderContext<'_>) -> Phase {
        match self
            .phase_queue
            .get_next_phase(&mut self.dynamic_queue_manager, speed)
        {
            Some(phase) => phase,
            None => {
                self.dynamic_queue_manager.clear_queues();
                Phase::TurnInit
            }
        }
    }

    pub fn has_phase_of_type(&self, kind: PhaseKind) -> bool {
        if DynamicQueueManager::is_dynamic_kind(kind) {
            return self.dynamic_queue_manager.has_pending(kind);
        }
        self.phase_queue.exists(kind)
    }

    /// First pending phase of `kind` matching `predicate`. Move and PostSummon
    /// entries are looked up in their dynamic queue, not through their markers.
    pub fn find_phase(&self, kind: PhaseKind, predicate: impl Fn(&Phase) -> bool) -> Option<Phase> {
        if DynamicQueueManager::is_dynamic_kind(kind) {
            return self.dynamic_queue_manager.find_phase(kind, predicate);
        }
        self.phase_queue.find_where(kind, predicate).cloned()
    }

    pub fn has_phase_where(&self, kind: PhaseKind, predicate: impl Fn(&Phase) -> bool) -> bool {
        self.find_phase(kind, predicate).is_some()
    }

    pub fn try_remove_phase(&mut self, kind: PhaseKind, predicate: impl Fn(&Phase) -> bool) -> bool {
        if DynamicQueueManager::is_dynamic_kind(kind) {
            return self.dynamic_queue_manager.remove_phase(kind, predicate).is_some();
        }
        self.phase_queue.remove_where(kind, predicate).is_some()
    }

    pub fn remove_all_phases_of_type(&mut self, kind: PhaseKind) -> usize {
        self.phase_queue.remove_all(kind)
    }

    /// Queue a message as the running phase's next child, or behind everything
    /// pending when `defer` is set.
    pub fn queue_message(&mut self, text: impl Into<String>, defer: bool) {
        let phase = Phase::message(text);
        if defer {
            self.push_phase(phase);
        } else {
            self.phase_queue.add_phase(phase, false);
        }
    }

    pub fn queue_faint_phase(&mut self, battler: BattlerIndex) {
        if self
            .phase_queue
            .exists_where(PhaseKind::Faint, |p| p.battler() == Some(battler))
        {
            return;
        }
        self.add_nested(Phase::Faint { battler });
    }

    pub fn queue_turn_end_phases(&mut self) {
        self.push_phase(Phase::WeatherEffect);
        self.push_phase(Phase::CheckStatusEffect);
        self.push_phase(Phase::TurnEnd {
            upcoming_interlude: false,
        });
    }

    /// Skip this turn's end-of-turn effects and flag the pending `TurnEnd`.
    pub fn on_interlude(&mut self) {
        self.phase_queue.remove_all(PhaseKind::WeatherEffect);
        self.phase_queue.remove_all(PhaseKind::CheckStatusEffect);
        self.phase_queue.remove_all(PhaseKind::PostTurnStatusEffect);
        if let Some(Phase::TurnEnd { upcoming_interlude }) =
            self.phase_queue.find_mut(PhaseKind::TurnEnd, |_| true)
        {
            *upcoming_interlude = true;
        }
    }

    /// Recall `battler` and send in the benched combatant at `bench_slot`.
    pub fn queue_battler_switch_out(&mut self, battler: BattlerIndex, bench_slot: usize, when: When) {
        self.queue_sequence(
            vec![
                Phase::Recall { battler },
                Phase::Switch { battler, bench_slot },
                PostSummonPhase { battler }.into(),
            ],
            when,
        );
    }

    /// Send the benched combatant at `bench_slot` into an empty `battler` slot.
    pub fn queue_battler_entrance(&mut self, battler: BattlerIndex, bench_slot: usize, when: When) {
        self.queue_sequence(
            vec![
                Phase::Switch { battler, bench_slot },
                PostSummonPhase { battler }.into(),
            ],
            when,
        );
    }

    fn queue_sequence(&mut self, phases: Vec<Phase>, when: When) {
        match when {
            When::Eager => phases.into_iter().for_each(|p| self.unshift_phase(p)),
            When::Delayed => phases.into_iter().for_each(|p| self.push_phase(p)),
            When::Deferred if self.phase_queue.exists(PhaseKind::MoveEnd) => {
                // Each insertion lands directly behind the MoveEnd, so go backwards.
                for phase in phases.into_iter().rev() {
                    let phase = self.check_dynamic(phase);
                    self.phase_queue.add_after(phase, PhaseKind::MoveEnd);
                }
            }
            When::Deferred => phases.into_iter().for_each(|p| self.unshift_phase(p)),
        }
    }

    /// Drop every pending phase and every dynamic entry.
    pub fn clear_all_phases(&mut self) {
        self.phase_queue.clear();
        self.dynamic_queue_manager.clear_queues();
    }

    /// Like [`PhaseManager::clear_all_phases`], but the running phase's own
    /// children survive.
    pub fn clear_all_phases_leaving_current(&mut self) {
        self.phase_queue.clear_leaving_current();
        self.dynamic_queue_manager.clear_queues();
    }

    fn move_queue_mut(&mut self) -> &mut MoveActionQueue {
        self.dynamic_queue_manager.move_queue_mut()
    }

    pub fn get_move_phase(&self, predicate: impl Fn(&MovePhase) -> bool) -> Option<&MovePhase> {
        self.dynamic_queue_manager.move_queue().find(predicate)
    }

    pub fn has_move_phase(&self, predicate: impl Fn(&MovePhase) -> bool) -> bool {
        self.dynamic_queue_manager.has_move_phase(predicate)
    }

    pub fn cancel_move(&mut self, predicate: impl Fn(&MovePhase) -> bool) -> bool {
        self.move_queue_mut().cancel_move(predicate)
    }

    pub fn force_move_next(&mut self, predicate: impl Fn(&MovePhase) -> bool) -> bool {
        self.move_queue_mut()
            .set_timing_modifier(predicate, TimingModifier::First)
    }

    pub fn force_move_last(&mut self, predicate: impl Fn(&MovePhase) -> bool) -> bool {
        self.move_queue_mut()
            .set_timing_modifier(predicate, TimingModifier::Last)
    }

    pub fn change_phase_move(&mut self, predicate: impl Fn(&MovePhase) -> bool, move_used: Move) -> bool {
        self.move_queue_mut().set_move_for_phase(predicate, move_used)
    }

    pub fn redirect_moves(
        &mut self,
        removed: BattlerIndex,
        replacement: BattlerIndex,
        field: &Field,
        double_battle: bool,
    ) -> usize {
        self.move_queue_mut()
            .redirect_moves(removed, replacement, field, double_battle)
    }

    pub fn last_turn_order(&self) -> &[BattlerIndex] {
        self.dynamic_queue_manager.move_queue().get_turn_order()
    }

    pub fn clear_turn_order(&mut self) {
        self.move_queue_mut().clear_turn_order();
    }
}
