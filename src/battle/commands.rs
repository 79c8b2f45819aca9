use crate::battle::field::Field;
use crate::errors::CommandError;
use schema::{BattlerIndex, Move, MoveTarget};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// What a battler chose to do this turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnCommand {
    /// Use a move. Empty `targets` means the move's default target.
    Fight {
        move_used: Move,
        targets: Vec<BattlerIndex>,
    },
    Switch { bench_slot: usize },
    Run,
}

impl TurnCommand {
    pub fn fight(move_used: Move) -> Self {
        TurnCommand::Fight {
            move_used,
            targets: Vec::new(),
        }
    }

    pub fn fight_at(move_used: Move, target: BattlerIndex) -> Self {
        TurnCommand::Fight {
            move_used,
            targets: vec![target],
        }
    }
}

/// Commands collected for the current turn, plus the optional forced turn order.
#[derive(Debug, Clone, Default)]
pub struct TurnCommands {
    commands: BTreeMap<BattlerIndex, TurnCommand>,
    forced_order: Option<Vec<BattlerIndex>>,
}

impl TurnCommands {
    pub fn new(forced_order: Option<Vec<BattlerIndex>>) -> Self {
        Self {
            commands: BTreeMap::new(),
            forced_order,
        }
    }

    /// Validate `command` against the field and file it for `battler`,
    /// replacing any earlier choice.
    pub fn submit(
        &mut self,
        battler: BattlerIndex,
        command: TurnCommand,
        field: &Field,
    ) -> Result<(), CommandError> {
        if let Err(err) = Self::validate(battler, &command, field) {
            warn!("Rejected command for {}: {}", battler, err);
            return Err(err);
        }
        self.commands.insert(battler, command);
        Ok(())
    }

    fn validate(battler: BattlerIndex, command: &TurnCommand, field: &Field) -> Result<(), CommandError> {
        let combatant = field
            .get(battler)
            .ok_or(CommandError::UnknownBattler(battler))?;
        if !combatant.is_active() {
            return Err(CommandError::BattlerNotActive(battler));
        }

        match command {
            TurnCommand::Fight { move_used, .. } => {
                if *move_used != Move::Struggle && !combatant.moves.contains(move_used) {
                    return Err(CommandError::UnknownMove {
                        battler,
                        move_used: *move_used,
                    });
                }
            }
            TurnCommand::Switch { bench_slot } => {
                let available = field
                    .bench(battler.side())
                    .get(*bench_slot)
                    .is_some_and(|c| !c.is_fainted());
                if !available {
                    return Err(CommandError::NoBenchedCombatant {
                        battler,
                        slot: *bench_slot,
                    });
                }
            }
            TurnCommand::Run => {}
        }
        Ok(())
    }

    pub fn get(&self, battler: BattlerIndex) -> Option<&TurnCommand> {
        self.commands.get(&battler)
    }

    pub fn has(&self, battler: BattlerIndex) -> bool {
        self.commands.contains_key(&battler)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BattlerIndex, &TurnCommand)> {
        self.commands.iter().map(|(b, c)| (*b, c))
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn forced_order(&self) -> Option<&[BattlerIndex]> {
        self.forced_order.as_deref()
    }
}

/// Targets for `move_used` when the command named none.
pub fn default_targets(move_used: Move, user: BattlerIndex, field: &Field) -> Vec<BattlerIndex> {
    match move_used.data().target {
        MoveTarget::User => vec![user],
        MoveTarget::Field => Vec::new(),
        MoveTarget::SingleOpponent | MoveTarget::AnyOther => field
            .active_battlers()
            .into_iter()
            .find(|b| b.is_opponent_of(user))
            .into_iter()
            .collect(),
    }
}
