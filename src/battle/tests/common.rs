use crate::battle::commands::TurnCommand;
use crate::battle::field::Field;
use crate::battle::runner::{BattleRunner, StepOutcome};
use crate::battle::state::BattleEvent;
use crate::config::EngineConfig;
use crate::errors::CommandError;
use crate::phase::PhaseKind;
use crate::pokemon::Combatant;
use schema::{BattlerIndex, Move, Side, StatusCondition};

/// Battle seed shared by the scenario tests.
pub const TEST_SEED: u64 = 0x5EED;

/// A builder for creating test combatants with common defaults.
///
/// # Example
/// ```ignore
/// let pokemon = TestCombatantBuilder::new("Pikachu", 90)
///     .with_moves(vec![Move::QuickAttack])
///     .with_status(StatusCondition::Paralysis)
///     .build();
/// ```
pub struct TestCombatantBuilder {
    name: String,
    speed: u16,
    max_hp: u16,
    current_hp: Option<u16>,
    moves: Vec<Move>,
    status: Option<StatusCondition>,
    bypass_speed: bool,
}

impl TestCombatantBuilder {
    /// 100 HP and both a damaging move (Tackle) and a move with no
    /// scheduling effect at full HP (Recover).
    pub fn new(name: &str, speed: u16) -> Self {
        Self {
            name: name.to_string(),
            speed,
            max_hp: 100,
            current_hp: None,
            moves: vec![Move::Tackle, Move::Recover],
            status: None,
            bypass_speed: false,
        }
    }

    pub fn with_moves(mut self, moves: Vec<Move>) -> Self {
        self.moves = moves;
        self
    }

    pub fn with_status(mut self, status: StatusCondition) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn with_bypass_speed(mut self) -> Self {
        self.bypass_speed = true;
        self
    }

    pub fn build(self) -> Combatant {
        let mut combatant = Combatant::new(&self.name, self.speed, self.max_hp).with_moves(self.moves);
        combatant.status = self.status;
        combatant.bypass_speed = self.bypass_speed;
        if let Some(hp) = self.current_hp {
            combatant.current_hp = hp;
        }
        combatant
    }
}

pub fn test_config(double_battle: bool) -> EngineConfig {
    EngineConfig {
        battle_seed: Some(TEST_SEED),
        double_battle,
        ..EngineConfig::default()
    }
}

/// A runner with `active` sent out and `bench` waiting on their sides.
pub fn create_test_runner(
    active: Vec<(BattlerIndex, Combatant)>,
    bench: Vec<(Side, Combatant)>,
    config: EngineConfig,
) -> BattleRunner {
    let mut field = Field::new();
    for (battler, combatant) in active {
        field.send_out(battler, combatant);
    }
    for (side, combatant) in bench {
        field.add_to_bench(side, combatant);
    }
    BattleRunner::new(config, field)
}

/// Standard 1v1 battle.
pub fn create_single_battle(player: Combatant, enemy: Combatant) -> BattleRunner {
    create_test_runner(
        vec![(BattlerIndex::Player, player), (BattlerIndex::Enemy, enemy)],
        Vec::new(),
        test_config(false),
    )
}

/// File `commands` and run one turn, returning its events.
pub fn play_turn(runner: &mut BattleRunner, commands: Vec<(BattlerIndex, TurnCommand)>) -> Vec<BattleEvent> {
    for (battler, command) in commands {
        assert_ok(runner.queue_command(battler, command));
    }
    let outcome = runner.run_turn();
    assert!(
        matches!(
            outcome,
            StepOutcome::Completed(PhaseKind::TurnEnd) | StepOutcome::BattleOver
        ),
        "Turn did not finish: {:?}",
        outcome
    );
    runner.take_events()
}

/// Battlers in the order their moves were used.
pub fn move_order(events: &[BattleEvent]) -> Vec<BattlerIndex> {
    events
        .iter()
        .filter_map(|event| match event {
            BattleEvent::MoveUsed { battler, .. } => Some(*battler),
            _ => None,
        })
        .collect()
}

/// The moves used, in order.
pub fn moves_used(events: &[BattleEvent]) -> Vec<(BattlerIndex, Move)> {
    events
        .iter()
        .filter_map(|event| match event {
            BattleEvent::MoveUsed {
                battler, move_used, ..
            } => Some((*battler, *move_used)),
            _ => None,
        })
        .collect()
}

/// Helper function to assert that a Result is Ok and return the value.
pub fn assert_ok<T>(result: Result<T, CommandError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
