#[cfg(test)]
mod tests {
    use crate::battle::commands::TurnCommand;
    use crate::battle::runner::StepOutcome;
    use crate::battle::state::BattleEvent;
    use crate::battle::tests::common::{
        create_single_battle, create_test_runner, play_turn, test_config, TestCombatantBuilder,
    };
    use crate::phase::{Phase, PhaseKind, PostSummonPhase};
    use pretty_assertions::assert_eq;
    use schema::{BattlerIndex, Move, Side};

    fn entered(events: &[BattleEvent]) -> Vec<BattlerIndex> {
        events
            .iter()
            .filter_map(|event| match event {
                BattleEvent::EnteredBattle { battler, .. } => Some(*battler),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_post_summon_resolves_fastest_first_at_marker_positions() {
        let player = TestCombatantBuilder::new("Bulbasaur", 20).build();
        let enemy = TestCombatantBuilder::new("Pikachu", 80).build();
        let mut runner = create_single_battle(player, enemy);

        let phases = &mut runner.context_mut().phases;
        phases.unshift_phase(PostSummonPhase { battler: BattlerIndex::Player }.into());
        phases.unshift_phase(Phase::message("between"));
        phases.unshift_phase(PostSummonPhase { battler: BattlerIndex::Enemy }.into());

        assert_eq!(runner.step(), StepOutcome::Completed(PhaseKind::PostSummon));
        assert_eq!(runner.step(), StepOutcome::Completed(PhaseKind::Message));
        assert_eq!(runner.step(), StepOutcome::Completed(PhaseKind::PostSummon));

        let events = runner.take_events();
        assert_eq!(
            events,
            vec![
                BattleEvent::EnteredBattle {
                    battler: BattlerIndex::Enemy,
                    pokemon: "Pikachu".to_string()
                },
                BattleEvent::Message {
                    text: "between".to_string()
                },
                BattleEvent::EnteredBattle {
                    battler: BattlerIndex::Player,
                    pokemon: "Bulbasaur".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_simultaneous_switches_run_in_command_speed_order() {
        let mut runner = create_test_runner(
            vec![
                (BattlerIndex::Player, TestCombatantBuilder::new("Jolteon", 100).build()),
                (BattlerIndex::Enemy, TestCombatantBuilder::new("Slowbro", 20).build()),
            ],
            vec![
                (Side::Player, TestCombatantBuilder::new("Snorlax", 30).build()),
                (Side::Enemy, TestCombatantBuilder::new("Aerodactyl", 150).build()),
            ],
            test_config(false),
        );

        let events = play_turn(
            &mut runner,
            vec![
                (BattlerIndex::Player, TurnCommand::Switch { bench_slot: 0 }),
                (BattlerIndex::Enemy, TurnCommand::Switch { bench_slot: 0 }),
            ],
        );

        let sent_out: Vec<String> = events
            .iter()
            .filter_map(|event| match event {
                BattleEvent::PokemonSentOut { pokemon, .. } => Some(pokemon.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(sent_out, vec!["Snorlax".to_string(), "Aerodactyl".to_string()]);
        assert_eq!(entered(&events), vec![BattlerIndex::Player, BattlerIndex::Enemy]);
        assert_eq!(runner.context().field.bench(Side::Player)[0].name, "Jolteon");
    }

    #[test]
    fn test_switch_happens_before_any_move() {
        let mut runner = create_test_runner(
            vec![
                (BattlerIndex::Player, TestCombatantBuilder::new("Abra", 20).build()),
                (BattlerIndex::Enemy, TestCombatantBuilder::new("Scyther", 105).build()),
            ],
            vec![(Side::Player, TestCombatantBuilder::new("Geodude", 20).build())],
            test_config(false),
        );

        let events = play_turn(
            &mut runner,
            vec![
                (BattlerIndex::Player, TurnCommand::Switch { bench_slot: 0 }),
                (BattlerIndex::Enemy, TurnCommand::fight(Move::Tackle)),
            ],
        );

        let sent_out = events
            .iter()
            .position(|e| matches!(e, BattleEvent::PokemonSentOut { .. }));
        let attacked = events
            .iter()
            .position(|e| matches!(e, BattleEvent::DamageDealt { .. }));
        assert!(sent_out < attacked);
        assert!(events.contains(&BattleEvent::DamageDealt {
            target: BattlerIndex::Player,
            pokemon: "Geodude".to_string(),
            damage: 40,
            remaining_hp: 60,
        }));
    }

    #[test]
    fn test_move_markers_drain_with_the_turn() {
        let mut runner = create_single_battle(
            TestCombatantBuilder::new("Pikachu", 90).build(),
            TestCombatantBuilder::new("Geodude", 20).build(),
        );

        play_turn(
            &mut runner,
            vec![
                (BattlerIndex::Player, TurnCommand::fight(Move::Recover)),
                (BattlerIndex::Enemy, TurnCommand::fight(Move::Recover)),
            ],
        );

        let phases = &runner.context().phases;
        assert!(phases.tree().is_empty());
        assert!(!phases.has_move_phase(|_| true));
        assert!(!phases.dynamic_queues().has_pending(PhaseKind::PostSummon));
    }
}
