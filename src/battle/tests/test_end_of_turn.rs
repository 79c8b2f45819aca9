#[cfg(test)]
mod tests {
    use crate::battle::commands::TurnCommand;
    use crate::battle::field::{Weather, WeatherType};
    use crate::battle::runner::StepOutcome;
    use crate::battle::state::BattleEvent;
    use crate::battle::tests::common::{
        assert_ok, create_single_battle, create_test_runner, move_order, play_turn, test_config,
        TestCombatantBuilder,
    };
    use crate::phase::PhaseKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{BattlerIndex, Move, Side, StatusCondition};

    fn recover_all() -> Vec<(BattlerIndex, TurnCommand)> {
        vec![
            (BattlerIndex::Player, TurnCommand::fight(Move::Recover)),
            (BattlerIndex::Enemy, TurnCommand::fight(Move::Recover)),
        ]
    }

    fn status_damage_order(events: &[BattleEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|event| match event {
                BattleEvent::StatusDamage { pokemon, .. } => Some(pokemon.clone()),
                _ => None,
            })
            .collect()
    }

    #[rstest]
    #[case("normal speed order", false, vec!["Ninjask", "Grimer"])]
    #[case("trick room", true, vec!["Grimer", "Ninjask"])]
    fn test_status_damage_follows_speed_order(
        #[case] desc: &str,
        #[case] trick_room: bool,
        #[case] expected: Vec<&str>,
    ) {
        let mut config = test_config(false);
        config.overrides.trick_room = trick_room;
        let mut runner = create_test_runner(
            vec![
                (
                    BattlerIndex::Player,
                    TestCombatantBuilder::new("Grimer", 25)
                        .with_status(StatusCondition::Poison)
                        .build(),
                ),
                (
                    BattlerIndex::Enemy,
                    TestCombatantBuilder::new("Ninjask", 160)
                        .with_status(StatusCondition::Burn)
                        .build(),
                ),
            ],
            Vec::new(),
            config,
        );

        let events = play_turn(&mut runner, recover_all());

        assert_eq!(status_damage_order(&events), expected, "{}", desc);
        assert!(events.contains(&BattleEvent::StatusDamage {
            pokemon: "Grimer".to_string(),
            status: StatusCondition::Poison,
            damage: 12,
            remaining_hp: 88,
        }));
    }

    #[test]
    fn test_paralysis_slows_but_does_not_hurt() {
        let player = TestCombatantBuilder::new("Raichu", 110)
            .with_status(StatusCondition::Paralysis)
            .build();
        let enemy = TestCombatantBuilder::new("Sandslash", 65).build();
        let mut runner = create_single_battle(player, enemy);

        let events = play_turn(&mut runner, recover_all());

        // 110 / 4 = 27 effective speed.
        assert_eq!(
            move_order(&events),
            vec![BattlerIndex::Enemy, BattlerIndex::Player]
        );
        assert!(status_damage_order(&events).is_empty());
    }

    #[test]
    fn test_status_faint_ends_the_battle() {
        let player = TestCombatantBuilder::new("Weedle", 50)
            .with_status(StatusCondition::Poison)
            .with_hp(10)
            .build();
        let enemy = TestCombatantBuilder::new("Koffing", 35).build();
        let mut runner = create_single_battle(player, enemy);

        let events = play_turn(
            &mut runner,
            vec![
                (BattlerIndex::Player, TurnCommand::fight(Move::Tackle)),
                (BattlerIndex::Enemy, TurnCommand::fight(Move::Recover)),
            ],
        );

        assert!(events.contains(&BattleEvent::PokemonFainted {
            battler: BattlerIndex::Player,
            pokemon: "Weedle".to_string(),
        }));
        assert_eq!(
            events.last(),
            Some(&BattleEvent::BattleEnded {
                winner: Some(Side::Enemy)
            })
        );
        assert!(runner.is_battle_over());
    }

    #[test]
    fn test_interlude_skips_end_of_turn_effects() {
        let player = TestCombatantBuilder::new("Grimer", 25)
            .with_status(StatusCondition::Poison)
            .build();
        let enemy = TestCombatantBuilder::new("Staryu", 85).build();
        let mut runner = create_single_battle(player, enemy);
        runner.context_mut().field.weather = Some(Weather {
            weather_type: WeatherType::Rain,
            turns_remaining: 1,
        });
        for (battler, command) in recover_all() {
            assert_ok(runner.queue_command(battler, command));
        }

        loop {
            if runner.step() == StepOutcome::Completed(PhaseKind::TurnStart) {
                break;
            }
        }
        runner.context_mut().phases.on_interlude();
        assert_eq!(runner.run_turn(), StepOutcome::Completed(PhaseKind::TurnEnd));

        let events = runner.take_events();
        assert!(status_damage_order(&events).is_empty());
        assert!(!events
            .iter()
            .any(|e| matches!(e, BattleEvent::WeatherEnded { .. })));
        assert!(events.contains(&BattleEvent::TurnEnded {
            turn_number: 1,
            upcoming_interlude: true,
        }));
        assert!(runner.context().field.weather.is_some());
    }

    #[test]
    fn test_weather_counts_down_at_turn_end() {
        let mut runner = create_single_battle(
            TestCombatantBuilder::new("Lapras", 60).build(),
            TestCombatantBuilder::new("Psyduck", 55).build(),
        );
        runner.context_mut().field.weather = Some(Weather {
            weather_type: WeatherType::Rain,
            turns_remaining: 2,
        });

        let first = play_turn(&mut runner, recover_all());
        assert!(!first
            .iter()
            .any(|e| matches!(e, BattleEvent::WeatherEnded { .. })));

        let second = play_turn(&mut runner, recover_all());
        assert!(second.contains(&BattleEvent::WeatherEnded {
            weather: WeatherType::Rain
        }));
        assert_eq!(runner.context().field.weather, None);
    }

    #[test]
    fn test_trick_room_lapses_after_five_turns() {
        let mut config = test_config(false);
        config.overrides.trick_room = true;
        let mut runner = create_test_runner(
            vec![
                (BattlerIndex::Player, TestCombatantBuilder::new("Alakazam", 120).build()),
                (BattlerIndex::Enemy, TestCombatantBuilder::new("Slowking", 30).build()),
            ],
            Vec::new(),
            config,
        );

        for turn in 1..=5 {
            let events = play_turn(&mut runner, recover_all());
            assert_eq!(
                move_order(&events),
                vec![BattlerIndex::Enemy, BattlerIndex::Player],
                "turn {}",
                turn
            );
            assert_eq!(events.contains(&BattleEvent::TrickRoomEnded), turn == 5);
        }

        let events = play_turn(&mut runner, recover_all());
        assert_eq!(
            move_order(&events),
            vec![BattlerIndex::Player, BattlerIndex::Enemy]
        );
    }
}
