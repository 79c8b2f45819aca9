use crate::battle::commands::TurnCommands;
use crate::battle::field::{Field, WeatherType};
use crate::battle::rng::BattleRng;
use crate::battle::speed_order::SpeedOrderContext;
use crate::config::EngineConfig;
use crate::phase::manager::PhaseManager;
use crate::phase::TimingModifier;
use schema::{BattlerIndex, Move, Side, StatType, StatusCondition};
use serde::{Deserialize, Serialize};

/// Number of turns Trick Room lasts when it starts through configuration.
pub const TRICK_ROOM_TURNS: u8 = 5;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn Management
    TurnStarted {
        turn_number: u32,
    },
    TurnEnded {
        turn_number: u32,
        upcoming_interlude: bool,
    },

    // Moves
    MoveUsed {
        battler: BattlerIndex,
        pokemon: String,
        move_used: Move,
    },
    MoveCancelled {
        battler: BattlerIndex,
        pokemon: String,
        move_used: Move,
    },
    MoveFailed {
        pokemon: String,
        move_used: Move,
    },
    NoTarget {
        pokemon: String,
    },
    DamageDealt {
        target: BattlerIndex,
        pokemon: String,
        damage: u16,
        remaining_hp: u16,
    },
    PokemonHealed {
        pokemon: String,
        amount: u16,
        new_hp: u16,
    },
    PokemonFainted {
        battler: BattlerIndex,
        pokemon: String,
    },
    StatStageChanged {
        pokemon: String,
        stat: StatType,
        old_stage: i8,
        new_stage: i8,
    },
    StatusDamage {
        pokemon: String,
        status: StatusCondition,
        damage: u16,
        remaining_hp: u16,
    },

    // Schedule changes
    MoveTimingChanged {
        pokemon: String,
        timing: TimingModifier,
    },
    MoveReplaced {
        pokemon: String,
        move_used: Move,
    },
    MovesRedirected {
        from: BattlerIndex,
        to: BattlerIndex,
        count: usize,
    },

    // Field
    TrickRoomToggled {
        active: bool,
    },
    TrickRoomEnded,
    WeatherEnded {
        weather: WeatherType,
    },

    // Switching
    PokemonRecalled {
        battler: BattlerIndex,
        pokemon: String,
    },
    PokemonSentOut {
        battler: BattlerIndex,
        pokemon: String,
    },
    EnteredBattle {
        battler: BattlerIndex,
        pokemon: String,
    },

    Message {
        text: String,
    },

    // Battle End
    Fled {
        pokemon: String,
    },
    BattleEnded {
        winner: Option<Side>,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable string.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self) -> Option<String> {
        match self {
            BattleEvent::TurnStarted { turn_number } => Some(format!("=== Turn {} ===", turn_number)),
            BattleEvent::TurnEnded { .. } => None,

            BattleEvent::MoveUsed { battler, pokemon, move_used } => Some(format!(
                "{} used {}!",
                Self::format_pokemon(*battler, pokemon),
                move_used
            )),
            BattleEvent::MoveCancelled { .. } => None,
            BattleEvent::MoveFailed { .. } => Some("But it failed!".to_string()),
            BattleEvent::NoTarget { .. } => Some("But there was no target...".to_string()),
            BattleEvent::DamageDealt { target, pokemon, damage, .. } => Some(format!(
                "{} took {} damage!",
                Self::format_pokemon(*target, pokemon),
                damage
            )),
            BattleEvent::PokemonHealed { pokemon, amount, .. } => {
                Some(format!("{} recovered {} HP!", pokemon, amount))
            }
            BattleEvent::PokemonFainted { battler, pokemon } => {
                Some(format!("{} fainted!", Self::format_pokemon(*battler, pokemon)))
            }
            BattleEvent::StatStageChanged { pokemon, stat, old_stage, new_stage } => {
                Some(match new_stage.cmp(old_stage) {
                    std::cmp::Ordering::Greater => format!("{}'s {} rose!", pokemon, stat),
                    std::cmp::Ordering::Less => format!("{}'s {} fell!", pokemon, stat),
                    std::cmp::Ordering::Equal => {
                        format!("{}'s {} won't go any further!", pokemon, stat)
                    }
                })
            }
            BattleEvent::StatusDamage { pokemon, status, damage, .. } => Some(format!(
                "{} is hurt by its {}! ({} damage)",
                pokemon, status, damage
            )),

            BattleEvent::MoveTimingChanged { pokemon, timing } => match timing {
                TimingModifier::First => Some(format!("{} will move next!", pokemon)),
                TimingModifier::Last => Some(format!("{}'s move was postponed!", pokemon)),
                TimingModifier::Normal => None,
            },
            BattleEvent::MoveReplaced { pokemon, move_used } => {
                Some(format!("{} must use {}!", pokemon, move_used))
            }
            BattleEvent::MovesRedirected { .. } => None,

            BattleEvent::TrickRoomToggled { active: true } => {
                Some("The dimensions were twisted!".to_string())
            }
            BattleEvent::TrickRoomToggled { active: false } | BattleEvent::TrickRoomEnded => {
                Some("The twisted dimensions returned to normal!".to_string())
            }
            BattleEvent::WeatherEnded { weather } => Some(match weather {
                WeatherType::Rain => "The rain stopped.".to_string(),
                WeatherType::Sun => "The sunlight faded.".to_string(),
                WeatherType::Sandstorm => "The sandstorm subsided.".to_string(),
            }),

            BattleEvent::PokemonRecalled { battler, pokemon } => {
                Some(format!("{} was withdrawn!", Self::format_pokemon(*battler, pokemon)))
            }
            BattleEvent::PokemonSentOut { battler, pokemon } => {
                Some(format!("{} was sent out!", Self::format_pokemon(*battler, pokemon)))
            }
            BattleEvent::EnteredBattle { .. } => None,

            BattleEvent::Message { text } => Some(text.clone()),

            BattleEvent::Fled { pokemon } => Some(format!("{} got away safely!", pokemon)),
            BattleEvent::BattleEnded { winner } => Some(match winner {
                Some(Side::Player) => "You won the battle!".to_string(),
                Some(Side::Enemy) => "You lost the battle...".to_string(),
                None => "The battle is over.".to_string(),
            }),
        }
    }

    fn format_pokemon(battler: BattlerIndex, name: &str) -> String {
        if battler.is_player() {
            name.to_string()
        } else {
            format!("The opposing {}", name)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Remove and return everything recorded so far.
    pub fn take(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Formatted text of every non-silent event.
    pub fn formatted_lines(&self) -> Vec<String> {
        self.events.iter().filter_map(BattleEvent::format).collect()
    }

    /// Print all events using their formatted text (when available).
    /// Falls back to debug format for silent events.
    pub fn print_formatted(&self) {
        for event in &self.events {
            match event.format() {
                Some(formatted) => println!("  {}", formatted),
                None => println!("  {:?} (silent)", event),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl std::fmt::Display for EventBus {
    /// Shows debug format of all events.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

/// Everything one battle owns. Phases receive it mutably while they run.
#[derive(Debug, Clone)]
pub struct BattleContext {
    pub config: EngineConfig,
    pub field: Field,
    pub rng: BattleRng,
    pub turn: u32,
    pub commands: TurnCommands,
    pub phases: PhaseManager,
    pub events: EventBus,
    pub battle_over: bool,
}

impl BattleContext {
    pub fn new(config: EngineConfig, mut field: Field) -> Self {
        let rng = match config.battle_seed {
            Some(seed) => BattleRng::new(seed),
            None => BattleRng::new_random(),
        };
        if config.overrides.trick_room && !field.is_trick_room_active() {
            field.toggle_trick_room(TRICK_ROOM_TURNS);
        }
        let commands = TurnCommands::new(config.overrides.forced_turn_order.clone());

        Self {
            config,
            field,
            rng,
            turn: 0,
            commands,
            phases: PhaseManager::new(),
            events: EventBus::new(),
            battle_over: false,
        }
    }

    pub fn is_double_battle(&self) -> bool {
        self.config.double_battle
    }

    pub fn speed_context(&self) -> SpeedOrderContext<'_> {
        SpeedOrderContext::new(&self.field, &self.rng, self.turn)
            .with_forced_order(self.commands.forced_order())
    }

    /// Pop the next phase, resolving dynamic markers in current speed order.
    pub fn next_phase(&mut self) -> crate::phase::Phase {
        let speed = SpeedOrderContext::new(&self.field, &self.rng, self.turn)
            .with_forced_order(self.commands.forced_order());
        self.phases.shift_phase(&speed)
    }

    /// `battlers` in this turn's speed order.
    pub fn speed_order(&self, battlers: &[BattlerIndex]) -> Vec<BattlerIndex> {
        crate::battle::speed_order::speed_order_battlers(battlers, &self.speed_context())
    }

    pub fn emit(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    /// Redirect moves aimed at `removed` to its ally, if that ally can take them.
    pub fn redirect_to_ally(&mut self, removed: BattlerIndex) {
        let ally = removed.ally();
        let double = self.is_double_battle();
        let count = self.phases.redirect_moves(removed, ally, &self.field, double);
        if count > 0 {
            self.emit(BattleEvent::MovesRedirected {
                from: removed,
                to: ally,
                count,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pokemon::Combatant;

    #[test]
    fn test_silent_events_return_none() {
        let silent_events = vec![
            BattleEvent::TurnEnded {
                turn_number: 1,
                upcoming_interlude: false,
            },
            BattleEvent::EnteredBattle {
                battler: BattlerIndex::Player,
                pokemon: "Pikachu".to_string(),
            },
            BattleEvent::MoveTimingChanged {
                pokemon: "Pikachu".to_string(),
                timing: TimingModifier::Normal,
            },
        ];

        for event in silent_events {
            assert!(
                event.format().is_none(),
                "Event {:?} should be silent but returned text",
                event
            );
        }
    }

    #[test]
    fn test_event_text_samples() {
        let used = BattleEvent::MoveUsed {
            battler: BattlerIndex::Enemy2,
            pokemon: "Rattata".to_string(),
            move_used: Move::QuickAttack,
        };
        assert_eq!(
            used.format(),
            Some("The opposing Rattata used Quick Attack!".to_string())
        );

        let stat = BattleEvent::StatStageChanged {
            pokemon: "Jolteon".to_string(),
            stat: StatType::Spe,
            old_stage: 0,
            new_stage: 2,
        };
        assert_eq!(stat.format(), Some("Jolteon's Speed rose!".to_string()));

        assert_eq!(
            BattleEvent::TurnStarted { turn_number: 5 }.format(),
            Some("=== Turn 5 ===".to_string())
        );
    }

    #[test]
    fn test_event_bus_take_drains() {
        let mut bus = EventBus::new();
        bus.push(BattleEvent::TurnStarted { turn_number: 1 });
        bus.push(BattleEvent::TrickRoomEnded);
        assert_eq!(bus.formatted_lines().len(), 2);
        assert!(format!("{}", bus).contains("TurnStarted"));

        assert_eq!(bus.take().len(), 2);
        assert!(bus.is_empty());
    }

    #[test]
    fn test_context_applies_overrides() {
        let mut config = EngineConfig::default();
        config.battle_seed = Some(42);
        config.overrides.trick_room = true;
        config.overrides.forced_turn_order = Some(vec![BattlerIndex::Enemy, BattlerIndex::Player]);

        let mut field = Field::new();
        field.send_out(BattlerIndex::Player, Combatant::new("Ninjask", 160, 100));
        field.send_out(BattlerIndex::Enemy, Combatant::new("Shuckle", 5, 100));

        let ctx = BattleContext::new(config, field);
        assert_eq!(ctx.rng.battle_seed(), 42);
        assert_eq!(ctx.field.trick_room_turns, TRICK_ROOM_TURNS);
        assert_eq!(
            ctx.speed_order(&[BattlerIndex::Player, BattlerIndex::Enemy]),
            vec![BattlerIndex::Enemy, BattlerIndex::Player]
        );
    }
}
