use clap::Parser;
use pokemon_phase_engine::battle::state::BattleEvent;
use pokemon_phase_engine::{
    logging, BattleRunner, BattlerIndex, Combatant, ConfigResult, EngineConfig, EngineResult,
    Field, Move, PhaseKind, Side, StepOutcome, TurnCommand,
};
use std::path::PathBuf;
use tracing::{info, warn};

/// Play a scripted double battle through the phase scheduler and print what happened.
#[derive(Parser, Debug)]
#[command(name = "pokemon-phase-engine", version)]
struct Cli {
    /// RON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Battle seed; overrides the config file and PHASE_ENGINE_SEED
    #[arg(long)]
    seed: Option<u64>,

    /// Number of turns to play
    #[arg(long, default_value_t = 3)]
    turns: u32,

    /// Start with Trick Room active
    #[arg(long)]
    trick_room: bool,

    /// Print events as JSON instead of battle text
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };
    logging::init(&config.log_filter);

    if let Err(e) = run(config, &cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> ConfigResult<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => {
            let mut config = EngineConfig {
                double_battle: true,
                ..EngineConfig::default()
            };
            config.apply_env()?;
            config
        }
    };
    if let Some(seed) = cli.seed {
        config.battle_seed = Some(seed);
    }
    config.overrides.trick_room |= cli.trick_room;
    Ok(config)
}

fn demo_field(double_battle: bool) -> Field {
    let mut field = Field::new();
    field.send_out(
        BattlerIndex::Player,
        Combatant::new("Jolteon", 130, 65).with_moves(vec![Move::QuickAttack, Move::Agility]),
    );
    field.send_out(
        BattlerIndex::Enemy,
        Combatant::new("Alakazam", 120, 55).with_moves(vec![Move::Recover, Move::Quash]),
    );
    if double_battle {
        field.send_out(
            BattlerIndex::Player2,
            Combatant::new("Snorlax", 30, 160).with_moves(vec![Move::Tackle, Move::Whirlwind]),
        );
        field.send_out(
            BattlerIndex::Enemy2,
            Combatant::new("Golem", 45, 80).with_moves(vec![Move::TrickRoom, Move::Tackle]),
        );
    }
    field.add_to_bench(
        Side::Player,
        Combatant::new("Pikachu", 90, 35).with_moves(vec![Move::Tackle]),
    );
    field.add_to_bench(
        Side::Enemy,
        Combatant::new("Onix", 70, 35).with_moves(vec![Move::Tackle]),
    );
    field
}

/// Each combatant cycles through its move list, one move per turn.
fn scripted_command(runner: &BattleRunner, battler: BattlerIndex) -> TurnCommand {
    let ctx = runner.context();
    let moves = ctx
        .field
        .get(battler)
        .map(|c| c.moves.clone())
        .unwrap_or_default();
    if moves.is_empty() {
        return TurnCommand::fight(Move::Struggle);
    }
    let index = (ctx.turn as usize + battler as usize) % moves.len();
    TurnCommand::fight(moves[index])
}

fn run(config: EngineConfig, cli: &Cli) -> EngineResult<()> {
    let field = demo_field(config.double_battle);
    let mut runner = BattleRunner::new(config, field);
    info!("Seed: {}", runner.context().rng.battle_seed());

    let mut turns_played = 0;
    while turns_played < cli.turns {
        match runner.run_turn() {
            StepOutcome::Suspended(PhaseKind::Command) => {
                let Some(battler) = runner.awaiting_command() else {
                    break;
                };
                let command = scripted_command(&runner, battler);
                runner.submit_command(battler, command)?;
            }
            StepOutcome::Suspended(kind) => {
                warn!("Stopping at a suspended {} phase", kind);
                break;
            }
            StepOutcome::Completed(_) => {
                turns_played += 1;
                print_events(&runner.take_events(), cli.json);
            }
            StepOutcome::BattleOver => break,
        }
    }

    print_events(&runner.take_events(), cli.json);
    Ok(())
}

fn print_events(events: &[BattleEvent], json: bool) {
    if events.is_empty() {
        return;
    }
    if json {
        match serde_json::to_string_pretty(events) {
            Ok(text) => println!("{}", text),
            Err(e) => warn!("Could not serialize events: {}", e),
        }
        return;
    }
    for line in events.iter().filter_map(BattleEvent::format) {
        println!("{}", line);
    }
}
