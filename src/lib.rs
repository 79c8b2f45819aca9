// In: src/lib.rs

//! Pokemon Phase Engine
//!
//! The turn scheduler of a Pokemon battle: a tree of phases that drives one
//! battle step by step, speed-ordered queues for the phases whose order is only
//! known when they run, and the runner that starts and ends them.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod config;
pub mod errors;
pub mod logging;
pub mod phase;
pub mod pokemon;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    BattlerIndex, Move, MoveData, MoveEffect, MoveTarget, Side, StatType, StatusCondition,
};

// --- From this crate's modules (`src/`) ---

// Driving a battle.
pub use battle::commands::{TurnCommand, TurnCommands};
pub use battle::field::Field;
pub use battle::runner::{BattleRunner, StepOutcome};
pub use battle::state::{BattleContext, BattleEvent, EventBus};

// The scheduler.
pub use phase::manager::{PhaseManager, When};
pub use phase::tree::PhaseTree;
pub use phase::{MovePhase, Phase, PhaseKind, PhaseStatus, TimingModifier};

pub use config::EngineConfig;
pub use pokemon::Combatant;

// Crate-specific error and result types.
pub use errors::{CommandError, ConfigError, ConfigResult, EngineError, EngineResult};
