use schema::{BattlerIndex, Move};
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the Pokemon phase engine.
///
/// Scheduler invariants (ending a phase twice, resolving a marker with no backing
/// queue) are bugs and panic instead of surfacing here.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Error while loading or validating configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Error related to a submitted turn command
    #[error("Command error: {0}")]
    Command(#[from] CommandError),
}

/// Errors related to engine configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// The forced turn order lists a battler more than once
    #[error("Invalid forced turn order: {0}")]
    InvalidForcedOrder(String),
    #[error("Invalid seed override: {0}")]
    InvalidSeed(String),
}

/// Errors related to turn commands submitted to the runner
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("No combatant in slot {0}")]
    UnknownBattler(BattlerIndex),
    #[error("Combatant in slot {0} cannot act")]
    BattlerNotActive(BattlerIndex),
    /// A command was submitted while no command phase was waiting for it
    #[error("Slot {0} is not waiting for a command")]
    NoPendingCommand(BattlerIndex),
    #[error("Slot {battler} has no benched combatant at position {slot}")]
    NoBenchedCombatant { battler: BattlerIndex, slot: usize },
    #[error("Combatant in slot {battler} does not know {move_used}")]
    UnknownMove { battler: BattlerIndex, move_used: Move },
}

/// Type alias for Results using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

/// Type alias for Results using ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_converts_into_engine_error() {
        let err: EngineError = CommandError::BattlerNotActive(BattlerIndex::Enemy).into();
        assert!(matches!(err, EngineError::Command(_)));
        assert_eq!(
            err.to_string(),
            "Command error: Combatant in slot Enemy (left) cannot act"
        );
    }
}
