// Pokemon Phase Engine Schema - Shared type definitions
// This crate contains the core enums that are shared between the scheduler,
// its configuration files and the demo binary.

// Re-export the main types
pub use battler::*;
pub use moves::*;
pub use stats::*;

pub mod battler;
pub mod moves;
pub mod stats;
