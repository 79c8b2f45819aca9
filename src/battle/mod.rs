pub mod commands;
pub mod field;
pub mod rng;
pub mod runner;
pub mod speed_order;
pub mod state;
pub mod stats;

#[cfg(test)]
mod tests;
