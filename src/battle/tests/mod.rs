#[cfg(test)]
pub mod common;
#[cfg(test)]
mod test_dynamic_phases;
#[cfg(test)]
mod test_end_of_turn;
