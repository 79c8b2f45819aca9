use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatType {
    Atk,
    Def,
    SpAtk,
    SpDef,
    Spe,
    Acc,
    Eva,
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatType::Atk => write!(f, "Attack"),
            StatType::Def => write!(f, "Defense"),
            StatType::SpAtk => write!(f, "Special Attack"),
            StatType::SpDef => write!(f, "Special Defense"),
            StatType::Spe => write!(f, "Speed"),
            StatType::Acc => write!(f, "accuracy"),
            StatType::Eva => write!(f, "evasiveness"),
        }
    }
}

/// Non-volatile status conditions that matter to turn ordering and end-of-turn work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCondition {
    Paralysis,
    Poison,
    Burn,
}

impl StatusCondition {
    /// Whether the condition deals damage at the end of each turn.
    pub fn is_post_turn(self) -> bool {
        matches!(self, StatusCondition::Poison | StatusCondition::Burn)
    }
}

impl fmt::Display for StatusCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusCondition::Paralysis => "paralysis",
            StatusCondition::Poison => "poison",
            StatusCondition::Burn => "burn",
        };
        write!(f, "{}", name)
    }
}
