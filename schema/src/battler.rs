use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

/// Which half of the field a combatant fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

/// Position of a combatant on the field.
///
/// The discriminant doubles as the canonical battler ordering used whenever a
/// stable, state-independent order is required (e.g. before a seeded shuffle).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
)]
pub enum BattlerIndex {
    Player,
    Player2,
    Enemy,
    Enemy2,
}

impl BattlerIndex {
    pub fn side(self) -> Side {
        match self {
            BattlerIndex::Player | BattlerIndex::Player2 => Side::Player,
            BattlerIndex::Enemy | BattlerIndex::Enemy2 => Side::Enemy,
        }
    }

    pub fn is_player(self) -> bool {
        self.side() == Side::Player
    }

    /// The other slot on the same side. Only meaningful in double battles.
    pub fn ally(self) -> BattlerIndex {
        match self {
            BattlerIndex::Player => BattlerIndex::Player2,
            BattlerIndex::Player2 => BattlerIndex::Player,
            BattlerIndex::Enemy => BattlerIndex::Enemy2,
            BattlerIndex::Enemy2 => BattlerIndex::Enemy,
        }
    }

    pub fn is_opponent_of(self, other: BattlerIndex) -> bool {
        self.side() != other.side()
    }
}

impl fmt::Display for BattlerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BattlerIndex::Player => "Player (left)",
            BattlerIndex::Player2 => "Player (right)",
            BattlerIndex::Enemy => "Enemy (left)",
            BattlerIndex::Enemy2 => "Enemy (right)",
        };
        write!(f, "{}", name)
    }
}
