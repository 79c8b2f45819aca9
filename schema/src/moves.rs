use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

/// The moves the engine knows how to schedule.
///
/// This is not a content table: only priority, targeting and the part of each
/// move's effect that touches the turn schedule are described here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum Move {
    Tackle,
    Scratch,
    QuickAttack,
    ExtremeSpeed,
    Protect,
    TrickRoom,
    Agility,
    ScaryFace,
    Recover,
    Whirlwind,
    Quash,
    AfterYou,
    Encore,
    Struggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveTarget {
    User,
    SingleOpponent,
    AnyOther,
    Field,
}

/// The scheduling-relevant part of a move's effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveEffect {
    None,
    /// Fixed HP loss on the target. Real damage calculation lives elsewhere.
    Damage(u16),
    /// Toggle turn-order reversal for a number of turns.
    TrickRoom(u8),
    /// Speed stage change applied to the move's target.
    SpeedChange(i8),
    /// Restore a percentage of the target's maximum HP.
    Heal(u8),
    ForceSwitch,
    /// Target's pending move acts last this turn.
    Quash,
    /// Target's pending move acts next.
    AfterYou,
    /// Target's pending move is replaced by the last move it used.
    Encore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveData {
    pub priority: i8,
    pub target: MoveTarget,
    pub effect: MoveEffect,
}

impl Move {
    pub fn data(self) -> MoveData {
        use MoveEffect::*;
        let (priority, target, effect) = match self {
            Move::Tackle => (0, MoveTarget::SingleOpponent, Damage(40)),
            Move::Scratch => (0, MoveTarget::SingleOpponent, Damage(40)),
            Move::QuickAttack => (1, MoveTarget::SingleOpponent, Damage(40)),
            Move::ExtremeSpeed => (2, MoveTarget::SingleOpponent, Damage(80)),
            Move::Protect => (4, MoveTarget::User, None),
            Move::TrickRoom => (-7, MoveTarget::Field, TrickRoom(5)),
            Move::Agility => (0, MoveTarget::User, SpeedChange(2)),
            Move::ScaryFace => (0, MoveTarget::SingleOpponent, SpeedChange(-2)),
            Move::Recover => (0, MoveTarget::User, Heal(50)),
            Move::Whirlwind => (-6, MoveTarget::SingleOpponent, ForceSwitch),
            Move::Quash => (0, MoveTarget::AnyOther, Quash),
            Move::AfterYou => (0, MoveTarget::AnyOther, AfterYou),
            Move::Encore => (0, MoveTarget::SingleOpponent, Encore),
            Move::Struggle => (0, MoveTarget::SingleOpponent, Damage(50)),
        };
        MoveData {
            priority,
            target,
            effect,
        }
    }

    pub fn priority(self) -> i8 {
        self.data().priority
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Tackle => "Tackle",
            Move::Scratch => "Scratch",
            Move::QuickAttack => "Quick Attack",
            Move::ExtremeSpeed => "Extreme Speed",
            Move::Protect => "Protect",
            Move::TrickRoom => "Trick Room",
            Move::Agility => "Agility",
            Move::ScaryFace => "Scary Face",
            Move::Recover => "Recover",
            Move::Whirlwind => "Whirlwind",
            Move::Quash => "Quash",
            Move::AfterYou => "After You",
            Move::Encore => "Encore",
            Move::Struggle => "Struggle",
        };
        write!(f, "{}", name)
    }
}
