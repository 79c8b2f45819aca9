//! Phases: the discrete, resumable units of work a battle is made of.
//!
//! The battle loop never recurses into game logic. Every step is a [`Phase`]
//! sitting in the [`PhaseTree`](tree::PhaseTree) until it is popped and started,
//! and a phase that needs sub-steps queues more phases instead of calling them.

pub mod dynamic;
pub mod exec;
pub mod manager;
pub mod move_queue;
pub mod priority_queue;
pub mod tree;

use crate::pokemon::HasBattler;
use schema::{BattlerIndex, Move, Side, StatType};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumDiscriminants, EnumIter};

/// Outcome of starting a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStatus {
    /// The phase finished; the runner ends it.
    Ended,
    /// The phase is waiting on something external (e.g. a player choice) and
    /// stays current until it is explicitly ended.
    Suspended,
}

/// Nudges a queued move ahead of or behind its priority bracket.
/// Ordered so that `First > Normal > Last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimingModifier {
    Last,
    Normal,
    First,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveUseMode {
    Normal,
    /// Used without spending PP (called or forced moves).
    IgnorePp,
    /// Queued by another effect as a follow-up to a move already used.
    FollowUp,
}

/// A pending use of a move by the combatant in `pokemon`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovePhase {
    pub pokemon: BattlerIndex,
    pub move_used: Move,
    pub targets: Vec<BattlerIndex>,
    pub use_mode: MoveUseMode,
    pub timing_modifier: TimingModifier,
    cancelled: bool,
}

impl MovePhase {
    pub fn new(pokemon: BattlerIndex, move_used: Move, targets: Vec<BattlerIndex>) -> Self {
        Self {
            pokemon,
            move_used,
            targets,
            use_mode: MoveUseMode::Normal,
            timing_modifier: TimingModifier::Normal,
            cancelled: false,
        }
    }

    pub fn with_timing(mut self, timing_modifier: TimingModifier) -> Self {
        self.timing_modifier = timing_modifier;
        self
    }

    pub fn with_use_mode(mut self, use_mode: MoveUseMode) -> Self {
        self.use_mode = use_mode;
        self
    }

    pub fn priority(&self) -> i8 {
        self.move_used.priority()
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl HasBattler for MovePhase {
    fn battler(&self) -> BattlerIndex {
        self.pokemon
    }
}

/// Entry effects of a combatant that just arrived on the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummonPhase {
    pub battler: BattlerIndex,
}

impl HasBattler for PostSummonPhase {
    fn battler(&self) -> BattlerIndex {
        self.battler
    }
}

/// The closed set of phases. [`PhaseKind`] is its discriminant.
#[derive(Debug, Clone, PartialEq, EnumDiscriminants)]
#[strum_discriminants(
    name(PhaseKind),
    derive(Hash, Display, EnumIter, Serialize, Deserialize)
)]
pub enum Phase {
    /// Start-of-turn bookkeeping; queues command collection and turn start.
    TurnInit,
    /// Wait for the command of one battler.
    Command { battler: BattlerIndex },
    /// Turn the collected commands into this turn's batch of actions.
    TurnStart,
    Move(MovePhase),
    MoveEffect {
        user: BattlerIndex,
        targets: Vec<BattlerIndex>,
        move_used: Move,
    },
    MoveEnd { battler: BattlerIndex },
    Faint { battler: BattlerIndex },
    Recall { battler: BattlerIndex },
    Switch { battler: BattlerIndex, bench_slot: usize },
    PostSummon(PostSummonPhase),
    AttemptRun { battler: BattlerIndex },
    StatStageChange {
        battler: BattlerIndex,
        stat: StatType,
        stages: i8,
    },
    PokemonHeal { battler: BattlerIndex, amount: u16 },
    Message { text: String },
    WeatherEffect,
    CheckStatusEffect,
    PostTurnStatusEffect { battler: BattlerIndex },
    TurnEnd { upcoming_interlude: bool },
    BattleEnd { winner: Option<Side> },
    /// Placeholder for a dynamic phase whose concrete entry is chosen when popped.
    DynamicMarker { phase_type: PhaseKind },
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        self.into()
    }

    pub fn is(&self, kind: PhaseKind) -> bool {
        self.kind() == kind
    }

    /// The battler this phase acts for, if any.
    pub fn battler(&self) -> Option<BattlerIndex> {
        match self {
            Phase::Command { battler }
            | Phase::MoveEnd { battler }
            | Phase::Faint { battler }
            | Phase::Recall { battler }
            | Phase::Switch { battler, .. }
            | Phase::AttemptRun { battler }
            | Phase::StatStageChange { battler, .. }
            | Phase::PokemonHeal { battler, .. }
            | Phase::PostTurnStatusEffect { battler } => Some(*battler),
            Phase::Move(move_phase) => Some(move_phase.pokemon),
            Phase::MoveEffect { user, .. } => Some(*user),
            Phase::PostSummon(post_summon) => Some(post_summon.battler),
            Phase::TurnInit
            | Phase::TurnStart
            | Phase::Message { .. }
            | Phase::WeatherEffect
            | Phase::CheckStatusEffect
            | Phase::TurnEnd { .. }
            | Phase::BattleEnd { .. }
            | Phase::DynamicMarker { .. } => None,
        }
    }

    pub fn message(text: impl Into<String>) -> Self {
        Phase::Message { text: text.into() }
    }
}

impl From<MovePhase> for Phase {
    fn from(move_phase: MovePhase) -> Self {
        Phase::Move(move_phase)
    }
}

impl From<PostSummonPhase> for Phase {
    fn from(post_summon: PostSummonPhase) -> Self {
        Phase::PostSummon(post_summon)
    }
}
