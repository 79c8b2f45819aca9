use crate::battle::stats::apply_stat_stage_multiplier;
use schema::{BattlerIndex, Move, StatType, StatusCondition};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A Pokemon as seen by the scheduler.
///
/// Only the state that turn ordering reads (speed and its modifiers) or that
/// scheduling effects write (HP for fainting, the last move for Encore, field
/// presence for redirection) is modelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub base_speed: u16,
    pub current_hp: u16,
    pub max_hp: u16,
    pub stat_stages: HashMap<StatType, i8>,
    pub status: Option<StatusCondition>,
    pub last_move: Option<Move>,
    /// Holds a Quick Claw style effect: its fight command jumps its priority bracket.
    pub bypass_speed: bool,
    pub moves: Vec<Move>,
    pub on_field: bool,
    pub switching_out: bool,
}

impl Combatant {
    pub fn new(name: &str, base_speed: u16, max_hp: u16) -> Self {
        Self {
            name: name.to_string(),
            base_speed,
            current_hp: max_hp,
            max_hp,
            stat_stages: HashMap::new(),
            status: None,
            last_move: None,
            bypass_speed: false,
            moves: vec![Move::Tackle],
            on_field: false,
            switching_out: false,
        }
    }

    pub fn with_moves(mut self, moves: Vec<Move>) -> Self {
        self.moves = moves;
        self
    }

    pub fn with_status(mut self, status: StatusCondition) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_bypass_speed(mut self) -> Self {
        self.bypass_speed = true;
        self
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    /// On the field, not fainted and not in the middle of leaving.
    pub fn is_active(&self) -> bool {
        self.on_field && !self.is_fainted() && !self.switching_out
    }

    pub fn get_stat_stage(&self, stat: StatType) -> i8 {
        self.stat_stages.get(&stat).copied().unwrap_or(0)
    }

    /// Apply a stage delta, clamped to -6..=6. Returns the (old, new) stages.
    pub fn modify_stat_stage(&mut self, stat: StatType, delta: i8) -> (i8, i8) {
        let old_stage = self.get_stat_stage(stat);
        let new_stage = old_stage.saturating_add(delta).clamp(-6, 6);
        self.stat_stages.insert(stat, new_stage);
        (old_stage, new_stage)
    }

    /// Effective speed including stat stages and paralysis.
    pub fn effective_speed(&self) -> u32 {
        let stage = self.get_stat_stage(StatType::Spe);
        let mut speed = apply_stat_stage_multiplier(self.base_speed, stage) as u32;

        if self.status == Some(StatusCondition::Paralysis) {
            speed /= 4;
        }

        speed
    }

    pub fn take_damage(&mut self, amount: u16) -> bool {
        self.current_hp = self.current_hp.saturating_sub(amount);
        self.is_fainted()
    }

    pub fn heal(&mut self, amount: u16) -> u16 {
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_add(amount).min(self.max_hp);
        self.current_hp.saturating_sub(before)
    }

    /// Reset everything that does not survive a switch out.
    pub fn clear_volatile(&mut self) {
        self.stat_stages.clear();
        self.last_move = None;
        self.switching_out = false;
    }
}

/// Anything that belongs to a battler slot and can therefore be ordered by speed.
pub trait HasBattler {
    fn battler(&self) -> BattlerIndex;
}

impl HasBattler for BattlerIndex {
    fn battler(&self) -> BattlerIndex {
        *self
    }
}
