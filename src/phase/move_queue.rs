use crate::battle::field::Field;
use crate::battle::speed_order::SpeedOrderContext;
use crate::phase::priority_queue::ActionPriorityQueue;
use crate::phase::{MovePhase, TimingModifier};
use schema::{BattlerIndex, Move};
use tracing::{debug, trace};

/// The turn's pending move uses, plus the order in which they actually ran.
#[derive(Debug, Clone, Default)]
pub struct MoveActionQueue {
    queue: ActionPriorityQueue<MovePhase>,
    last_turn_order: Vec<BattlerIndex>,
}

impl MoveActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, phase: MovePhase) {
        self.queue.push(phase);
    }

    /// Speed order first, then a stable pass by timing modifier and move
    /// priority, so speed only decides within a bracket.
    pub fn reorder(&mut self, ctx: &SpeedOrderContext<'_>) {
        self.queue.reorder(ctx);
        self.queue.sort_items_by(|a, b| {
            b.timing_modifier
                .cmp(&a.timing_modifier)
                .then_with(|| b.priority().cmp(&a.priority()))
        });
        trace!(
            "Move order: {:?}",
            self.queue.iter().map(|p| p.pokemon).collect::<Vec<_>>()
        );
    }

    /// Reorder and take the next move to run. Cancelled entries are dropped
    /// on the way; the returned move's user is recorded in the turn order.
    pub fn pop(&mut self, ctx: &SpeedOrderContext<'_>) -> Option<MovePhase> {
        self.reorder(ctx);
        while let Some(phase) = self.queue.take_head() {
            if phase.is_cancelled() {
                trace!("Dropping cancelled move of {}", phase.pokemon);
                continue;
            }
            self.last_turn_order.push(phase.pokemon);
            return Some(phase);
        }
        None
    }

    pub fn find(&self, predicate: impl Fn(&MovePhase) -> bool) -> Option<&MovePhase> {
        self.queue.find(predicate)
    }

    pub fn exists(&self, predicate: impl Fn(&MovePhase) -> bool) -> bool {
        self.queue.exists(predicate)
    }

    pub fn remove(&mut self, predicate: impl Fn(&MovePhase) -> bool) -> Option<MovePhase> {
        self.queue.remove(predicate)
    }

    /// Cancel the first live entry matching `predicate`. Returns whether one was found.
    pub fn cancel_move(&mut self, predicate: impl Fn(&MovePhase) -> bool) -> bool {
        match self
            .queue
            .find_mut(|p| !p.is_cancelled() && predicate(p))
        {
            Some(phase) => {
                phase.cancel();
                debug!("Cancelled pending move of {}", phase.pokemon);
                true
            }
            None => false,
        }
    }

    pub fn set_timing_modifier(
        &mut self,
        predicate: impl Fn(&MovePhase) -> bool,
        modifier: TimingModifier,
    ) -> bool {
        match self.queue.find_mut(predicate) {
            Some(phase) => {
                debug!("{}'s move timing set to {:?}", phase.pokemon, modifier);
                phase.timing_modifier = modifier;
                true
            }
            None => false,
        }
    }

    /// Swap the move a pending entry will use, keeping its place and targets.
    pub fn set_move_for_phase(
        &mut self,
        predicate: impl Fn(&MovePhase) -> bool,
        move_used: Move,
    ) -> bool {
        match self.queue.find_mut(predicate) {
            Some(phase) => {
                debug!("{}'s pending move is now {}", phase.pokemon, move_used);
                phase.move_used = move_used;
                true
            }
            None => false,
        }
    }

    /// Point moves aimed solely at `removed` at `replacement` instead.
    ///
    /// Only moves whose user is an opponent of `replacement` are touched, and
    /// only when `replacement` is on the field and able to act. Single battles
    /// have nobody to redirect to. Returns how many entries changed.
    pub fn redirect_moves(
        &mut self,
        removed: BattlerIndex,
        replacement: BattlerIndex,
        field: &Field,
        double_battle: bool,
    ) -> usize {
        if !double_battle || !field.is_active(replacement) {
            return 0;
        }

        let mut redirected = 0;
        for phase in self.queue.iter_mut() {
            if phase.targets.as_slice() == [removed] && phase.pokemon.is_opponent_of(replacement) {
                phase.targets = vec![replacement];
                redirected += 1;
            }
        }
        if redirected > 0 {
            debug!("Redirected {} move(s) from {} to {}", redirected, removed, replacement);
        }
        redirected
    }

    /// Battlers whose moves have been popped this turn, in order.
    pub fn get_turn_order(&self) -> &[BattlerIndex] {
        &self.last_turn_order
    }

    pub fn clear_turn_order(&mut self) {
        self.last_turn_order.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &MovePhase> {
        self.queue.iter()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop both the pending entries and the recorded turn order.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.last_turn_order.clear();
    }
}
