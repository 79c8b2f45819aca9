use crate::battle::speed_order::{sort_in_speed_order, SpeedOrderContext};
use crate::pokemon::HasBattler;
use std::cmp::Ordering;

#[derive(Debug, Clone)]
struct Queued<T> {
    seq: u64,
    item: T,
}

impl<T: HasBattler> HasBattler for Queued<T> {
    fn battler(&self) -> schema::BattlerIndex {
        self.item.battler()
    }
}

/// Pending per-battler actions for the current turn, re-sorted into speed
/// order every time the head is taken.
#[derive(Debug, Clone)]
pub struct ActionPriorityQueue<T> {
    entries: Vec<Queued<T>>,
    next_seq: u64,
}

impl<T> Default for ActionPriorityQueue<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<T: HasBattler> ActionPriorityQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: T) {
        self.entries.push(Queued {
            seq: self.next_seq,
            item,
        });
        self.next_seq += 1;
    }

    /// Sort the pending entries into turn order.
    ///
    /// Entries are first put into a canonical (battler, insertion) order, so
    /// reordering the same set twice under the same context always yields the
    /// same result.
    pub fn reorder(&mut self, ctx: &SpeedOrderContext<'_>) {
        self.entries.sort_by_key(|e| (e.item.battler(), e.seq));
        sort_in_speed_order(&mut self.entries, ctx, true);
    }

    /// Reorder, then remove and return the head.
    pub fn pop(&mut self, ctx: &SpeedOrderContext<'_>) -> Option<T> {
        self.reorder(ctx);
        self.take_head()
    }

    /// Stable sort of the entries by `compare`, keeping the existing order
    /// within ties.
    pub(crate) fn sort_items_by(&mut self, mut compare: impl FnMut(&T, &T) -> Ordering) {
        self.entries.sort_by(|a, b| compare(&a.item, &b.item));
    }

    /// Remove the head in the current order, without reordering.
    pub(crate) fn take_head(&mut self) -> Option<T> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.remove(0).item)
        }
    }

    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<&T> {
        self.entries.iter().map(|e| &e.item).find(|item| predicate(*item))
    }

    pub fn find_mut(&mut self, predicate: impl Fn(&T) -> bool) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .map(|e| &mut e.item)
            .find(|item| predicate(&**item))
    }

    pub fn exists(&self, predicate: impl Fn(&T) -> bool) -> bool {
        self.find(predicate).is_some()
    }

    /// Remove and return the first entry matching `predicate`.
    pub fn remove(&mut self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        let index = self.entries.iter().position(|e| predicate(&e.item))?;
        Some(self.entries.remove(index).item)
    }

    /// Entries in their current order (the order of the last reorder, with
    /// later pushes at the tail).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.item)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut().map(|e| &mut e.item)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::rng::BattleRng;
    use crate::battle::speed_order::SpeedSource;
    use schema::BattlerIndex::{self, *};

    struct Speeds(Vec<(BattlerIndex, u32)>);

    impl SpeedSource for Speeds {
        fn effective_speed(&self, battler: BattlerIndex) -> u32 {
            self.0
                .iter()
                .find(|(b, _)| *b == battler)
                .map(|(_, s)| *s)
                .unwrap_or(0)
        }

        fn is_speed_reversed(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_pop_follows_speed_order() {
        let speeds = Speeds(vec![(Player, 30), (Player2, 90), (Enemy, 60)]);
        let rng = BattleRng::new(5);
        let ctx = SpeedOrderContext::new(&speeds, &rng, 1);

        let mut queue = ActionPriorityQueue::new();
        for battler in [Player, Player2, Enemy] {
            queue.push(battler);
        }
        let order: Vec<_> = std::iter::from_fn(|| queue.pop(&ctx)).collect();
        assert_eq!(order, vec![Player2, Enemy, Player]);
    }

    #[test]
    fn test_reorder_is_idempotent_for_ties() {
        let speeds = Speeds(vec![(Player, 50), (Player2, 50), (Enemy, 50), (Enemy2, 50)]);
        let rng = BattleRng::new(11);
        let ctx = SpeedOrderContext::new(&speeds, &rng, 3);

        let mut queue = ActionPriorityQueue::new();
        for battler in [Enemy2, Player, Enemy, Player2] {
            queue.push(battler);
        }
        queue.reorder(&ctx);
        let first: Vec<_> = queue.iter().copied().collect();
        queue.reorder(&ctx);
        let second: Vec<_> = queue.iter().copied().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_remove_and_find() {
        let mut queue = ActionPriorityQueue::new();
        queue.push(Player);
        queue.push(Enemy);
        assert!(queue.exists(|b| *b == Enemy));
        assert_eq!(queue.remove(|b| *b == Enemy), Some(Enemy));
        assert_eq!(queue.remove(|b| *b == Enemy), None);
        assert_eq!(queue.find(|b| *b == Player), Some(&Player));
        assert_eq!(queue.len(), 1);
        queue.clear();
        assert!(queue.is_empty());
    }
}
