use crate::battle::speed_order::SpeedOrderContext;
use crate::phase::move_queue::MoveActionQueue;
use crate::phase::priority_queue::ActionPriorityQueue;
use crate::phase::{MovePhase, Phase, PhaseKind, PostSummonPhase};

/// What became of a phase handed to [`DynamicQueueManager::queue_dynamic_phase`].
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicOutcome {
    /// The phase is held in a queue; schedule a marker of this kind instead.
    Deferred(PhaseKind),
    /// Not a dynamic kind; schedule the phase itself.
    Immediate(Phase),
}

/// Side queues for phases whose running order is only decided when they are due.
#[derive(Debug, Clone, Default)]
pub struct DynamicQueueManager {
    move_queue: MoveActionQueue,
    post_summon_queue: ActionPriorityQueue<PostSummonPhase>,
}

impl DynamicQueueManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dynamic_kind(kind: PhaseKind) -> bool {
        matches!(kind, PhaseKind::Move | PhaseKind::PostSummon)
    }

    pub fn queue_dynamic_phase(&mut self, phase: Phase) -> DynamicOutcome {
        match phase {
            Phase::Move(move_phase) => {
                self.move_queue.push(move_phase);
                DynamicOutcome::Deferred(PhaseKind::Move)
            }
            Phase::PostSummon(post_summon) => {
                self.post_summon_queue.push(post_summon);
                DynamicOutcome::Deferred(PhaseKind::PostSummon)
            }
            other => DynamicOutcome::Immediate(other),
        }
    }

    /// The phase a marker of `kind` stands for: the head of that queue in
    /// current turn order, or `None` if nothing live is left in it.
    ///
    /// # Panics
    /// When `kind` has no dynamic queue; such a marker can never be created.
    pub fn pop_next_phase(&mut self, kind: PhaseKind, ctx: &SpeedOrderContext<'_>) -> Option<Phase> {
        match kind {
            PhaseKind::Move => self.move_queue.pop(ctx).map(Phase::Move),
            PhaseKind::PostSummon => self.post_summon_queue.pop(ctx).map(Phase::PostSummon),
            other => panic!("No dynamic queue for {} phases", other),
        }
    }

    pub fn has_pending(&self, kind: PhaseKind) -> bool {
        match kind {
            PhaseKind::Move => self.move_queue.exists(|p| !p.is_cancelled()),
            PhaseKind::PostSummon => !self.post_summon_queue.is_empty(),
            _ => false,
        }
    }

    /// First live entry of `kind` for which `predicate` holds, seen as a [`Phase`].
    pub fn find_phase(&self, kind: PhaseKind, predicate: impl Fn(&Phase) -> bool) -> Option<Phase> {
        match kind {
            PhaseKind::Move => self
                .move_queue
                .find(|p| !p.is_cancelled() && predicate(&Phase::Move(p.clone())))
                .cloned()
                .map(Phase::Move),
            PhaseKind::PostSummon => self
                .post_summon_queue
                .find(|p| predicate(&Phase::PostSummon(p.clone())))
                .cloned()
                .map(Phase::PostSummon),
            _ => None,
        }
    }

    /// Take the first live entry of `kind` for which `predicate` holds out of
    /// its queue. Its marker goes stale and is skipped when reached.
    pub fn remove_phase(&mut self, kind: PhaseKind, predicate: impl Fn(&Phase) -> bool) -> Option<Phase> {
        match kind {
            PhaseKind::Move => self
                .move_queue
                .remove(|p| !p.is_cancelled() && predicate(&Phase::Move(p.clone())))
                .map(Phase::Move),
            PhaseKind::PostSummon => self
                .post_summon_queue
                .remove(|p| predicate(&Phase::PostSummon(p.clone())))
                .map(Phase::PostSummon),
            _ => None,
        }
    }

    pub fn has_move_phase(&self, predicate: impl Fn(&MovePhase) -> bool) -> bool {
        self.move_queue.exists(predicate)
    }

    pub fn move_queue(&self) -> &MoveActionQueue {
        &self.move_queue
    }

    pub fn move_queue_mut(&mut self) -> &mut MoveActionQueue {
        &mut self.move_queue
    }

    pub fn clear_queues(&mut self) {
        self.move_queue.clear();
        self.post_summon_queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::field::Field;
    use crate::battle::rng::BattleRng;
    use crate::pokemon::Combatant;
    use schema::{BattlerIndex, Move};

    #[test]
    fn test_ordinary_phase_passes_through() {
        let mut manager = DynamicQueueManager::new();
        assert_eq!(
            manager.queue_dynamic_phase(Phase::WeatherEffect),
            DynamicOutcome::Immediate(Phase::WeatherEffect)
        );
    }

    #[test]
    fn test_marker_resolves_to_fastest_pending_entry() {
        let mut field = Field::new();
        field.send_out(BattlerIndex::Player, Combatant::new("Slowbro", 30, 100));
        field.send_out(BattlerIndex::Enemy, Combatant::new("Jolteon", 130, 100));
        let rng = BattleRng::new(2);
        let ctx = SpeedOrderContext::new(&field, &rng, 1);

        let mut manager = DynamicQueueManager::new();
        for battler in [BattlerIndex::Player, BattlerIndex::Enemy] {
            let outcome =
                manager.queue_dynamic_phase(MovePhase::new(battler, Move::Tackle, vec![]).into());
            assert_eq!(outcome, DynamicOutcome::Deferred(PhaseKind::Move));
        }
        assert!(manager.has_pending(PhaseKind::Move));

        let first = manager.pop_next_phase(PhaseKind::Move, &ctx);
        assert_eq!(first.and_then(|p| p.battler()), Some(BattlerIndex::Enemy));
        let second = manager.pop_next_phase(PhaseKind::Move, &ctx);
        assert_eq!(second.and_then(|p| p.battler()), Some(BattlerIndex::Player));
        assert_eq!(manager.pop_next_phase(PhaseKind::Move, &ctx), None);
    }

    #[test]
    fn test_find_and_remove_see_entries_as_phases() {
        let mut manager = DynamicQueueManager::new();
        manager.queue_dynamic_phase(MovePhase::new(BattlerIndex::Player, Move::Tackle, vec![]).into());
        manager.queue_dynamic_phase(MovePhase::new(BattlerIndex::Enemy, Move::Recover, vec![]).into());
        manager.queue_dynamic_phase(PostSummonPhase { battler: BattlerIndex::Enemy2 }.into());

        let recover = manager.find_phase(PhaseKind::Move, |p| {
            matches!(p, Phase::Move(m) if m.move_used == Move::Recover)
        });
        assert_eq!(recover.and_then(|p| p.battler()), Some(BattlerIndex::Enemy));
        assert_eq!(manager.find_phase(PhaseKind::Faint, |_| true), None);

        let removed = manager.remove_phase(PhaseKind::PostSummon, |p| {
            p.battler() == Some(BattlerIndex::Enemy2)
        });
        assert_eq!(
            removed,
            Some(Phase::PostSummon(PostSummonPhase {
                battler: BattlerIndex::Enemy2
            }))
        );
        assert!(!manager.has_pending(PhaseKind::PostSummon));

        manager.move_queue_mut().cancel_move(|p| p.pokemon == BattlerIndex::Player);
        assert_eq!(
            manager.remove_phase(PhaseKind::Move, |p| p.battler() == Some(BattlerIndex::Player)),
            None
        );
    }

    #[test]
    #[should_panic(expected = "No dynamic queue")]
    fn test_non_dynamic_marker_panics() {
        let field = Field::new();
        let rng = BattleRng::new(2);
        let ctx = SpeedOrderContext::new(&field, &rng, 1);
        DynamicQueueManager::new().pop_next_phase(PhaseKind::Faint, &ctx);
    }
}
