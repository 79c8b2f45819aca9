use crate::battle::speed_order::SpeedOrderContext;
use crate::phase::dynamic::DynamicQueueManager;
use crate::phase::{Phase, PhaseKind};
use std::collections::VecDeque;
use tracing::trace;

/// The top-level phase scheduler: a stack of levels, each an ordered queue of
/// pending phases.
///
/// Popping a phase moves `current_level` one step deeper, so whatever that phase
/// queues with [`PhaseTree::add_phase`] lands in a level of its own and runs
/// before the popped phase's remaining siblings. Once a level drains, popping
/// climbs back toward level 0.
#[derive(Debug, Clone)]
pub struct PhaseTree {
    levels: Vec<VecDeque<Phase>>,
    current_level: usize,
}

impl Default for PhaseTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseTree {
    pub fn new() -> Self {
        Self {
            levels: vec![VecDeque::new()],
            current_level: 0,
        }
    }

    /// Queue `phase` at the current level, or one level deeper when `deepen` is set.
    pub fn add_phase(&mut self, phase: Phase, deepen: bool) {
        let level = if deepen {
            self.current_level + 1
        } else {
            self.current_level
        };
        self.level_mut(level).push_back(phase);
    }

    /// Queue `phase` behind everything already queued at the current level.
    pub fn push_phase(&mut self, phase: Phase) {
        let level = self.current_level;
        self.level_mut(level).push_back(phase);
    }

    /// Queue `phase` at the tail of level 0, after all other pending work.
    pub fn push_to_root(&mut self, phase: Phase) {
        self.levels[0].push_back(phase);
    }

    /// Put `phase` at the head of the level one shallower than the current one,
    /// so it runs as soon as control returns to the caller's frame.
    pub fn unshift_to_current(&mut self, phase: Phase) {
        let level = self.current_level.saturating_sub(1);
        self.levels[level].push_front(phase);
    }

    /// Insert `phase` right after the first pending phase of `kind`, searching
    /// from the deepest level. Without such a phase this is `add_phase(phase, false)`.
    pub fn add_after(&mut self, phase: Phase, kind: PhaseKind) {
        for level in self.levels.iter_mut().rev() {
            if let Some(index) = level.iter().position(|p| p.is(kind)) {
                level.insert(index + 1, phase);
                return;
            }
        }
        self.add_phase(phase, false);
    }

    /// Next phase to run, with dynamic markers resolved through `dynamic`.
    ///
    /// A marker whose queue has nothing left (every entry was cancelled) is
    /// dropped and popping carries on. Returns `None` once every level is empty.
    pub fn get_next_phase(
        &mut self,
        dynamic: &mut DynamicQueueManager,
        speed: &SpeedOrderContext<'_>,
    ) -> Option<Phase> {
        loop {
            match self.pop_phase()? {
                Phase::DynamicMarker { phase_type } => {
                    if let Some(resolved) = dynamic.pop_next_phase(phase_type, speed) {
                        return Some(resolved);
                    }
                    trace!("Skipping stale {} marker", phase_type);
                }
                phase => return Some(phase),
            }
        }
    }

    /// Pop the next phase without resolving markers.
    pub fn pop_phase(&mut self) -> Option<Phase> {
        // Start from the deepest level so nothing queued with `deepen` is stranded.
        self.current_level = self.levels.len() - 1;
        while self.levels[self.current_level].is_empty() {
            if self.current_level == 0 {
                return None;
            }
            self.levels.pop();
            self.current_level -= 1;
        }

        let phase = self.levels[self.current_level].pop_front();
        self.current_level += 1;
        self.levels.push(VecDeque::new());
        phase
    }

    pub fn find(&self, kind: PhaseKind) -> Option<&Phase> {
        self.find_where(kind, |_| true)
    }

    /// First pending phase of `kind` matching `predicate`, deepest level first.
    pub fn find_where(&self, kind: PhaseKind, predicate: impl Fn(&Phase) -> bool) -> Option<&Phase> {
        self.levels
            .iter()
            .rev()
            .flat_map(|level| level.iter())
            .find(|p| p.is(kind) && predicate(*p))
    }

    pub fn find_mut(
        &mut self,
        kind: PhaseKind,
        predicate: impl Fn(&Phase) -> bool,
    ) -> Option<&mut Phase> {
        self.levels
            .iter_mut()
            .rev()
            .flat_map(|level| level.iter_mut())
            .find(|p| p.is(kind) && predicate(&**p))
    }

    pub fn exists(&self, kind: PhaseKind) -> bool {
        self.find(kind).is_some()
    }

    pub fn exists_where(&self, kind: PhaseKind, predicate: impl Fn(&Phase) -> bool) -> bool {
        self.find_where(kind, predicate).is_some()
    }

    pub fn remove(&mut self, kind: PhaseKind) -> Option<Phase> {
        self.remove_where(kind, |_| true)
    }

    /// Remove and return the first pending phase of `kind` matching `predicate`.
    pub fn remove_where(
        &mut self,
        kind: PhaseKind,
        predicate: impl Fn(&Phase) -> bool,
    ) -> Option<Phase> {
        for level in self.levels.iter_mut().rev() {
            if let Some(index) = level.iter().position(|p| p.is(kind) && predicate(p)) {
                return level.remove(index);
            }
        }
        None
    }

    /// Remove every pending phase of `kind` from every level. Returns how many went.
    pub fn remove_all(&mut self, kind: PhaseKind) -> usize {
        let before = self.len();
        for level in &mut self.levels {
            level.retain(|p| !p.is(kind));
        }
        before - self.len()
    }

    /// Drop everything and go back to a single empty level 0.
    pub fn clear(&mut self) {
        self.levels = vec![VecDeque::new()];
        self.current_level = 0;
    }

    /// Drop everything except the level the running phase is filling, which
    /// becomes the new level 0.
    pub fn clear_leaving_current(&mut self) {
        let kept = self
            .levels
            .get_mut(self.current_level)
            .map(std::mem::take)
            .unwrap_or_default();
        self.levels = vec![kept];
        self.current_level = 0;
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn current_level(&self) -> usize {
        self.current_level
    }

    pub fn len(&self) -> usize {
        self.levels.iter().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(VecDeque::is_empty)
    }

    /// Pending phases in the order they would be popped, ignoring markers'
    /// resolution.
    pub fn iter(&self) -> impl Iterator<Item = &Phase> {
        self.levels.iter().rev().flat_map(|level| level.iter())
    }

    fn level_mut(&mut self, level: usize) -> &mut VecDeque<Phase> {
        while self.levels.len() <= level {
            self.levels.push(VecDeque::new());
        }
        &mut self.levels[level]
    }
}
