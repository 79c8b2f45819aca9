//! Speed ordering shared by the action queues and by any other
//! speed-dependent decision (end-of-turn effects, entry effects).

use crate::battle::rng::BattleRng;
use crate::pokemon::HasBattler;
use rand::seq::SliceRandom;
use schema::BattlerIndex;

/// Multiplier applied to the turn number when deriving the shuffle seed offset.
pub const TURN_SEED_MULTIPLIER: u64 = 1000;

/// Read-only view of the stat and field-effect state that ordering depends on.
pub trait SpeedSource {
    fn effective_speed(&self, battler: BattlerIndex) -> u32;

    /// Whether a turn-order reversal (Trick Room) is active.
    fn is_speed_reversed(&self) -> bool;
}

/// Everything a speed sort needs besides the list itself.
#[derive(Clone, Copy)]
pub struct SpeedOrderContext<'a> {
    pub source: &'a dyn SpeedSource,
    pub rng: &'a BattleRng,
    pub turn: u32,
    pub forced_order: Option<&'a [BattlerIndex]>,
}

impl<'a> SpeedOrderContext<'a> {
    pub fn new(source: &'a dyn SpeedSource, rng: &'a BattleRng, turn: u32) -> Self {
        Self {
            source,
            rng,
            turn,
            forced_order: None,
        }
    }

    pub fn with_forced_order(mut self, forced_order: Option<&'a [BattlerIndex]>) -> Self {
        self.forced_order = forced_order;
        self
    }

    fn seed_offset(&self, len: usize) -> u64 {
        self.turn as u64 * TURN_SEED_MULTIPLIER + len as u64
    }
}

/// Sort `list` into turn order.
///
/// With a forced order the list is sorted by position in that order and nothing
/// else applies. Otherwise the list is shuffled with a seed derived from the turn
/// and the list length (when `shuffle_first`), sorted by effective speed
/// (fastest first) and finally reversed if speed reversal is active.
pub fn sort_in_speed_order<T: HasBattler>(
    list: &mut [T],
    ctx: &SpeedOrderContext<'_>,
    shuffle_first: bool,
) {
    if let Some(order) = ctx.forced_order {
        sort_by_forced_order(list, order);
        return;
    }

    if shuffle_first {
        shuffle_list(list, ctx);
    }
    sort_by_speed(list, ctx.source);
}

/// Sort by effective speed, descending, then apply speed reversal.
/// The sort is stable, so ties keep their incoming order.
pub fn sort_by_speed<T: HasBattler>(list: &mut [T], source: &dyn SpeedSource) {
    list.sort_by_key(|item| std::cmp::Reverse(source.effective_speed(item.battler())));

    // Reversal happens after tie-breaking, on the final order.
    if source.is_speed_reversed() {
        list.reverse();
    }
}

/// Stable sort by position in `order`. Battlers missing from `order` go last.
pub fn sort_by_forced_order<T: HasBattler>(list: &mut [T], order: &[BattlerIndex]) {
    list.sort_by_key(|item| {
        order
            .iter()
            .position(|b| *b == item.battler())
            .unwrap_or(usize::MAX)
    });
}

fn shuffle_list<T>(list: &mut [T], ctx: &SpeedOrderContext<'_>) {
    let offset = ctx.seed_offset(list.len());
    ctx.rng
        .execute_with_seed_offset(offset, |rng| list.shuffle(rng));
}

/// `battlers` in turn order.
pub fn speed_order_battlers(
    battlers: &[BattlerIndex],
    ctx: &SpeedOrderContext<'_>,
) -> Vec<BattlerIndex> {
    let mut ordered = battlers.to_vec();
    // Canonical order first, so the shuffle depends only on which battlers are present.
    ordered.sort();
    sort_in_speed_order(&mut ordered, ctx, true);
    ordered
}
