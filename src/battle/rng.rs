use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Per-battle source of reproducible randomness.
///
/// Nothing here holds mutable RNG state between calls: every draw goes through
/// [`BattleRng::execute_with_seed_offset`], so the same offset always yields the
/// same sequence for a given battle seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleRng {
    battle_seed: u64,
}

impl BattleRng {
    pub fn new(battle_seed: u64) -> Self {
        Self { battle_seed }
    }

    pub fn new_random() -> Self {
        Self::new(rand::rng().random())
    }

    pub fn battle_seed(&self) -> u64 {
        self.battle_seed
    }

    /// Run `f` with an RNG seeded from the battle seed combined with `offset`.
    pub fn execute_with_seed_offset<R>(&self, offset: u64, f: impl FnOnce(&mut StdRng) -> R) -> R {
        let mut rng = StdRng::seed_from_u64(self.mix(offset));
        f(&mut rng)
    }

    fn mix(&self, offset: u64) -> u64 {
        // splitmix64 finaliser over the combined value
        let mut z = self
            .battle_seed
            .wrapping_add(offset.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}
