//! Injectable random number sources for battle resolution.
//!
//! Every stochastic decision in the engine (roll draws, status effect chance
//! checks, turn-order jitter) pulls from a [`BattleRng`] supplied by the
//! caller. Production code seeds a [`PcgRng`] from the battle seed and the
//! step's position in the battle, so peers sharing a seed resolve identical
//! rounds. Tests inject a [`SequenceRng`] to script exact outcomes.

/// Source of randomness consumed by the engine.
pub trait BattleRng {
    /// Generate the next raw 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Generate a value in range `[min, max]` inclusive.
    fn range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let span = u64::from(max - min) + 1;
        min + (u64::from(self.next_u32()) % span) as u32
    }

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&mut self) -> u32 {
        self.range(1, 100)
    }

    /// Returns true with `percent`% probability.
    ///
    /// `100` always succeeds and `0` never does.
    fn chance(&mut self, percent: u8) -> bool {
        self.roll_d100() <= u32::from(percent.min(100))
    }

    /// Uniform draw in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0)
    }
}

impl<R: BattleRng + ?Sized> BattleRng for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR variant producing 32-bit output from 64-bit state. Same seed
/// always yields the same sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seeds a generator for a single engine step.
    pub fn for_step(battle_seed: u64, step: u64, context: u32) -> Self {
        Self::new(compute_seed(battle_seed, step, 0, context))
    }

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl BattleRng for PcgRng {
    fn next_u32(&mut self) -> u32 {
        self.state = Self::pcg_step(self.state);
        Self::pcg_output(self.state)
    }
}

/// Scripted RNG that replays a fixed list of raw values, cycling when exhausted.
///
/// Useful for pinning down exact roll results in tests: `range(min, max)`
/// resolves to `min + value % span`.
#[derive(Clone, Debug, Default)]
pub struct SequenceRng {
    values: Vec<u32>,
    cursor: usize,
}

impl SequenceRng {
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// An RNG that always yields zero: every `range` returns its minimum and
    /// every `chance` above zero succeeds.
    pub fn zeros() -> Self {
        Self::new(vec![0])
    }

    /// Number of values consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl BattleRng for SequenceRng {
    fn next_u32(&mut self) -> u32 {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

/// Compute deterministic seed from battle state components.
///
/// * `battle_seed` - Base seed set at battle setup (shared by all peers)
/// * `nonce` - Engine step sequence number
/// * `actor_id` - Participant the draw belongs to (0 when not actor-specific)
/// * `context` - Distinguishes independent draws within the same step
pub fn compute_seed(battle_seed: u64, nonce: u64, actor_id: u32, context: u32) -> u64 {
    // SplitMix64 / FxHash style combiners
    let mut hash = battle_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= u64::from(actor_id).wrapping_mul(0x517cc1b727220a95);
    hash ^= u64::from(context).wrapping_mul(0x85ebca6b);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
