// Deterministic, seedable pseudo-random number generator.
//
// Implements xoshiro256++ (Blackman & Vigna, 2019) with SplitMix64 seeding,
// plus the sampling helpers the question generators and the weighted topic
// picker need (`choose`, `choose_two_distinct`, `weighted_index`).
//
// Every random decision in Theory Drill goes through a `DrillRng` that the
// caller owns and passes down explicitly. Nothing in the engine reaches for
// thread-local or OS randomness, so a test that seeds a `DrillRng` gets the
// same questions on every run and every platform.
//
// Determinism constraint: the integer core must stay free of floating point.
// Floats only appear in `next_f64` and `weighted_index`, which derive from
// the integer stream.

use serde::{Deserialize, Serialize};

/// Xoshiro256++ PRNG used by the drill engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DrillRng {
    s: [u64; 4],
}

impl DrillRng {
    /// Create a new PRNG seeded from a `u64`.
    ///
    /// SplitMix64 expands the seed into the 256-bit state. Two generators
    /// created with the same seed produce identical sequences.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    /// Seed from the wall clock. Used by the CLI when no `--seed` is given.
    pub fn from_time() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5eed);
        Self::new(nanos)
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Generate a uniform `f64` in [0, 1) from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Generate a uniform random integer in `[low, high)`.
    ///
    /// Uses rejection sampling to avoid modulo bias.
    /// Panics if `low >= high`.
    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let range = high - low;
        if range.is_power_of_two() {
            return low + (self.next_u64() & (range - 1));
        }
        let threshold = range.wrapping_neg() % range;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % range);
            }
        }
    }

    /// Generate a uniform random `usize` in `[low, high)`.
    pub fn range_usize(&mut self, low: usize, high: usize) -> usize {
        self.range_u64(low as u64, high as u64) as usize
    }

    /// Generate a uniform random `i32` in `[low, high]` (inclusive on both ends).
    ///
    /// Panics if `low > high`.
    pub fn range_i32_inclusive(&mut self, low: i32, high: i32) -> i32 {
        assert!(low <= high, "range_i32_inclusive: low must be <= high");
        let span = (high as i64 - low as i64 + 1) as u64;
        (low as i64 + self.range_u64(0, span) as i64) as i32
    }

    /// Return `true` with probability `p`.
    pub fn random_bool(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Pick a uniform index into a collection of `len` items, or `None` when
    /// the collection is empty.
    pub fn choose_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.range_usize(0, len))
        }
    }

    /// Pick one element uniformly. Panics on an empty slice: callers sample
    /// from static tables that are validated non-empty at load time.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        assert!(!items.is_empty(), "choose: empty slice");
        &items[self.range_usize(0, items.len())]
    }

    /// Pick two elements at distinct positions. Panics if fewer than two.
    pub fn choose_two_distinct<'a, T>(&mut self, items: &'a [T]) -> (&'a T, &'a T) {
        assert!(items.len() >= 2, "choose_two_distinct: need at least two items");
        let first = self.range_usize(0, items.len());
        let mut second = self.range_usize(0, items.len() - 1);
        if second >= first {
            second += 1;
        }
        (&items[first], &items[second])
    }

    /// Draw an index with probability proportional to `weights[i]`.
    ///
    /// Negative and non-finite weights count as zero. Returns `None` when the
    /// total weight is not positive, so the caller decides the fallback.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let clean = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };
        let total: f64 = weights.iter().map(|&w| clean(w)).sum();
        if total <= 0.0 {
            return None;
        }
        let mut target = self.next_f64() * total;
        let mut last_positive = None;
        for (i, &w) in weights.iter().enumerate() {
            let w = clean(w);
            if w <= 0.0 {
                continue;
            }
            if target < w {
                return Some(i);
            }
            target -= w;
            last_positive = Some(i);
        }
        // Float rounding can leave a sliver past the last bucket.
        last_positive
    }
}

/// SplitMix64, used only for seeding xoshiro256++ from a single `u64`.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
