// Seedable pseudo-random number generator for lyric post-processing.
//
// Implements xoshiro256++ (Blackman & Vigna, 2019) with SplitMix64 seeding.
// Hand-rolled so that a given seed produces the same rhyme choices on every
// platform and toolchain, which keeps CLI runs with `--seed` reproducible and
// lets batch processing hand each request its own independent stream.
//
// Used by `lyricsmith_lyrics` as the default `RhymePicker` (uniform choice
// among rhyme candidates) and by the batch pipeline, which derives one
// `LyricRng` per request from a base seed.
//
// No floating point in the generator core.

use serde::{Deserialize, Serialize};

/// Xoshiro256++ PRNG — the only source of randomness in Lyricsmith.
///
/// State is serializable so a caller can snapshot a generator mid-stream and
/// resume it later with identical output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricRng {
    s: [u64; 4],
}

impl LyricRng {
    /// Create a generator from a `u64` seed, expanded to 256 bits of state
    /// with SplitMix64.
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

    /// Derive the generator for the `index`-th item of a batch seeded with
    /// `base_seed`. Streams for different indices are independent.
    pub fn for_batch_item(base_seed: u64, index: usize) -> Self {
        Self::new(base_seed.wrapping_add(index as u64))
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

    /// Uniform integer in `[low, high)`, without modulo bias.
    ///
    /// Panics if `low >= high`.
    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let span = high - low;
        if span.is_power_of_two() {
            return low + (self.next_u64() & (span - 1));
        }
        let threshold = span.wrapping_neg() % span;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % span);
            }
        }
    }

    /// Uniform `usize` in `[low, high)`. Panics if `low >= high`.
    pub fn range_usize(&mut self, low: usize, high: usize) -> usize {
        self.range_u64(low as u64, high as u64) as usize
    }

    /// Uniformly choose an index into a collection of `len` items, or `None`
    /// when the collection is empty. Consumes no randomness for `len <= 1`.
    pub fn choose_index(&mut self, len: usize) -> Option<usize> {
        match len {
            0 => None,
            1 => Some(0),
            _ => Some(self.range_usize(0, len)),
        }
    }

    /// Uniformly choose an element of `items`.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.choose_index(items.len()).map(|i| &items[i])
    }
}

/// SplitMix64 step, used only to expand seeds.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = LyricRng::new(42);
        let mut b = LyricRng::new(42);
        for _ in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn known_sequence_from_seed_zero() {
        // Pinned output. If this breaks, seeded CLI runs are no longer
        // reproducible across versions.
        let mut rng = LyricRng::new(0);
        assert_eq!(
            rng.s,
            [
                0xe220_a839_7b1d_cdaf,
                0x6e78_9e6a_a1b9_65f4,
                0x06c4_5d18_8009_454f,
                0xf88b_b8a8_724c_81ec,
            ]
        );
        let vals: Vec<u64> = (0..5).map(|_| rng.next_u64()).collect();
        assert_eq!(
            vals,
            vec![
                0x5317_5d61_490b_23df,
                0x61da_6f3d_c380_d507,
                0x5c0f_df91_ec9a_7bfc,
                0x02ee_bf8c_3bbe_5e1a,
                0x7eca_04eb_af4a_5eea,
            ]
        );
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = LyricRng::new(42);
        let mut b = LyricRng::new(43);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn batch_items_get_distinct_streams() {
        let mut first = LyricRng::for_batch_item(7, 0);
        let mut second = LyricRng::for_batch_item(7, 1);
        assert_ne!(first.next_u64(), second.next_u64());
        assert_eq!(LyricRng::for_batch_item(7, 3), LyricRng::new(10));
    }

    #[test]
    fn range_usize_within_bounds() {
        let mut rng = LyricRng::new(555);
        for _ in 0..10_000 {
            let v = rng.range_usize(5, 15);
            assert!((5..15).contains(&v), "range_usize out of range: {v}");
        }
    }

    #[test]
    fn range_u64_power_of_two_span() {
        let mut rng = LyricRng::new(9);
        for _ in 0..1000 {
            let v = rng.range_u64(100, 108);
            assert!((100..108).contains(&v));
        }
    }

    #[test]
    fn choose_index_edge_cases() {
        let mut rng = LyricRng::new(1);
        assert_eq!(rng.choose_index(0), None);
        assert_eq!(rng.choose_index(1), Some(0));
        for _ in 0..100 {
            assert!(rng.choose_index(3).unwrap() < 3);
        }
    }

    #[test]
    fn choose_reaches_every_element() {
        let mut rng = LyricRng::new(2024);
        let words = ["night", "bright", "sight", "flight"];
        let mut seen = [false; 4];
        for _ in 0..1000 {
            let w = rng.choose(&words).unwrap();
            let idx = words.iter().position(|x| x == w).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s), "every candidate should be picked");
        let empty: [&str; 0] = [];
        assert!(rng.choose(&empty).is_none());
    }

    #[test]
    fn serialization_resumes_stream() {
        let mut rng = LyricRng::new(42);
        for _ in 0..100 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: LyricRng = serde_json::from_str(&json).unwrap();
        for _ in 0..100 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }
}
