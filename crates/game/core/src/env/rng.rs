//! Random number source for every chance-based rule.
//!
//! Each player owns one [`PcgRng`] stream. The stream is plain data (a single
//! `u64` state) so it is saved and restored with the rest of the context and
//! the draws after a save/load cycle are identical to the uninterrupted run.

/// Source of random draws consumed by combat, selection and events.
///
/// Only [`next_u32`](Self::next_u32) is required; the helpers derive from it
/// so every implementation consumes the stream in the same way.
pub trait RandomSource {
    /// Draw the next raw 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Uniform value in `0..bound`. Returns 0 when `bound` is 0.
    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.next_u32() % bound
    }

    /// Uniform value in `min..=max`.
    fn range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        min + self.below(max - min + 1)
    }

    /// True with probability `numerator / denominator`.
    ///
    /// A zero numerator never succeeds; a numerator at or above the
    /// denominator always succeeds. Both still consume one draw.
    fn chance(&mut self, numerator: u32, denominator: u32) -> bool {
        let roll = self.below(denominator.max(1));
        roll < numerator
    }

    /// True with probability `percent / 100`.
    fn percent(&mut self, percent: u32) -> bool {
        self.chance(percent, 100)
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// This implementation uses PCG-XSH-RR, which produces 32-bit output from a
/// 64-bit state.
///
/// # Properties
///
/// - **Deterministic**: Same seed always produces same output
/// - **Small state**: Only 64 bits, serialized verbatim
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Create a stream from a seed.
    ///
    /// The seed is stepped once so that small seeds (0, 1, 2, ...) do not
    /// start from nearly identical states.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            state: Self::pcg_step(seed.wrapping_add(Self::INCREMENT)),
        }
    }

    /// Rebuild a stream from a previously captured state.
    pub const fn from_state(state: u64) -> Self {
        Self { state }
    }

    /// Current internal state, for snapshots.
    pub const fn state(&self) -> u64 {
        self.state
    }

    /// Advance the PCG state by one step.
    ///
    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// PCG output function using XSH-RR (xorshift high, random rotate).
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RandomSource for PcgRng {
    fn next_u32(&mut self) -> u32 {
        let previous = self.state;
        self.state = Self::pcg_step(previous);
        Self::pcg_output(previous)
    }
}
