//! 32-bit Mersenne twister used by the random-walk motion.
//!
//! The generator is self-contained so a seeded walk replays the exact same
//! steps on every platform. It plugs into `rand` through [`RngCore`] and
//! [`SeedableRng`], so callers draw floats and ranges with [`rand::Rng`].

use rand::{RngCore, SeedableRng};

const STATE_LEN: usize = 624;
const SHIFT: usize = 397;
const MATRIX_A: u32 = 0x9908_B0DF;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7FFF_FFFF;

/// MT19937 generator producing uniform 32-bit outputs.
///
/// The state is regenerated in one batch every 624 draws, so
/// [`MersenneTwister::next_u32`] is O(1) amortized and never allocates.
#[derive(Clone)]
pub struct MersenneTwister {
    state: [u32; STATE_LEN],
    index: usize,
}

impl MersenneTwister {
    /// Creates a generator with a fixed seed.
    pub fn new(seed: u32) -> Self {
        let mut rng = Self {
            state: [0; STATE_LEN],
            index: STATE_LEN,
        };
        rng.seed(seed);
        rng
    }

    /// Resets the generator so it replays the sequence for `seed`.
    pub fn seed(&mut self, seed: u32) {
        self.state[0] = seed;
        for i in 1..STATE_LEN {
            let prev = self.state[i - 1];
            self.state[i] = 1_812_433_253u32
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
        // forces a twist before the next draw
        self.index = STATE_LEN;
    }

    /// Returns the next tempered 32-bit output.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        if self.index >= STATE_LEN {
            self.twist();
        }

        let mut x = self.state[self.index];
        self.index += 1;

        x ^= x >> 11;
        x ^= (x << 7) & 0x9D2C_5680;
        x ^= (x << 15) & 0xEFC6_0000;
        x ^ (x >> 18)
    }

    fn twist(&mut self) {
        for i in 0..STATE_LEN {
            let next = self.state[(i + 1) % STATE_LEN];
            let y = (self.state[i] & UPPER_MASK) | (next & LOWER_MASK);
            let mut value = self.state[(i + SHIFT) % STATE_LEN] ^ (y >> 1);
            if y & 1 != 0 {
                value ^= MATRIX_A;
            }
            self.state[i] = value;
        }
        self.index = 0;
    }
}

impl RngCore for MersenneTwister {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        MersenneTwister::next_u32(self)
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        let high = u64::from(MersenneTwister::next_u32(self));
        let low = u64::from(MersenneTwister::next_u32(self));
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = MersenneTwister::next_u32(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Seeds are the 32-bit MT seed in little-endian order, so
/// `from_seed(s.to_le_bytes())` matches `MersenneTwister::new(s)`.
impl SeedableRng for MersenneTwister {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

impl std::fmt::Debug for MersenneTwister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MersenneTwister")
            .field("index", &self.index)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_reference_outputs() {
        // First outputs of MT19937 for the canonical seed 5489.
        let mut rng = MersenneTwister::new(5489);
        assert_eq!(rng.next_u32(), 3_499_211_612);
        assert_eq!(rng.next_u32(), 581_869_302);
        assert_eq!(rng.next_u32(), 3_890_346_734);
        assert_eq!(rng.next_u32(), 3_586_334_585);
    }

    #[test]
    fn same_seed_replays_sequence() {
        let mut a = MersenneTwister::new(42);
        let mut b = MersenneTwister::new(42);

        let first: Vec<u32> = (0..2_000).map(|_| a.next_u32()).collect();
        let second: Vec<u32> = (0..2_000).map(|_| b.next_u32()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn reseeding_restarts_sequence() {
        let mut rng = MersenneTwister::new(7);
        let first: Vec<u32> = (0..10).map(|_| rng.next_u32()).collect();
        rng.seed(7);
        let again: Vec<u32> = (0..10).map(|_| rng.next_u32()).collect();
        assert_eq!(first, again);
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = MersenneTwister::new(1);
        let mut b = MersenneTwister::new(2);

        let first: Vec<u32> = (0..10).map(|_| a.next_u32()).collect();
        let second: Vec<u32> = (0..10).map(|_| b.next_u32()).collect();
        assert_ne!(first, second);
    }

    #[test]
    fn byte_seed_matches_integer_seed() {
        let mut a = MersenneTwister::from_seed(5489u32.to_le_bytes());
        let mut b = MersenneTwister::new(5489);
        for _ in 0..100 {
            assert_eq!(RngCore::next_u32(&mut a), b.next_u32());
        }

        let mut c = MersenneTwister::seed_from_u64(11);
        let mut d = MersenneTwister::seed_from_u64(11);
        assert_eq!(c.next_u64(), d.next_u64());
    }

    #[test]
    fn fills_partial_words() {
        let mut rng = MersenneTwister::new(5489);
        let mut bytes = [0u8; 6];
        rng.fill_bytes(&mut bytes);

        assert_eq!(bytes[..4], 3_499_211_612u32.to_le_bytes());
        assert_eq!(bytes[4..], 581_869_302u32.to_le_bytes()[..2]);
    }

    #[test]
    fn unit_floats_stay_half_open() {
        use rand::Rng;

        let mut rng = MersenneTwister::new(99);
        for _ in 0..5_000 {
            let value: f32 = rng.gen();
            assert!((0.0..1.0).contains(&value));
        }
        let step = rng.gen_range(-0.5f32..0.5);
        assert!((-0.5..0.5).contains(&step));
    }
}
