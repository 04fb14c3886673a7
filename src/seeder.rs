//! Park–Miller "minimal standard" generator used to shuffle the noise
//! permutation table.
//!
//! Output must match the reference generator bit for bit: `%` keeps the
//! sign of the dividend just like the reference. The product is formed in
//! `i128` so any `i64` seed steps without overflow; after one step the
//! state always fits in 31 bits.

use rand::RngCore;

pub const MODULUS: i64 = 2_147_483_647;
pub const MULTIPLIER: i64 = 16_807;

/// offset applied on both ends of [`Seeder::int_range`] so the end points get
/// (almost) the same share as the interior values
const RANGE_BIAS: f64 = 0.4999;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Seeder {
    state: i64,
}

impl Seeder {
    pub fn new(seed: i64) -> Self {
        Self { state: seed }
    }

    /// advance and return the raw state
    pub fn next_int(&mut self) -> i64 {
        self.state = ((self.state as i128 * MULTIPLIER as i128) % MODULUS as i128) as i64;
        self.state
    }

    /// `next / (2^31 - 1)`; in `[0, 1)` for positive seeds
    pub fn uniform(&mut self) -> f64 {
        self.next_int() as f64 / MODULUS as f64
    }

    /// integer in `[min, max]` (inclusive on both ends)
    pub fn int_range(&mut self, min: i64, max: i64) -> i64 {
        let lo = min as f64 - RANGE_BIAS;
        let hi = max as f64 + RANGE_BIAS;
        round_half_up(lo + (hi - lo) * self.uniform()) as i64
    }

    /// continuous value in `[min, max)`
    pub fn random_range(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.uniform()
    }
}

/// rounds halves towards +∞ (`-2.5 → -2`, `2.5 → 3`)
#[inline]
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/* ===========================================================
   rand interop – lets `rand::Rng` helpers run on a Seeder
   =========================================================== */
impl RngCore for Seeder {
    fn next_u32(&mut self) -> u32 {
        // 31 significant bits; shift so the top bit is populated too
        (self.next_int().rem_euclid(MODULUS) as u32) << 1
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
