//! Deterministic pseudo-random numbers for sampling and dithering.
//!
//! [`Random`] is the generator; the sampling functions in this module accept any
//! [`RngCore`] so that callers may substitute a different source of draws.

use rand::{RngCore, SeedableRng};

use crate::math::{Vector, clamp};

/// The state every [`Random::new()`] starts from.
const DEFAULT_STATE: [u64; 2] = [0xC0DE_C0DE_C0DE_C0DE, 0xC0DE_C0DE_C0DE_C0DE];

/// `2^-64`, which maps a full-range `u64` onto `[0, 1]`.
const U64_TO_UNIT: f32 = 1.0 / 18_446_744_073_709_551_616.0;

/// The largest `f32` less than 1.
const BELOW_ONE: f32 = 1.0 - f32::EPSILON / 2.0;

/// A xorshift128+ pseudo-random number generator.
///
/// Every generator created by [`Random::new()`] (or [`Default`]) starts from the same fixed
/// state, and therefore produces the same sequence of numbers, on every platform and in
/// every run. It is not suitable for anything security-related.
///
/// The 64-bit output is available through [`RngCore::next_u64()`]; the period is
/// `2^128 - 1`.
///
/// ```
/// use penumbra_base::random::Random;
/// use rand::RngCore as _;
///
/// let mut a = Random::new();
/// let mut b = Random::new();
/// assert_eq!(a.next_u64(), b.next_u64());
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Random {
    s: [u64; 2],
}

impl Random {
    /// Constructs a generator in the fixed initial state.
    #[inline]
    pub const fn new() -> Self {
        Self { s: DEFAULT_STATE }
    }

    /// Returns a number uniformly distributed in `[0, 1)`. See [`next_float()`].
    #[inline]
    pub fn next_float(&mut self) -> f32 {
        next_float(self)
    }

    /// Returns a vector uniformly distributed in the unit ball. See [`random_vector()`].
    #[inline]
    pub fn random_vector(&mut self) -> Vector {
        random_vector(self)
    }
}

impl Default for Random {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl RngCore for Random {
    /// Returns the high half of [`Self::next_u64()`], which has the better statistical
    /// quality of the two.
    #[inline]
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        let [s0, s1] = self.s;
        let result = s0.wrapping_add(s1);
        let t = s0 ^ (s0 << 23);
        self.s = [s1, t ^ s1 ^ (t >> 18) ^ (s1 >> 5)];
        result
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

/// Seeding exists so that independent workers can each own a generator.
/// The state is the two little-endian words of the seed, except that the all-zero
/// seed (from which xorshift would only ever produce zero) is replaced by the
/// default state.
impl SeedableRng for Random {
    type Seed = [u8; 16];

    fn from_seed(seed: Self::Seed) -> Self {
        let (low, high) = seed.split_at(8);
        let mut s = [0; 2];
        for (word, bytes) in s.iter_mut().zip([low, high]) {
            let mut buf = [0; 8];
            buf.copy_from_slice(bytes);
            *word = u64::from_le_bytes(buf);
        }
        if s == [0, 0] {
            s = DEFAULT_STATE;
        }
        Self { s }
    }
}

/// Returns a number uniformly distributed in `[0, 1)`, computed as one 64-bit draw
/// divided by `2^64`.
///
/// Draws close enough to `2^64` that they round up to 1 when converted to `f32` produce
/// the largest value below 1 instead.
#[inline]
pub fn next_float<R: RngCore + ?Sized>(random: &mut R) -> f32 {
    (random.next_u64() as f32 * U64_TO_UNIT).min(BELOW_ONE)
}

/// Returns a vector uniformly distributed within the closed unit ball.
///
/// This uses rejection sampling: candidates are drawn from the cube `[-1, 1]³`, one
/// [`next_float()`] per component in `x, y, z` order, until one lies within the ball.
/// About 52% of candidates are accepted, so the expected number of attempts is under two,
/// but the number of draws consumed is not fixed.
pub fn random_vector<R: RngCore + ?Sized>(random: &mut R) -> Vector {
    loop {
        let x = next_float(random) * 2.0 - 1.0;
        let y = next_float(random) * 2.0 - 1.0;
        let z = next_float(random) * 2.0 - 1.0;
        let v = Vector::new(x, y, z);
        if v.dot(v) <= 1.0 {
            return v;
        }
    }
}

/// Quantizes a component value, nominally in `[0, 1]`, to 8 bits.
///
/// One [`next_float()`] is added before truncation, so values between two levels are
/// rounded up or down with probability proportional to their distance from each; this
/// trades banding for noise when the value came from probabilistic accumulation.
#[inline]
pub fn dither<R: RngCore + ?Sized>(random: &mut R, value: f32) -> u8 {
    clamp(value * 255.0 + next_float(random), 0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    /// An [`RngCore`] that yields a predetermined sequence of `u64`s.
    #[derive(Debug)]
    struct Scripted<const N: usize> {
        values: [u64; N],
        next: usize,
    }

    impl<const N: usize> Scripted<N> {
        fn new(values: [u64; N]) -> Self {
            Self { values, next: 0 }
        }
    }

    impl<const N: usize> RngCore for Scripted<N> {
        fn next_u32(&mut self) -> u32 {
            (self.next_u64() >> 32) as u32
        }
        fn next_u64(&mut self) -> u64 {
            let value = self.values[self.next];
            self.next += 1;
            value
        }
        fn fill_bytes(&mut self, _: &mut [u8]) {
            unimplemented!()
        }
    }

    #[test]
    fn known_sequence() {
        let mut random = Random::new();
        assert_eq!(
            [
                random.next_u64(),
                random.next_u64(),
                random.next_u64(),
                random.next_u64()
            ],
            [
                0x81bd81bd81bd81bc,
                0x2a457367f3c81ecf,
                0x2ef9b5d5b238da28,
                0xb3d3595aa6a524f4,
            ]
        );
    }

    #[test]
    fn deterministic() {
        let mut a = Random::new();
        let mut b = Random::default();
        for i in 0..10_000 {
            assert_eq!(a.next_u64(), b.next_u64(), "draw {i}");
        }
    }

    #[test]
    fn next_u32_is_high_half() {
        let mut a = Random::new();
        let mut b = Random::new();
        assert_eq!(u64::from(a.next_u32()), b.next_u64() >> 32);
    }

    #[test]
    fn fill_bytes_matches_words() {
        let mut a = Random::new();
        let mut b = Random::new();
        let mut bytes = [0u8; 12];
        a.fill_bytes(&mut bytes);
        let first = b.next_u64().to_le_bytes();
        let second = b.next_u64().to_le_bytes();
        assert_eq!(bytes[..8], first);
        assert_eq!(bytes[8..], second[..4]);
    }

    #[test]
    fn seeding() {
        assert_eq!(Random::from_seed([0; 16]), Random::new());
        let mut seeded = Random::from_seed([1, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(seeded.s, [1, 2]);
        assert_eq!(seeded.next_u64(), 3);
        assert_ne!(Random::seed_from_u64(0), Random::seed_from_u64(1));
        assert_eq!(Random::seed_from_u64(7), Random::seed_from_u64(7));
    }

    #[test]
    fn next_float_range() {
        assert_eq!(next_float(&mut Scripted::new([0])), 0.0);
        assert_eq!(next_float(&mut Scripted::new([1 << 63])), 0.5);
        let top = next_float(&mut Scripted::new([u64::MAX]));
        assert!(top < 1.0, "{top}");
        assert_eq!(top, BELOW_ONE);

        let mut random = Random::new();
        for _ in 0..10_000 {
            let f = random.next_float();
            assert!((0.0..1.0).contains(&f), "{f}");
        }
    }

    #[test]
    fn next_float_mean() {
        let mut random = Random::new();
        let n = 100_000;
        let mean = (0..n).map(|_| f64::from(random.next_float())).sum::<f64>() / f64::from(n);
        assert!((mean - 0.5).abs() < 0.005, "{mean}");
    }

    #[test]
    fn random_vector_rejects_outside_ball() {
        // First candidate is the corner (1, 1, 1) (nearly); second is (0, 0, 0.5).
        let mut scripted = Scripted::new([
            u64::MAX,
            u64::MAX,
            u64::MAX,
            1 << 63,
            1 << 63,
            3 << 62,
        ]);
        assert_eq!(random_vector(&mut scripted), Vector::new(0.0, 0.0, 0.5));
    }

    #[test]
    fn random_vector_distribution() {
        let mut random = Random::new();
        let n = 100_000;
        let mut sum = Vector::zero();
        let mut inner = 0;
        let mut outer_shell = 0;
        for _ in 0..n {
            let v = random.random_vector();
            let r2 = v.square_length();
            assert!(r2 <= 1.0, "{v:?}");
            sum += v;
            // volume fraction of the ball of radius 1/2 is 1/8
            if r2 <= 0.25 {
                inner += 1;
            }
            // volume fraction of the shell beyond radius 0.9 is 1 - 0.729
            if r2 > 0.81 {
                outer_shell += 1;
            }
        }
        let mean = sum / n as f32;
        assert!(mean.length() < 0.01, "mean {mean:?}");
        let inner_fraction = f64::from(inner) / f64::from(n);
        let outer_fraction = f64::from(outer_shell) / f64::from(n);
        assert!((inner_fraction - 0.125).abs() < 0.01, "{inner_fraction}");
        assert!((outer_fraction - 0.271).abs() < 0.01, "{outer_fraction}");
    }

    #[test]
    fn dither_extremes() {
        assert_eq!(dither(&mut Scripted::new([0]), 1.0), 255);
        assert_eq!(dither(&mut Scripted::new([u64::MAX]), 1.0), 255);
        assert_eq!(dither(&mut Scripted::new([0]), 0.0), 0);
        assert_eq!(dither(&mut Scripted::new([u64::MAX]), 0.0), 0);
        assert_eq!(dither(&mut Scripted::new([0]), -3.0), 0);
        assert_eq!(dither(&mut Scripted::new([0]), 7.0), 255);
    }

    #[test]
    fn dither_rounds_probabilistically() {
        // 0.5 / 255 lies halfway between levels 0 and 1.
        let value = 0.5 / 255.0;
        assert_eq!(dither(&mut Scripted::new([1 << 62]), value), 0);
        assert_eq!(dither(&mut Scripted::new([3 << 62]), value), 1);

        let mut random = Random::new();
        let ones = (0..10_000).filter(|_| dither(&mut random, value) == 1).count();
        assert!((4_500..5_500).contains(&ones), "{ones}");
    }
}
