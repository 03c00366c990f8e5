//! # Deterministic Hash RNG
//!
//! Every random draw in the generator is a pure function of
//! `(cell x, cell z, salt)`. There is no seed state to thread through,
//! so any draw of any cell can be recomputed in isolation.
//!
//! ## Determinism Guarantee
//!
//! Only wrapping 32-bit integer arithmetic is involved before the final
//! division, so the output is bit-identical on every platform.
//!
//! ## Salts
//!
//! A [`Salt`] is a packed address:
//!
//! ```text
//!  31      26 25          14 13      6 5     0
//! ┌──────────┬──────────────┬─────────┬───────┐
//! │  stream  │    object    │ attempt │ field │
//! └──────────┴──────────────┴─────────┴───────┘
//! ```
//!
//! Distinct draws get distinct salts as long as the object, attempt and
//! field indices stay inside their widths; the configuration layer
//! enforces that before generation ever starts.

/// Bits reserved for the object index.
const OBJECT_BITS: u32 = 12;
/// Bits reserved for the attempt index.
const ATTEMPT_BITS: u32 = 8;
/// Bits reserved for the field index.
const FIELD_BITS: u32 = 6;

/// Largest object index a salt can address.
pub const MAX_OBJECT_INDEX: u32 = (1 << OBJECT_BITS) - 1;
/// Largest attempt index a salt can address.
pub const MAX_ATTEMPT_INDEX: u32 = (1 << ATTEMPT_BITS) - 1;
/// Largest field index a salt can address.
pub const MAX_FIELD_INDEX: u32 = (1 << FIELD_BITS) - 1;
/// Number of tree passes that get their own stream.
pub const MAX_TREE_PASSES: usize = 16;

/// Flag bit inside the stream id that separates cosmetic draws.
const COSMETIC_FLAG: u32 = 0b10_0000;

/// Maps `(ix, iz, salt)` to a float in `[0, 1)`.
///
/// Negative coordinates are folded in as their two's-complement bits.
#[inline]
#[must_use]
pub fn rand(ix: i32, iz: i32, salt: u32) -> f64 {
    f64::from(mix(ix, iz, salt)) / 4_294_967_296.0
}

/// Raw 32-bit hash behind [`rand`].
#[inline]
#[must_use]
pub const fn mix(ix: i32, iz: i32, salt: u32) -> u32 {
    let mut h = 0x6A09_E667 ^ (ix as u32);
    h = (h ^ 0x85EB_CA6B).wrapping_mul(0xC2B2_AE35);
    h = (h ^ 0x27D4_EB2F ^ (iz as u32)).wrapping_mul(0xC2B2_AE35);
    h = (h ^ 0x1656_67B1 ^ salt).wrapping_mul(0xC2B2_AE35);
    fmix32(h)
}

/// Murmur3 finalizer.
#[inline]
const fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 13;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^= h >> 16;
    h
}

/// Named random streams. Each logical kind of draw lives in its own stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stream {
    /// Paths crossing a north-south boundary.
    PathNorthSouth,
    /// Paths crossing an east-west boundary.
    PathEastWest,
    /// How many flower clusters a cell gets.
    ClusterCount,
    /// Cluster center positions.
    ClusterCenter,
    /// Size of each cluster (small/large roll and member count).
    ClusterSize,
    /// Flowers inside clusters.
    ClusterFlower,
    /// How many single flowers a cell gets.
    SingleCount,
    /// Single flowers.
    SingleFlower,
    /// How many animals a cell gets.
    AnimalCount,
    /// Animals.
    Animal,
    /// One stream per configured tree pass.
    TreePass(u8),
}

impl Stream {
    /// Numeric stream id (5 bits, the sixth is the cosmetic flag).
    #[must_use]
    pub const fn id(self) -> u32 {
        match self {
            Self::PathNorthSouth => 1,
            Self::PathEastWest => 2,
            Self::ClusterCount => 3,
            Self::ClusterCenter => 4,
            Self::ClusterSize => 5,
            Self::ClusterFlower => 6,
            Self::SingleCount => 7,
            Self::SingleFlower => 8,
            Self::AnimalCount => 9,
            Self::Animal => 10,
            Self::TreePass(pass) => 16 + (pass as u32 & 0x0F),
        }
    }
}

/// Address of one random draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Salt(u32);

impl Salt {
    /// Salt for a positional draw: where an object goes, attempt by attempt.
    #[inline]
    #[must_use]
    pub const fn position(stream: Stream, object: u32, attempt: u32, field: u32) -> Self {
        Self::pack(stream.id(), object, attempt, field)
    }

    /// Salt for a cosmetic draw. Never collides with any positional salt.
    #[inline]
    #[must_use]
    pub const fn cosmetic(stream: Stream, object: u32, field: u32) -> Self {
        Self::pack(stream.id() | COSMETIC_FLAG, object, 0, field)
    }

    /// Salt for a per-cell draw that belongs to no object (counts, edges).
    #[inline]
    #[must_use]
    pub const fn cell(stream: Stream, field: u32) -> Self {
        Self::pack(stream.id(), 0, 0, field)
    }

    #[inline]
    const fn pack(stream: u32, object: u32, attempt: u32, field: u32) -> Self {
        Self(
            (stream << (OBJECT_BITS + ATTEMPT_BITS + FIELD_BITS))
                | ((object & MAX_OBJECT_INDEX) << (ATTEMPT_BITS + FIELD_BITS))
                | ((attempt & MAX_ATTEMPT_INDEX) << FIELD_BITS)
                | (field & MAX_FIELD_INDEX),
        )
    }

    /// Raw salt value as fed to [`rand`].
    #[inline]
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// Random view bound to one cell coordinate.
///
/// Copyable and stateless: two `CellRng`s for the same cell answer every
/// salt identically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRng {
    ix: i32,
    iz: i32,
}

impl CellRng {
    /// Binds the RNG to a cell.
    #[inline]
    #[must_use]
    pub const fn new(ix: i32, iz: i32) -> Self {
        Self { ix, iz }
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    #[must_use]
    pub fn unit(self, salt: Salt) -> f64 {
        rand(self.ix, self.iz, salt.value())
    }

    /// Uniform draw in `[lo, hi)`; returns `lo` when the range is empty.
    #[inline]
    #[must_use]
    pub fn range(self, salt: Salt, lo: f64, hi: f64) -> f64 {
        lo + self.unit(salt) * (hi - lo)
    }

    /// Uniform draw in `[-half, half)`.
    #[inline]
    #[must_use]
    pub fn signed(self, salt: Salt, half: f64) -> f64 {
        (self.unit(salt) - 0.5) * 2.0 * half
    }

    /// Uniform index in `0..n`. `n == 0` yields 0.
    #[inline]
    #[must_use]
    pub fn index(self, salt: Salt, n: usize) -> usize {
        ((self.unit(salt) * n as f64) as usize).min(n.saturating_sub(1))
    }

    /// Uniform integer in `min..=max`.
    #[inline]
    #[must_use]
    pub fn count(self, salt: Salt, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.unit(salt) * f64::from(span)) as u32
    }

    /// Bernoulli draw with success probability `p`.
    #[inline]
    #[must_use]
    pub fn chance(self, salt: Salt, p: f64) -> bool {
        self.unit(salt) < p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        for i in -50..50 {
            assert_eq!(rand(i, -i * 3, 77), rand(i, -i * 3, 77));
        }
    }

    #[test]
    fn test_range_including_extremes() {
        let corners = [i32::MIN, -1, 0, 1, i32::MAX];
        for &x in &corners {
            for &z in &corners {
                for salt in [0, 1, u32::MAX] {
                    let v = rand(x, z, salt);
                    assert!((0.0..1.0).contains(&v), "rand({x}, {z}, {salt}) = {v}");
                }
            }
        }
    }

    #[test]
    fn test_negative_coordinates_differ_from_positive() {
        assert_ne!(rand(-3, 5, 9), rand(3, 5, 9));
        assert_ne!(rand(3, -5, 9), rand(3, 5, 9));
    }

    #[test]
    fn test_adjacent_salts_decorrelated() {
        // A weak finalizer makes rand(s+1) - rand(s) nearly constant.
        let mut diffs = Vec::new();
        for s in 0..200u32 {
            diffs.push(rand(4, 4, s + 1) - rand(4, 4, s));
        }
        let mean = diffs.iter().sum::<f64>() / diffs.len() as f64;
        let var = diffs.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / diffs.len() as f64;
        // Difference of two independent U(0,1) has variance 1/6.
        assert!(var > 0.1, "salt differences too regular: var = {var}");
    }

    #[test]
    fn test_salt_fields_do_not_alias() {
        let a = Salt::position(Stream::Animal, 1, 0, 0);
        let b = Salt::position(Stream::Animal, 0, 1, 0);
        let c = Salt::position(Stream::Animal, 0, 0, 1);
        let d = Salt::cosmetic(Stream::Animal, 1, 0);
        let e = Salt::position(Stream::TreePass(0), 1, 0, 0);
        let all = [a, b, c, d, e];
        for (i, x) in all.iter().enumerate() {
            for y in &all[i + 1..] {
                assert_ne!(x, y);
            }
        }
    }

    #[test]
    fn test_cosmetic_never_equals_positional() {
        for object in [0, 1, 17, MAX_OBJECT_INDEX] {
            for field in 0..8 {
                let cosmetic = Salt::cosmetic(Stream::ClusterFlower, object, field);
                for attempt in 0..8 {
                    assert_ne!(
                        cosmetic,
                        Salt::position(Stream::ClusterFlower, object, attempt, field)
                    );
                }
            }
        }
    }

    #[test]
    fn test_count_is_inclusive() {
        let rng = CellRng::new(0, 0);
        let mut seen = [false; 3];
        for field in 0..64 {
            for object in 0..32 {
                let n = rng.count(Salt::position(Stream::ClusterCount, object, 0, field), 0, 2);
                seen[n as usize] = true;
            }
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn test_index_in_bounds() {
        let rng = CellRng::new(-9, 12);
        for object in 0..500 {
            assert!(rng.index(Salt::position(Stream::Animal, object, 0, 0), 4) < 4);
        }
        assert_eq!(rng.index(Salt::cell(Stream::Animal, 0), 0), 0);
    }
}
