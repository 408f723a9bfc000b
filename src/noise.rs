//! Seeded lattice value noise and its fractal sum.
//!
//! Every integer lattice corner gets a pseudo-random value from a 64-bit
//! avalanche hash of its coordinates and the seed. Values are blended with
//! quintic smootherstep weights, so the noise is continuous with continuous
//! first and second derivatives.

use crate::{
    interp::{fade, lerp},
    types::{Point, Value},
};

/// Per-octave seed stride; decorrelates the layers of an fbm sum.
pub const OCTAVE_SEED_STRIDE: i64 = 1337;

/// Lower bound on the fbm amplitude sum used as a divisor.
const NORM_EPSILON: Value = 1e-9;

#[inline]
fn hash3(x: i64, y: i64, z: i64, seed: i64) -> u64 {
    let mut h = seed as u64;
    h ^= x.wrapping_mul(0x9E37_79B9_7F4A_7C15_u64 as i64) as u64;
    h ^= y.wrapping_mul(0xC2B2_AE3D_27D4_EB4F_u64 as i64) as u64;
    h ^= z.wrapping_mul(0x1656_67B1_9E37_79F9_u64 as i64) as u64;
    h ^= h >> 27;
    h = h.wrapping_mul(0x3C79_AC49_2BA7_B653);
    h ^= h >> 33;
    h = h.wrapping_mul(0x1C69_B3F7_4AC4_AE35);
    h ^= h >> 27;
    h
}

/// Maps the top 53 bits of a hash to `[0, 1)`.
#[inline]
fn hash_to_unit(h: u64) -> Value {
    (h >> 11) as Value * (1.0 / (1u64 << 53) as Value)
}

#[inline]
fn corner(x: i64, y: i64, z: i64, seed: i64) -> Value {
    hash_to_unit(hash3(x, y, z, seed)) * 2.0 - 1.0
}

/// Value noise in `[-1, 1]`.
///
/// Trilinear blend of the 8 surrounding lattice values:
///
/// ```text
///      011-----111
///      /|      /|
///    010-----110|        y
///     | 001---|-101      |
///     |/      |/         *-- x
///    000-----100        /
///                      z
/// ```
pub fn value_noise3(x: Value, y: Value, z: Value, seed: i64) -> Value {
    let (xf, yf, zf) = (x.floor(), y.floor(), z.floor());
    let (x0, y0, z0) = (xf as i64, yf as i64, zf as i64);
    let (x1, y1, z1) = (x0.wrapping_add(1), y0.wrapping_add(1), z0.wrapping_add(1));

    let u = fade(x - xf);
    let v = fade(y - yf);
    let w = fade(z - zf);

    let x00 = lerp(corner(x0, y0, z0, seed), corner(x1, y0, z0, seed), u);
    let x10 = lerp(corner(x0, y1, z0, seed), corner(x1, y1, z0, seed), u);
    let x01 = lerp(corner(x0, y0, z1, seed), corner(x1, y0, z1, seed), u);
    let x11 = lerp(corner(x0, y1, z1, seed), corner(x1, y1, z1, seed), u);

    lerp(lerp(x00, x10, v), lerp(x01, x11, v), w)
}

/// Fractal Brownian motion over [`value_noise3`], roughly in `[-1, 1]`.
///
/// Octave `i` samples at `base_freq * lacunarity^i` with weight `gain^i` and
/// seed `seed + i * OCTAVE_SEED_STRIDE`. The sum is divided by the total
/// weight, floored at a small epsilon so `octaves == 0` yields `0.0`.
pub fn fbm3(
    p: &Point,
    base_freq: Value,
    octaves: u32,
    lacunarity: Value,
    gain: Value,
    seed: i64,
) -> Value {
    let mut amp = 1.0;
    let mut freq = base_freq;
    let mut sum = 0.0;
    let mut norm = 0.0;

    for i in 0..octaves {
        let octave_seed = seed.wrapping_add((i as i64).wrapping_mul(OCTAVE_SEED_STRIDE));
        sum += value_noise3(p.x * freq, p.y * freq, p.z * freq, octave_seed) * amp;
        norm += amp;
        amp *= gain;
        freq *= lacunarity;
    }

    sum / Value::max(NORM_EPSILON, norm)
}

/// 2D fbm: [`fbm3`] evaluated on the `y = 0` plane.
pub fn fbm2(
    x: Value,
    z: Value,
    base_freq: Value,
    octaves: u32,
    lacunarity: Value,
    gain: Value,
    seed: i64,
) -> Value {
    fbm3(&Point::new(x, 0.0, z), base_freq, octaves, lacunarity, gain, seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_coords() -> impl Iterator<Item = (Value, Value, Value)> {
        (0..2000).map(|i| {
            let t = i as Value;
            (
                (t * 0.731).sin() * 97.3 + t * 0.013,
                (t * 1.177).cos() * 41.9 - t * 0.021,
                (t * 0.389).sin() * 213.7,
            )
        })
    }

    #[test]
    fn value_noise_in_range() {
        for (x, y, z) in sample_coords() {
            let n = value_noise3(x, y, z, 42);
            assert!((-1.0..=1.0).contains(&n), "noise {n} out of range at ({x}, {y}, {z})");
        }
    }

    #[test]
    fn value_noise_is_deterministic() {
        for (x, y, z) in sample_coords().take(200) {
            assert_eq!(value_noise3(x, y, z, 7), value_noise3(x, y, z, 7));
        }
    }

    #[test]
    fn value_noise_matches_lattice_values_at_integers() {
        // At integer coordinates the blend weights collapse onto corner 000.
        for (x, y, z) in [(0, 0, 0), (3, -2, 5), (-7, 11, -1)] {
            let n = value_noise3(x as Value, y as Value, z as Value, 99);
            assert_eq!(n, corner(x, y, z, 99));
        }
    }

    #[test]
    fn value_noise_is_continuous() {
        let eps = 1e-7;
        for (x, y, z) in sample_coords().take(300) {
            let a = value_noise3(x, y, z, 3);
            let b = value_noise3(x + eps, y, z, 3);
            assert!((a - b).abs() < 1e-4);
        }
    }

    #[test]
    fn seed_changes_output() {
        let differing = sample_coords()
            .take(100)
            .filter(|&(x, y, z)| value_noise3(x, y, z, 1) != value_noise3(x, y, z, 2))
            .count();
        assert!(differing > 90);
    }

    #[test]
    fn fbm_stays_in_range() {
        for (x, y, z) in sample_coords() {
            let p = Point::new(x, y, z);
            let n = fbm3(&p, 0.05, 5, 2.0, 0.5, 12345);
            assert!((-1.0..=1.0).contains(&n), "fbm3 {n} out of range");
            let m = fbm2(x, z, 0.015, 5, 2.0, 0.5, 12345);
            assert!((-1.0..=1.0).contains(&m), "fbm2 {m} out of range");
        }
    }

    #[test]
    fn fbm_zero_octaves_is_zero() {
        let p = Point::new(1.5, 2.5, 3.5);
        assert_eq!(fbm3(&p, 1.0, 0, 2.0, 0.5, 1), 0.0);
    }

    #[test]
    fn fbm_zero_gain_is_first_octave() {
        let p = Point::new(4.2, -1.3, 8.8);
        let single = value_noise3(p.x * 0.1, p.y * 0.1, p.z * 0.1, 5);
        assert!((fbm3(&p, 0.1, 4, 2.0, 0.0, 5) - single).abs() < 1e-12);
    }

    #[test]
    fn fbm2_is_fbm3_on_ground_plane() {
        let a = fbm2(12.0, -4.0, 0.03, 3, 2.0, 0.5, 77);
        let b = fbm3(&Point::new(12.0, 0.0, -4.0), 0.03, 3, 2.0, 0.5, 77);
        assert_eq!(a, b);
    }
}
