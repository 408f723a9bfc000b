//! Classic 2D gradient noise used by the heightmap generator.
//!
//! Kept separate from the lattice value noise in [`crate::noise`]: the two
//! kernels have different visual character and each drives its own generator.

use rand::{SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;

use crate::{
    interp::{fade, lerp},
    types::Value,
};

/// Permutation-table gradient noise.
#[derive(Clone)]
pub struct PerlinNoise {
    perm: [u8; 512],
}

impl PerlinNoise {
    /// Builds the permutation table: a seeded Fisher–Yates shuffle of `0..=255`,
    /// duplicated so corner lookups never need a modulo.
    pub fn new(seed: u64) -> Self {
        let mut base: Vec<u8> = (0..=255).collect();
        base.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = base[i & 255];
        }
        Self { perm }
    }

    #[inline]
    fn p(&self, i: usize) -> usize {
        self.perm[i] as usize
    }

    /// Gradient noise, roughly in `[-1, 1]`. Zero at every integer lattice point.
    pub fn noise(&self, x: Value, y: Value) -> Value {
        let (xf, yf) = (x.floor(), y.floor());
        let xi = (xf as i64 & 255) as usize;
        let yi = (yf as i64 & 255) as usize;

        let (dx, dy) = (x - xf, y - yf);
        let u = fade(dx);
        let v = fade(dy);

        let aa = self.p(self.p(xi) + yi);
        let ab = self.p(self.p(xi) + yi + 1);
        let ba = self.p(self.p(xi + 1) + yi);
        let bb = self.p(self.p(xi + 1) + yi + 1);

        let x1 = lerp(grad(aa, dx, dy), grad(ba, dx - 1.0, dy), u);
        let x2 = lerp(grad(ab, dx, dy - 1.0), grad(bb, dx - 1.0, dy - 1.0), u);
        lerp(x1, x2, v)
    }

    /// Fractal sum normalized by the accumulated amplitude.
    ///
    /// Returns `0.0` when there is nothing to normalize by (`octaves == 0`).
    pub fn fbm(
        &self,
        x: Value,
        y: Value,
        octaves: u32,
        persistence: Value,
        lacunarity: Value,
    ) -> Value {
        let mut amp = 1.0;
        let mut freq = 1.0;
        let mut sum = 0.0;
        let mut amp_sum = 0.0;

        for _ in 0..octaves {
            sum += self.noise(x * freq, y * freq) * amp;
            amp_sum += amp;
            amp *= persistence;
            freq *= lacunarity;
        }

        if amp_sum < 1e-9 { 0.0 } else { sum / amp_sum }
    }
}

/// Dot product with one of the four diagonal gradients.
#[inline]
fn grad(hash: usize, x: Value, y: Value) -> Value {
    match hash & 3 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        _ => -x - y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permutation_is_a_doubled_bijection() {
        let pn = PerlinNoise::new(1337);
        let mut seen = [false; 256];
        for &v in &pn.perm[..256] {
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(pn.perm[..256], pn.perm[256..]);
    }

    #[test]
    fn same_seed_same_table() {
        assert_eq!(PerlinNoise::new(5).perm, PerlinNoise::new(5).perm);
        assert_ne!(PerlinNoise::new(5).perm, PerlinNoise::new(6).perm);
    }

    #[test]
    fn zero_on_lattice() {
        let pn = PerlinNoise::new(9);
        for (x, y) in [(0.0, 0.0), (3.0, 7.0), (-4.0, 12.0), (300.0, -2.0)] {
            assert_eq!(pn.noise(x, y), 0.0);
        }
    }

    #[test]
    fn noise_and_fbm_bounded() {
        let pn = PerlinNoise::new(1337);
        for i in 0..1500 {
            let t = i as Value;
            let (x, y) = ((t * 0.37).sin() * 60.0 + t * 0.05, (t * 0.91).cos() * 45.0 - t * 0.03);
            let n = pn.noise(x, y);
            assert!(n.abs() <= 1.0 + 1e-9, "noise {n}");
            let f = pn.fbm(x, y, 5, 0.5, 2.0);
            assert!(f.abs() <= 1.0 + 1e-9, "fbm {f}");
        }
    }

    #[test]
    fn fbm_without_octaves_is_zero() {
        let pn = PerlinNoise::new(1);
        assert_eq!(pn.fbm(0.3, 0.7, 0, 0.5, 2.0), 0.0);
    }
}
