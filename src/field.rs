use crate::{
    noise::{fbm2, fbm3},
    types::{Point, Value, Vector},
};

/// A scalar field over space whose sign classifies solid and empty.
///
/// Values **above** zero are solid; values at or below zero are air.
/// Implementations must be pure: the same point always gives the same value.
pub trait DensityField: Sync {
    fn density(&self, p: &Point) -> Value;
}

/// Any thread-safe closure `Fn(Point) -> Value` is a density field.
///
/// ```rust
/// use terrain_worms::{field::DensityField, types::Point};
///
/// let ball = |p: Point| 4.0 - p.coords.norm();
/// assert!(ball.density(&Point::origin()) > 0.0);
/// ```
impl<F> DensityField for F
where
    F: Fn(Point) -> Value + Sync,
{
    #[inline]
    fn density(&self, p: &Point) -> Value {
        self(*p)
    }
}

const SURFACE_OCTAVES: u32 = 5;
const WARP_OCTAVES: u32 = 3;
const CAVE_OCTAVES: u32 = 5;
const LACUNARITY: Value = 2.0;
const GAIN: Value = 0.5;

/// Seed offsets giving the three warp axes and the cave field independent noise.
const WARP_SEED_OFFSETS: [i64; 3] = [100, 200, 300];
const CAVE_SEED_OFFSET: i64 = 999;

/// Rolling fbm terrain with domain-warped caves carved underneath.
///
/// ```text
/// density = h - y                         above ground, or within min_depth of it
///         = min(h - y, threshold - cave)  deeper down
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaveTerrain {
    pub seed: i64,

    /// Mean ground height.
    pub surface_base_y: Value,
    /// Height variation around `surface_base_y`.
    pub surface_amp: Value,
    pub surface_freq: Value,

    /// Lower => bigger caves.
    pub cave_freq: Value,
    pub cave_warp_freq: Value,
    /// Warp displacement in world units.
    pub cave_warp_amp: Value,
    /// Higher => fewer caves.
    pub cave_threshold: Value,

    /// Caves never open closer than this to the ground surface.
    pub min_depth_below_surface: Value,
}

impl Default for CaveTerrain {
    fn default() -> Self {
        Self {
            seed: 12345,
            surface_base_y: 40.0,
            surface_amp: 18.0,
            surface_freq: 0.015,
            cave_freq: 0.035,
            cave_warp_freq: 0.02,
            cave_warp_amp: 18.0,
            cave_threshold: 0.28,
            min_depth_below_surface: 8.0,
        }
    }
}

impl CaveTerrain {
    pub fn new(seed: i64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    pub fn with_surface(mut self, base_y: Value, amp: Value, freq: Value) -> Self {
        self.surface_base_y = base_y;
        self.surface_amp = amp;
        self.surface_freq = freq;
        self
    }

    pub fn with_caves(mut self, freq: Value, threshold: Value) -> Self {
        self.cave_freq = freq;
        self.cave_threshold = threshold;
        self
    }

    pub fn with_warp(mut self, freq: Value, amp: Value) -> Self {
        self.cave_warp_freq = freq;
        self.cave_warp_amp = amp;
        self
    }

    pub fn with_min_depth(mut self, depth: Value) -> Self {
        self.min_depth_below_surface = depth;
        self
    }

    /// Ground height at `(x, z)`.
    pub fn surface_height(&self, x: Value, z: Value) -> Value {
        self.surface_base_y
            + self.surface_amp
                * fbm2(x, z, self.surface_freq, SURFACE_OCTAVES, LACUNARITY, GAIN, self.seed)
    }

    /// Displacement applied to `p` before sampling the cave field.
    pub fn warp_offset(&self, p: &Point) -> Vector {
        let axis = |offset: i64| {
            fbm3(
                p,
                self.cave_warp_freq,
                WARP_OCTAVES,
                LACUNARITY,
                GAIN,
                self.seed.wrapping_add(offset),
            ) * self.cave_warp_amp
        };
        Vector::new(
            axis(WARP_SEED_OFFSETS[0]),
            axis(WARP_SEED_OFFSETS[1]),
            axis(WARP_SEED_OFFSETS[2]),
        )
    }

    /// Raw cave noise at `p`, after domain warping.
    pub fn cave_value(&self, p: &Point) -> Value {
        let warped = p + self.warp_offset(p);
        fbm3(
            &warped,
            self.cave_freq,
            CAVE_OCTAVES,
            LACUNARITY,
            GAIN,
            self.seed.wrapping_add(CAVE_SEED_OFFSET),
        )
    }
}

impl DensityField for CaveTerrain {
    fn density(&self, p: &Point) -> Value {
        let h = self.surface_height(p.x, p.z);
        let rock = h - p.y;
        if rock <= 0.0 {
            return rock;
        }

        // Keep a solid crust so caves never break through the ground.
        if p.y > h - self.min_depth_below_surface {
            return rock;
        }

        let carve = self.cave_threshold - self.cave_value(p);
        rock.min(carve)
    }
}
