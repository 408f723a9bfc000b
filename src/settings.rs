//! Plain-data configuration handed to the generators.
//!
//! Settings are `Copy` and owned by each generator, so two generators built
//! from the same template never observe each other's changes. Range checks
//! belong to the caller; [`WormSettings::validate`] and
//! [`TerrainSettings::validate`] are available for that.

use crate::{
    error::{Error, Result},
    types::{Point, Value},
};

/// How long each worm step is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentSize {
    Fixed(Value),
    /// Uniformly distributed in `[min, max]`.
    Uniform { min: Value, max: Value },
}

impl SegmentSize {
    /// Smallest step this policy can produce; drives the "close enough" test.
    pub fn min(&self) -> Value {
        match *self {
            SegmentSize::Fixed(size) => size,
            SegmentSize::Uniform { min, .. } => min,
        }
    }

    pub fn max(&self) -> Value {
        match *self {
            SegmentSize::Fixed(size) => size,
            SegmentSize::Uniform { max, .. } => max,
        }
    }

    pub fn is_random(&self) -> bool {
        matches!(self, SegmentSize::Uniform { .. })
    }
}

impl Default for SegmentSize {
    fn default() -> Self {
        SegmentSize::Fixed(1.0)
    }
}

/// Configuration for a single worm path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WormSettings {
    pub start: Point,
    pub end: Point,
    pub segment_size: SegmentSize,
    /// Step budget; the path has at most `num_steps + 2` points.
    pub num_steps: usize,
    /// Pull toward `end` at the first step.
    pub base_attraction: Value,
    /// Extra pull added linearly over the step budget (total is capped at 0.8).
    pub attraction_growth: Value,
    /// Weight of the random direction mixed into every step.
    pub wander_strength: Value,
    pub seed: u64,
}

impl Default for WormSettings {
    fn default() -> Self {
        Self {
            start: Point::origin(),
            end: Point::new(50.0, 20.0, 50.0),
            segment_size: SegmentSize::default(),
            num_steps: 2000,
            base_attraction: 0.05,
            attraction_growth: 0.7,
            wander_strength: 0.8,
            seed: 0,
        }
    }
}

impl WormSettings {
    pub fn with_endpoints(mut self, start: Point, end: Point) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_segment_size(mut self, segment_size: SegmentSize) -> Self {
        self.segment_size = segment_size;
        self
    }

    pub fn with_steps(mut self, num_steps: usize) -> Self {
        self.num_steps = num_steps;
        self
    }

    pub fn with_attraction(mut self, base: Value, growth: Value) -> Self {
        self.base_attraction = base;
        self.attraction_growth = growth;
        self
    }

    pub fn with_wander(mut self, wander_strength: Value) -> Self {
        self.wander_strength = wander_strength;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Rejects segment sizes that are non-positive or an empty random range.
    pub fn validate(&self) -> Result<()> {
        match self.segment_size {
            SegmentSize::Fixed(size) if size <= 0.0 => Err(Error::NonPositiveSegmentSize),
            SegmentSize::Uniform { min, .. } if min <= 0.0 => Err(Error::NonPositiveSegmentSize),
            SegmentSize::Uniform { min, max } if min >= max => {
                Err(Error::InvalidSegmentRange { min, max })
            }
            _ => Ok(()),
        }
    }
}

/// Configuration for the Perlin heightmap and its wireframe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainSettings {
    pub grid_x: usize,
    pub grid_z: usize,
    /// World distance between neighbouring grid cells.
    pub spacing: Value,
    pub seed: u64,

    /// Grid-to-noise coordinate scale.
    pub noise_scale: Value,
    pub amplitude: Value,
    pub octaves: u32,
    pub persistence: Value,
    pub lacunarity: Value,

    pub ridged: bool,
    /// Flip heights so peaks become valleys.
    pub valleys: bool,
    /// Exponent applied to the shaped `[0, 1]` height.
    pub sharpness: Value,
    pub smooth_iterations: usize,

    pub draw_rows: bool,
    pub draw_cols: bool,

    pub stroke_min: Value,
    pub stroke_max: Value,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            grid_x: 80,
            grid_z: 80,
            spacing: 2.0,
            seed: 1337,
            noise_scale: 0.05,
            amplitude: 35.0,
            octaves: 5,
            persistence: 0.5,
            lacunarity: 2.0,
            ridged: true,
            valleys: false,
            sharpness: 2.2,
            smooth_iterations: 2,
            draw_rows: true,
            draw_cols: true,
            stroke_min: 0.6,
            stroke_max: 2.5,
        }
    }
}

impl TerrainSettings {
    pub fn with_grid(mut self, grid_x: usize, grid_z: usize, spacing: Value) -> Self {
        self.grid_x = grid_x;
        self.grid_z = grid_z;
        self.spacing = spacing;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_noise(
        mut self,
        noise_scale: Value,
        amplitude: Value,
        octaves: u32,
        persistence: Value,
        lacunarity: Value,
    ) -> Self {
        self.noise_scale = noise_scale;
        self.amplitude = amplitude;
        self.octaves = octaves;
        self.persistence = persistence;
        self.lacunarity = lacunarity;
        self
    }

    pub fn with_shape(mut self, ridged: bool, valleys: bool, sharpness: Value) -> Self {
        self.ridged = ridged;
        self.valleys = valleys;
        self.sharpness = sharpness;
        self
    }

    pub fn with_smoothing(mut self, iterations: usize) -> Self {
        self.smooth_iterations = iterations;
        self
    }

    pub fn with_lines(mut self, rows: bool, cols: bool) -> Self {
        self.draw_rows = rows;
        self.draw_cols = cols;
        self
    }

    /// Grid dimensions actually used for generation (each at least 2).
    pub fn effective_grid(&self) -> (usize, usize) {
        (self.grid_x.max(2), self.grid_z.max(2))
    }

    /// Segment-size snapshot carried by terrain polylines so a renderer can
    /// map stroke widths the same way it does for worms.
    pub fn stroke_settings(&self) -> WormSettings {
        WormSettings::default().with_segment_size(SegmentSize::Uniform {
            min: self.stroke_min,
            max: self.stroke_max,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_x < 2 || self.grid_z < 2 {
            return Err(Error::InvalidGrid {
                x: self.grid_x,
                z: self.grid_z,
            });
        }
        if self.spacing.is_nan() || self.spacing <= 0.0 {
            return Err(Error::NonPositiveSpacing);
        }
        Ok(())
    }
}
