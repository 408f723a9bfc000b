//! Perlin heightmap terrain rendered as a row/column wireframe.
//!
//! ```text
//! fbm per cell → shape (ridged | standard, ^sharpness, ±amplitude)
//!              → box-blur × smooth_iterations
//!              → min/max (color range only)
//!              → rows/cols every `stride` cells → TerrainPolyline
//! ```
//!
//! The stride only changes how densely the finished heightmap is walked;
//! the heightmap itself is always built and smoothed at full resolution.

use ndarray::{Array2, Zip, s};
use tracing::instrument;

use crate::{
    interp::{clamp01, remap},
    path::{PathGenerator, Polyline},
    perlin::PerlinNoise,
    settings::{TerrainSettings, WormSettings},
    types::{Color, Point, Value},
};

/// Lowest accepted detail fraction for [`Heightmap::wireframe_detail`].
const MIN_DETAIL: Value = 0.05;

/// Hue at the bottom (blue) of the height color ramp; the top is red (0.0).
const LOW_HUE: Value = 0.66;
const LOW_BRIGHTNESS: Value = 0.55;

/// Shapes one raw fbm sample in `[-1, 1]` into a terrain height.
pub fn shape_height(n: Value, settings: &TerrainSettings) -> Value {
    let base = if settings.ridged {
        clamp01(1.0 - n.abs())
    } else {
        clamp01((n + 1.0) * 0.5)
    };
    let h = base.powf(settings.sharpness) * settings.amplitude;
    if settings.valleys { -h } else { h }
}

/// Averages each cell with its in-bounds 3×3 neighbourhood, `iterations` times.
///
/// Border cells average only the neighbours that exist: no wraparound, no padding.
pub fn smooth_heights(heights: &mut Array2<Value>, iterations: usize) {
    let (rows, cols) = heights.dim();
    if rows == 0 || cols == 0 {
        return;
    }

    let mut tmp = Array2::<Value>::zeros((rows, cols));
    for _ in 0..iterations {
        let src = &*heights;
        Zip::indexed(&mut tmp).par_for_each(|(z, x), out| {
            let window = src.slice(s![
                z.saturating_sub(1)..(z + 2).min(rows),
                x.saturating_sub(1)..(x + 2).min(cols)
            ]);
            *out = window.sum() / window.len() as Value;
        });
        std::mem::swap(heights, &mut tmp);
    }
}

/// `(min, max)` over all cells. `(+inf, -inf)` for an empty map.
pub fn height_range(heights: &Array2<Value>) -> (Value, Value) {
    heights.iter().fold(
        (Value::INFINITY, Value::NEG_INFINITY),
        |(lo, hi), &h| (lo.min(h), hi.max(h)),
    )
}

/// Converts a detail fraction to a sampling stride: `1.0` is every cell, `0.25` every 4th.
///
/// Values at or below zero are raised to 0.05 and values above one are clamped to one.
pub fn detail_stride(detail: Value) -> usize {
    let detail = if detail <= 0.0 || detail.is_nan() {
        MIN_DETAIL
    } else {
        detail.min(1.0)
    };
    ((1.0 / detail).round() as usize).max(1)
}

/// A full-resolution, smoothed heightmap indexed `[z, x]`.
#[derive(Debug, Clone)]
pub struct Heightmap {
    settings: TerrainSettings,
    heights: Array2<Value>,
    min: Value,
    max: Value,
}

impl Heightmap {
    /// Evaluates, shapes and smooths the heightmap, then records its range.
    #[instrument(skip_all)]
    pub fn generate(settings: &TerrainSettings) -> Self {
        let (gx, gz) = settings.effective_grid();
        let noise = PerlinNoise::new(settings.seed);

        let mut heights = Array2::<Value>::zeros((gz, gx));
        Zip::indexed(&mut heights).par_for_each(|(z, x), h| {
            let n = noise.fbm(
                x as Value * settings.noise_scale,
                z as Value * settings.noise_scale,
                settings.octaves,
                settings.persistence,
                settings.lacunarity,
            );
            *h = shape_height(n, settings);
        });

        Self::from_heights(heights, *settings)
    }

    /// Wraps precomputed raw heights: smooths them per `settings` and records the range.
    pub fn from_heights(mut heights: Array2<Value>, settings: TerrainSettings) -> Self {
        smooth_heights(&mut heights, settings.smooth_iterations);
        let (min, max) = height_range(&heights);
        log::debug!(
            "heightmap {:?}: range [{min:.3}, {max:.3}] after {} smoothing passes",
            heights.dim(),
            settings.smooth_iterations
        );
        Self {
            settings,
            heights,
            min,
            max,
        }
    }

    pub fn heights(&self) -> &Array2<Value> {
        &self.heights
    }

    pub fn settings(&self) -> &TerrainSettings {
        &self.settings
    }

    /// Height range after smoothing.
    pub fn range(&self) -> (Value, Value) {
        (self.min, self.max)
    }

    /// World position of cell `(x, z)`, with the grid centered on the origin in X/Z.
    pub fn world_position(&self, x: usize, z: usize) -> Point {
        let (rows, cols) = self.heights.dim();
        let half_w = (cols - 1) as Value * self.settings.spacing * 0.5;
        let half_d = (rows - 1) as Value * self.settings.spacing * 0.5;
        Point::new(
            x as Value * self.settings.spacing - half_w,
            self.heights[[z, x]],
            z as Value * self.settings.spacing - half_d,
        )
    }

    /// Row and/or column polylines visiting every `stride`-th cell.
    ///
    /// Lines with fewer than two points are dropped.
    pub fn wireframe(&self, stride: usize) -> Vec<TerrainPolyline> {
        let stride = stride.max(1);
        let (rows, cols) = self.heights.dim();
        let stroke = self.settings.stroke_settings();
        let mut lines = Vec::new();

        let mut emit = |points: Vec<Point>| {
            if points.len() >= 2 {
                lines.push(TerrainPolyline::new(points, self.min, self.max, stroke));
            }
        };

        if self.settings.draw_rows {
            for z in (0..rows).step_by(stride) {
                emit((0..cols).step_by(stride).map(|x| self.world_position(x, z)).collect());
            }
        }
        if self.settings.draw_cols {
            for x in (0..cols).step_by(stride) {
                emit((0..rows).step_by(stride).map(|z| self.world_position(x, z)).collect());
            }
        }

        log::debug!("wireframe stride {stride}: {} polylines", lines.len());
        lines
    }

    /// [`wireframe`](Heightmap::wireframe) with the stride derived from a detail fraction.
    pub fn wireframe_detail(&self, detail: Value) -> Vec<TerrainPolyline> {
        self.wireframe(detail_stride(detail))
    }
}

/// Builds the heightmap for `settings` and returns its wireframe at `stride`.
pub fn generate_wireframe(settings: &TerrainSettings, stride: usize) -> Vec<TerrainPolyline> {
    Heightmap::generate(settings).wireframe(stride)
}

/// Maps a height inside `[min, max]` onto the blue → red ramp, darker at the bottom.
pub fn height_color(y: Value, min: Value, max: Value) -> Color {
    let t = clamp01(remap(y, [min, max], [0.0, 1.0]));
    Color::from_hsb(
        LOW_HUE * (1.0 - t),
        1.0,
        LOW_BRIGHTNESS + (1.0 - LOW_BRIGHTNESS) * t,
    )
}

/// One wireframe line with a height-derived color per segment.
#[derive(Debug, Clone)]
pub struct TerrainPolyline {
    line: Polyline,
    colors: Vec<Color>,
    min: Value,
    max: Value,
    settings: WormSettings,
}

impl TerrainPolyline {
    /// `min`/`max` define the color ramp; a degenerate range is widened by one.
    pub fn new(points: Vec<Point>, min: Value, mut max: Value, settings: WormSettings) -> Self {
        if (max - min).abs() < 1e-9 {
            max = min + 1.0;
        }
        let mut polyline = Self {
            line: Polyline::from_points(points),
            colors: Vec::new(),
            min,
            max,
            settings,
        };
        polyline.generate();
        polyline
    }

    pub fn line(&self) -> &Polyline {
        &self.line
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}

impl PathGenerator for TerrainPolyline {
    /// Re-measures segments and recolors them from the stored points.
    fn generate(&mut self) {
        let points = std::mem::take(&mut self.line.points);
        self.line = Polyline::from_points(points);
        self.colors = self
            .line
            .points
            .windows(2)
            .map(|pair| height_color(0.5 * (pair[0].y + pair[1].y), self.min, self.max))
            .collect();
    }

    fn points(&self) -> &[Point] {
        &self.line.points
    }

    fn segment_sizes(&self) -> &[Value] {
        &self.line.segment_sizes
    }

    fn settings(&self) -> WormSettings {
        self.settings
    }

    fn segment_color(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }
}
