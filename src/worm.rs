//! Stochastic worm paths that wander from a start point and home in on an end point.
//!
//! Every step blends three directions:
//!
//! ```text
//! dir' = normalize((1 - a) * dir  +  a * toward_end  +  wander * random_unit)
//!        \___persistence___/     \__attraction__/     \_____noise_____/
//!
//! a = min(0.8, base_attraction + attraction_growth * i / num_steps)
//! ```
//!
//! Attraction grows with progress, so early steps meander and late steps converge.

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::instrument;

use crate::{
    path::{PathGenerator, Polyline},
    settings::{SegmentSize, WormSettings},
    types::{Color, Point, Value, Vector, normalize_or},
};

const MAX_ATTRACTION: Value = 0.8;
/// Stop stepping once the end is within this many minimum segment lengths.
const ARRIVAL_FACTOR: Value = 1.2;
/// A final point closer than this to `end` is already considered at `end`.
const SNAP_EPSILON: Value = 1e-6;

/// A worm path generator. Owns a copy of its settings.
#[derive(Debug, Clone)]
pub struct RandomWorm {
    settings: WormSettings,
    path: Polyline,
}

impl RandomWorm {
    pub fn new(settings: WormSettings) -> Self {
        Self {
            settings,
            path: Polyline::new_empty(),
        }
    }

    /// Walks the worm from `start` to `end` without recentering.
    ///
    /// The first point is `start` and the last is exactly `end`. The random
    /// stream is re-seeded from the settings, so repeated calls agree.
    pub fn trace(&self) -> Polyline {
        let s = &self.settings;
        let mut rng = ChaCha8Rng::seed_from_u64(s.seed);
        let mut path = Polyline::new_empty();

        let mut p = s.start;
        let mut dir = normalize_or(s.end - p, Vector::z());
        path.push(p, 0.0);

        let min_size = s.segment_size.min();
        for i in 0..s.num_steps {
            let to_end = s.end - p;
            let dist = to_end.norm();
            if dist < min_size * ARRIVAL_FACTOR {
                log::trace!("worm arrived after {i} of {} steps", s.num_steps);
                break;
            }

            let target = normalize_or(to_end, dir);
            let wander = random_unit_vector(&mut rng);

            let t = i as Value / s.num_steps as Value;
            let attraction = (s.base_attraction + s.attraction_growth * t).min(MAX_ATTRACTION);

            let blended =
                dir * (1.0 - attraction) + target * attraction + wander * s.wander_strength;
            dir = normalize_or(blended, dir);

            let step = step_length(&s.segment_size, &mut rng).min(dist);
            p += dir * step;
            path.push(p, step);
        }

        // Close the path exactly on `end`, whether or not the budget ran out.
        let residual = path.last().map_or(0.0, |last| (s.end - *last).norm());
        if residual > SNAP_EPSILON {
            path.push(s.end, residual);
        }

        path
    }

    pub fn path(&self) -> &Polyline {
        &self.path
    }

    pub fn into_path(self) -> Polyline {
        self.path
    }
}

impl PathGenerator for RandomWorm {
    /// Traces the worm and recenters it so its centroid sits at the origin.
    #[instrument(skip_all)]
    fn generate(&mut self) {
        let mut path = self.trace();
        path.recenter();
        log::debug!(
            "worm generated: {} points, length {:.3}",
            path.len(),
            path.total_length()
        );
        self.path = path;
    }

    fn points(&self) -> &[Point] {
        &self.path.points
    }

    fn segment_sizes(&self) -> &[Value] {
        &self.path.segment_sizes
    }

    fn settings(&self) -> WormSettings {
        self.settings
    }
}

/// Uniform direction on the unit sphere: `z = u`, azimuth `θ`, `u ~ U[-1, 1)`, `θ ~ U[0, 2π)`.
fn random_unit_vector<R: Rng>(rng: &mut R) -> Vector {
    let u = 2.0 * rng.random::<Value>() - 1.0;
    let theta = TAU * rng.random::<Value>();
    let r = (1.0 - u * u).sqrt();
    Vector::new(r * theta.cos(), r * theta.sin(), u)
}

fn step_length<R: Rng>(size: &SegmentSize, rng: &mut R) -> Value {
    match *size {
        SegmentSize::Fixed(size) => size,
        SegmentSize::Uniform { min, max } => min + rng.random::<Value>() * (max - min),
    }
}

/// Options for [`spawn_worms`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwarmOptions {
    pub count: usize,
    /// Replace each worm's endpoints with random points in `[-half_extent, half_extent]³`.
    pub random_endpoints: bool,
    pub half_extent: Value,
    /// Seeds endpoint and color choices. Worm `i` traces with `template.seed + i`.
    pub seed: u64,
}

impl Default for SwarmOptions {
    fn default() -> Self {
        Self {
            count: 1,
            random_endpoints: false,
            half_extent: 30.0,
            seed: 0,
        }
    }
}

/// Generates `options.count` worms from a shared template, each with its own
/// settings copy and a saturated random display color.
pub fn spawn_worms(template: &WormSettings, options: SwarmOptions) -> Vec<(RandomWorm, Color)> {
    let mut rng = ChaCha8Rng::seed_from_u64(options.seed);
    let extent = options.half_extent;

    (0..options.count)
        .map(|i| {
            let mut settings = template.with_seed(template.seed.wrapping_add(i as u64));
            if options.random_endpoints {
                let mut corner = || {
                    Point::new(
                        rng.random_range(-extent..=extent),
                        rng.random_range(-extent..=extent),
                        rng.random_range(-extent..=extent),
                    )
                };
                settings.start = corner();
                settings.end = corner();
            }

            let mut worm = RandomWorm::new(settings);
            worm.generate();

            let color = Color::from_hsb(rng.random::<Value>(), 1.0, 1.0);
            (worm, color)
        })
        .collect()
}
