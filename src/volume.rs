use crate::{
    error::{Error, Result},
    types::{Point, Value, Vector},
};

/// Slack added before flooring sample counts, so a bound that is an exact
/// multiple of `step` away from `min` is still sampled.
const COUNT_EPSILON: Value = 1e-9;

/// Most samples walked along one axis. A finer step empties the volume.
pub const MAX_AXIS_SAMPLES: usize = 1 << 24;

/// Half-space cut: samples on the side `normal` points to are skipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlane {
    pub origin: Point,
    /// Unit normal.
    pub normal: Vector,
}

impl ClipPlane {
    pub fn new(origin: Point, normal: Vector) -> Self {
        Self { origin, normal }
    }

    /// `true` when `p` lies strictly on the clipped-away side.
    #[inline]
    pub fn clips(&self, p: &Point) -> bool {
        (p - self.origin).dot(&self.normal) > 0.0
    }
}

/// An axis-aligned box walked on a regular grid.
///
/// Sample `(i, j, k)` sits at `min + (i, j, k) * step`, for every index whose
/// position stays within `max` on each axis.
///
/// ```text
///            max
///     +-----*
///    /     /|      samples: [nx, ny, nz]
///   +-----+ |      nx = floor((max.x - min.x) / step) + 1
///   |     | +
///   |     |/
///   *-----+
///  min
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanVolume {
    pub min: Point,
    pub max: Point,
    /// Grid spacing, also the offset used for neighbour and gradient probes.
    pub step: Value,
    pub clip: Option<ClipPlane>,
}

impl Default for ScanVolume {
    fn default() -> Self {
        Self {
            min: Point::origin(),
            max: Point::origin(),
            step: 1.0,
            clip: None,
        }
    }
}

impl ScanVolume {
    pub fn new(min: Point, max: Point) -> Self {
        Self {
            min,
            max,
            ..Default::default()
        }
    }

    /// A box of size `dims` centered on `center`.
    ///
    /// ```text
    ///  min = center - dims/2
    ///  max = center + dims/2
    /// ```
    pub fn centered(center: Point, dims: Vector) -> Self {
        Self::new(center - dims / 2.0, center + dims / 2.0)
    }

    /// Sets the grid spacing.
    pub fn with_step(mut self, step: Value) -> Self {
        self.step = step;
        self
    }

    /// Cuts away everything in front of `clip`.
    pub fn with_clip(mut self, clip: ClipPlane) -> Self {
        self.clip = Some(clip);
        self
    }

    /// Number of samples along each axis.
    ///
    /// All zero when the box is empty, the step is not a positive finite
    /// number, or any axis would need more than [`MAX_AXIS_SAMPLES`].
    pub fn sample_counts(&self) -> [usize; 3] {
        if !(self.step.is_finite() && self.step > 0.0) {
            return [0; 3];
        }
        let axis = |lo: Value, hi: Value| -> Option<usize> {
            if !(lo.is_finite() && hi.is_finite()) || hi < lo {
                return None;
            }
            let spans = ((hi - lo) / self.step + COUNT_EPSILON).floor();
            if !(spans < MAX_AXIS_SAMPLES as Value) {
                return None;
            }
            (spans as usize).checked_add(1)
        };
        match (
            axis(self.min.x, self.max.x),
            axis(self.min.y, self.max.y),
            axis(self.min.z, self.max.z),
        ) {
            (Some(nx), Some(ny), Some(nz)) => [nx, ny, nz],
            _ => [0; 3],
        }
    }

    /// Total samples, saturating at `usize::MAX`.
    pub fn sample_count(&self) -> usize {
        self.sample_counts()
            .iter()
            .fold(1usize, |acc, &n| acc.saturating_mul(n))
    }

    /// World position of sample `(i, j, k)`.
    #[inline]
    pub fn sample_point(&self, i: usize, j: usize, k: usize) -> Point {
        Point::new(
            self.min.x + i as Value * self.step,
            self.min.y + j as Value * self.step,
            self.min.z + k as Value * self.step,
        )
    }

    /// `±step` offsets along X, Y and Z.
    pub fn probe_offsets(&self) -> [Vector; 3] {
        [
            Vector::new(self.step, 0.0, 0.0),
            Vector::new(0.0, self.step, 0.0),
            Vector::new(0.0, 0.0, self.step),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(Error::NonPositiveStep);
        }
        let spans = (self.max - self.min) / self.step;
        if spans.iter().any(|&n| !(n < MAX_AXIS_SAMPLES as Value)) {
            return Err(Error::TooManySamples {
                limit: MAX_AXIS_SAMPLES,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_include_both_bounds() {
        let v = ScanVolume::new(Point::new(0.0, 0.0, 0.0), Point::new(1.0, 2.0, 0.5)).with_step(0.5);
        assert_eq!(v.sample_counts(), [3, 5, 2]);
        assert_eq!(v.sample_count(), 30);
        assert_eq!(v.sample_point(2, 4, 1), Point::new(1.0, 2.0, 0.5));
    }

    #[test]
    fn tenth_steps_do_not_drift() {
        let v = ScanVolume::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0)).with_step(0.1);
        assert_eq!(v.sample_counts(), [21, 21, 21]);
    }

    #[test]
    fn empty_boxes_and_bad_steps() {
        let inverted = ScanVolume::new(Point::new(1.0, 0.0, 0.0), Point::new(0.0, 1.0, 1.0));
        assert_eq!(inverted.sample_count(), 0);

        let unit = ScanVolume::new(Point::origin(), Point::new(1.0, 1.0, 1.0));
        assert_eq!(unit.with_step(0.0).sample_count(), 0);
        assert_eq!(unit.with_step(-1.0).sample_count(), 0);
        assert_eq!(unit.with_step(Value::NAN).sample_count(), 0);
        assert_eq!(unit.with_step(0.0).validate(), Err(Error::NonPositiveStep));
        assert!(unit.validate().is_ok());
    }

    #[test]
    fn very_fine_steps_empty_the_volume() {
        let unit = ScanVolume::new(Point::origin(), Point::new(1.0, 1.0, 1.0));
        let tiny = unit.with_step(1e-300);
        assert_eq!(tiny.sample_counts(), [0; 3]);
        assert_eq!(tiny.sample_count(), 0);
        assert_eq!(
            tiny.validate(),
            Err(Error::TooManySamples {
                limit: MAX_AXIS_SAMPLES
            })
        );

        let huge = ScanVolume::new(Point::new(-1e308, 0.0, 0.0), Point::new(1e308, 1.0, 1.0));
        assert_eq!(huge.sample_count(), 0);
    }

    #[test]
    fn large_counts_saturate_instead_of_overflowing() {
        let v = ScanVolume::new(Point::origin(), Point::new(10.0, 10.0, 10.0)).with_step(1e-6);
        assert_eq!(v.sample_counts(), [10_000_001; 3]);
        assert_eq!(v.sample_count(), usize::MAX);
        assert!(v.validate().is_ok());
    }

    #[test]
    fn centered_box() {
        let v = ScanVolume::centered(Point::new(1.0, 2.0, 3.0), Vector::new(2.0, 4.0, 6.0));
        assert_eq!(v.min, Point::new(0.0, 0.0, 0.0));
        assert_eq!(v.max, Point::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn clip_plane_sides() {
        let clip = ClipPlane::new(Point::origin(), Vector::z());
        assert!(clip.clips(&Point::new(0.0, 0.0, 0.1)));
        assert!(!clip.clips(&Point::new(5.0, 5.0, 0.0)));
        assert!(!clip.clips(&Point::new(0.0, 0.0, -3.0)));
    }
}
