//! A simple look-at perspective projector.
//!
//! The core never needs a camera; this is a ready-made [`Projector`] for
//! viewers and tests that do not bring their own.

use crate::{
    raster::{Projection, Projector},
    types::{Point, Value, Vector, normalize_or},
};

/// Perspective divides at or below this are treated as behind the camera.
const MIN_DENOMINATOR: Value = 0.1;

/// Perspective projection from `eye` toward `target` with world up `+Y`.
///
/// ```text
/// rel   = p - eye
/// cam   = (rel·right, rel·up, rel·forward)
/// denom = focal + cam.z                       (<= 0.1 → not visible)
/// sx    = w/2 + pan.x + cam.x * focal/denom * zoom
/// sy    = h/2 + pan.y - cam.y * focal/denom * zoom
/// depth = cam.z
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookAtProjector {
    pub eye: Point,
    pub target: Point,
    pub focal: Value,
    pub zoom: Value,
    /// Screen-space offset of the image center, in pixels.
    pub pan: [Value; 2],
}

impl Default for LookAtProjector {
    fn default() -> Self {
        Self {
            eye: Point::new(0.0, 0.0, 200.0),
            target: Point::origin(),
            focal: 200.0,
            zoom: 1.0,
            pan: [0.0, 0.0],
        }
    }
}

impl LookAtProjector {
    pub fn new(eye: Point, target: Point) -> Self {
        Self {
            eye,
            target,
            ..Default::default()
        }
    }

    pub fn with_zoom(mut self, zoom: Value) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_pan(mut self, x: Value, y: Value) -> Self {
        self.pan = [x, y];
        self
    }

    /// `(right, up, forward)` camera basis.
    ///
    /// Looking straight up or down has no defined right vector; `+X` is used.
    pub fn basis(&self) -> (Vector, Vector, Vector) {
        let forward = normalize_or(self.target - self.eye, -Vector::z());
        let right = normalize_or(forward.cross(&Vector::y()), Vector::x());
        let up = right.cross(&forward);
        (right, up, forward)
    }

    /// Sub-pixel screen position and depth, or `None` when not visible.
    pub fn project_precise(
        &self,
        p: &Point,
        width: usize,
        height: usize,
    ) -> Option<(Value, Value, Value)> {
        let (right, up, forward) = self.basis();
        let rel = p - self.eye;
        let (xc, yc, zc) = (rel.dot(&right), rel.dot(&up), rel.dot(&forward));

        let denom = self.focal + zc;
        if !(denom > MIN_DENOMINATOR) {
            return None;
        }
        let factor = self.focal / denom * self.zoom;

        let sx = width as Value / 2.0 + self.pan[0] + xc * factor;
        let sy = height as Value / 2.0 + self.pan[1] - yc * factor;
        Some((sx, sy, zc))
    }
}

impl Projector for LookAtProjector {
    fn project(&self, p: &Point, width: usize, height: usize) -> Option<Projection> {
        let (sx, sy, depth) = self.project_precise(p, width, height)?;
        Some(Projection {
            x: sx.round() as i64,
            y: sy.round() as i64,
            depth,
        })
    }
}
