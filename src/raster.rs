use ndarray::Array2;
use tracing::instrument;

use crate::{
    error::{Error, Result},
    interp::clamp01,
    types::{Point, SurfacePoint},
};

/// Where a world point lands on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub x: i64,
    pub y: i64,
    /// Smaller is closer.
    pub depth: f64,
}

/// Camera capability supplied by the viewer.
///
/// Returns `None` when the point cannot be projected (behind the camera, or
/// a degenerate perspective divide).
pub trait Projector {
    fn project(&self, p: &Point, width: usize, height: usize) -> Option<Projection>;
}

impl<F> Projector for F
where
    F: Fn(&Point, usize, usize) -> Option<Projection>,
{
    fn project(&self, p: &Point, width: usize, height: usize) -> Option<Projection> {
        self(p, width, height)
    }
}

/// Grayscale image plus per-pixel nearest depth, both indexed `[y, x]`.
#[derive(Debug, Clone)]
pub struct ZBuffer {
    depth: Array2<f64>,
    pixels: Array2<u8>,
}

impl ZBuffer {
    /// A black image with every depth at `+inf`.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            depth: Array2::from_elem((height, width), f64::INFINITY),
            pixels: Array2::zeros((height, width)),
        }
    }

    /// Draws over an existing grayscale image instead of a black one.
    pub fn with_background(pixels: Array2<u8>) -> Self {
        Self {
            depth: Array2::from_elem(pixels.dim(), f64::INFINITY),
            pixels,
        }
    }

    /// Replaces the image, keeping depths; the new image must match in size.
    pub fn set_background(&mut self, pixels: Array2<u8>) -> Result<()> {
        if pixels.dim() != self.pixels.dim() {
            let (h, w) = self.pixels.dim();
            let (gh, gw) = pixels.dim();
            return Err(Error::DimensionMismatch {
                expected: (w, h),
                got: (gw, gh),
            });
        }
        self.pixels = pixels;
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    /// Resets depths to `+inf` and the image to black.
    pub fn clear(&mut self) {
        self.depth.fill(f64::INFINITY);
        self.pixels.fill(0);
    }

    /// Projects each point and keeps the nearest one per pixel.
    ///
    /// A point only wins a pixel with a depth strictly less than the current
    /// one. Submission order matters only between equal depths, where the
    /// first point is kept. Returns the number of pixel writes.
    #[instrument(skip_all)]
    pub fn rasterize<P: Projector + ?Sized>(
        &mut self,
        points: &[SurfacePoint],
        projector: &P,
    ) -> usize {
        let (w, h) = (self.width(), self.height());
        let mut writes = 0;

        for sp in points {
            let Some(proj) = projector.project(&sp.position, w, h) else {
                continue;
            };
            if proj.x < 0 || proj.y < 0 || proj.x >= w as i64 || proj.y >= h as i64 {
                continue;
            }

            let idx = [proj.y as usize, proj.x as usize];
            if proj.depth.is_nan() || proj.depth >= self.depth[idx] {
                continue;
            }
            self.depth[idx] = proj.depth;
            self.pixels[idx] = light_to_intensity(sp.light);
            writes += 1;
        }

        log::trace!("rasterized {} points, {writes} pixel writes", points.len());
        writes
    }

    pub fn depth(&self, x: usize, y: usize) -> Option<f64> {
        self.depth.get([y, x]).copied()
    }

    pub fn intensity(&self, x: usize, y: usize) -> Option<u8> {
        self.pixels.get([y, x]).copied()
    }

    /// The pixel as equal R, G and B channels.
    pub fn rgb(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        self.intensity(x, y).map(|c| [c, c, c])
    }

    pub fn pixels(&self) -> &Array2<u8> {
        &self.pixels
    }

    pub fn into_pixels(self) -> Array2<u8> {
        self.pixels
    }
}

/// `round(255 * light)`, with `light` clamped to `[0, 1]`.
#[inline]
pub fn light_to_intensity(light: f64) -> u8 {
    (255.0 * clamp01(light)).round() as u8
}

/// Rasterizes `points` into a fresh `width × height` buffer.
pub fn render_points<P: Projector + ?Sized>(
    width: usize,
    height: usize,
    points: &[SurfacePoint],
    projector: &P,
) -> ZBuffer {
    let mut buffer = ZBuffer::new(width, height);
    buffer.rasterize(points, projector);
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vector;

    fn point(x: f64, y: f64, z: f64, light: f64) -> SurfacePoint {
        SurfacePoint::new(Point::new(x, y, z), Vector::y(), light)
    }

    /// Orthographic down the Z axis: pixel = (x, y), depth = z.
    fn ortho(p: &Point, _w: usize, _h: usize) -> Option<Projection> {
        if p.z < 0.0 {
            return None;
        }
        Some(Projection {
            x: p.x.round() as i64,
            y: p.y.round() as i64,
            depth: p.z,
        })
    }

    #[test]
    fn nearest_wins_in_either_order() {
        let far = point(3.0, 2.0, 5.0, 0.2);
        let near = point(3.0, 2.0, 2.0, 0.8);

        for order in [[far, near], [near, far]] {
            let buffer = render_points(8, 6, &order, &ortho);
            assert_eq!(buffer.intensity(3, 2), Some(204));
            assert_eq!(buffer.depth(3, 2), Some(2.0));
        }
    }

    #[test]
    fn equal_depth_keeps_first() {
        let a = point(1.0, 1.0, 4.0, 1.0);
        let b = point(1.0, 1.0, 4.0, 0.0);
        let buffer = render_points(4, 4, &[a, b], &ortho);
        assert_eq!(buffer.intensity(1, 1), Some(255));
    }

    #[test]
    fn offscreen_and_unprojectable_points_are_skipped() {
        let points = [
            point(-1.0, 0.0, 1.0, 1.0),
            point(0.0, 6.0, 1.0, 1.0),
            point(4.0, 0.0, 1.0, 1.0),
            point(1.0, 1.0, -2.0, 1.0),
        ];
        let mut buffer = ZBuffer::new(4, 6);
        assert_eq!(buffer.rasterize(&points, &ortho), 0);
        assert!(buffer.pixels().iter().all(|&c| c == 0));
        assert!(buffer.depth(0, 0).unwrap().is_infinite());
    }

    #[test]
    fn grayscale_channels_match() {
        let buffer = render_points(2, 2, &[point(0.0, 1.0, 1.0, 0.5)], &ortho);
        assert_eq!(buffer.rgb(0, 1), Some([128, 128, 128]));
        assert_eq!(buffer.rgb(5, 5), None);
    }

    #[test]
    fn clear_and_background() {
        let mut buffer = render_points(3, 3, &[point(1.0, 1.0, 1.0, 1.0)], &ortho);
        buffer.clear();
        assert_eq!(buffer.intensity(1, 1), Some(0));
        assert!(buffer.depth(1, 1).unwrap().is_infinite());

        assert!(buffer.set_background(Array2::from_elem((3, 3), 9)).is_ok());
        assert_eq!(buffer.intensity(2, 2), Some(9));
        assert_eq!(
            buffer.set_background(Array2::zeros((2, 3))),
            Err(Error::DimensionMismatch {
                expected: (3, 3),
                got: (3, 2)
            })
        );

        let drawn = ZBuffer::with_background(Array2::from_elem((2, 2), 50));
        assert_eq!(drawn.width(), 2);
        assert_eq!(drawn.intensity(0, 0), Some(50));
    }
}
