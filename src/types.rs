use nalgebra::{Point3, Vector3};

/// Scalar field value at a point in space.
pub type Value = f64;

/// A 3D point with [`Value`] components.
pub type Point = Point3<Value>;

/// A 3D vector with [`Value`] components.
pub type Vector = Vector3<Value>;

/// Length floor below which a vector is treated as zero.
const NORMALIZE_EPSILON: Value = 1e-12;

/// Normalizes `v`, or returns `fallback` when `v` is too short to have a direction.
///
/// Never produces NaN components.
#[inline]
pub fn normalize_or(v: Vector, fallback: Vector) -> Vector {
    v.try_normalize(NORMALIZE_EPSILON).unwrap_or(fallback)
}

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// A gray level with equal channels.
    pub const fn gray(level: u8) -> Self {
        Self::rgb(level, level, level)
    }

    /// Converts hue/saturation/brightness (all in `[0, 1]`) to RGB.
    ///
    /// Hue wraps on its fractional part, so `1.25` is the same hue as `0.25`.
    ///
    /// ```text
    /// sector  0    1    2    3    4    5
    /// r       b    q    p    p    t    b
    /// g       t    b    b    q    p    p
    /// b       p    p    t    b    b    q
    /// ```
    pub fn from_hsb(hue: Value, saturation: Value, brightness: Value) -> Self {
        let to_byte = |v: Value| (v * 255.0 + 0.5).clamp(0.0, 255.0) as u8;

        if saturation <= 0.0 {
            return Self::gray(to_byte(brightness));
        }

        let h = (hue - hue.floor()) * 6.0;
        let f = h - h.floor();
        let p = brightness * (1.0 - saturation);
        let q = brightness * (1.0 - saturation * f);
        let t = brightness * (1.0 - saturation * (1.0 - f));

        let (r, g, b) = match h as u32 {
            0 => (brightness, t, p),
            1 => (q, brightness, p),
            2 => (p, brightness, t),
            3 => (p, q, brightness),
            4 => (t, p, brightness),
            _ => (brightness, p, q),
        };
        Self::rgb(to_byte(r), to_byte(g), to_byte(b))
    }
}

/// A boundary sample produced by the surface extractor.
///
/// `normal` is unit length; `light` is in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    pub position: Point,
    pub normal: Vector,
    pub light: Value,
}

impl SurfacePoint {
    pub(crate) fn new(position: Point, normal: Vector, light: Value) -> Self {
        Self {
            position,
            normal,
            light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_or_keeps_direction() {
        let n = normalize_or(Vector::new(3.0, 0.0, 4.0), Vector::y());
        assert!((n.norm() - 1.0).abs() < 1e-12);
        assert!((n.x - 0.6).abs() < 1e-12);
        assert!((n.z - 0.8).abs() < 1e-12);
    }

    #[test]
    fn normalize_or_falls_back_on_zero() {
        assert_eq!(normalize_or(Vector::zeros(), Vector::z()), Vector::z());
        assert_eq!(
            normalize_or(Vector::new(1e-20, 0.0, 0.0), Vector::y()),
            Vector::y()
        );
    }

    #[test]
    fn hsb_primaries() {
        assert_eq!(Color::from_hsb(0.0, 1.0, 1.0), Color::rgb(255, 0, 0));
        assert_eq!(Color::from_hsb(1.0 / 3.0, 1.0, 1.0), Color::rgb(0, 255, 0));
        assert_eq!(Color::from_hsb(2.0 / 3.0, 1.0, 1.0), Color::rgb(0, 0, 255));
        assert_eq!(Color::from_hsb(0.5, 0.0, 0.5), Color::gray(128));
        assert_eq!(Color::from_hsb(0.3, 1.0, 0.0), Color::BLACK);
        assert_eq!(Color::from_hsb(0.7, 0.0, 1.0), Color::WHITE);
    }

    #[test]
    fn hsb_hue_wraps() {
        assert_eq!(Color::from_hsb(1.0, 1.0, 1.0), Color::from_hsb(0.0, 1.0, 1.0));
        assert_eq!(
            Color::from_hsb(1.25, 1.0, 0.8),
            Color::from_hsb(0.25, 1.0, 0.8)
        );
    }
}
