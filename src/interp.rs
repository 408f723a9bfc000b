use crate::types::Value;

// Quintic smootherstep: t³(t(6t − 15) + 10)
#[inline]
pub fn fade(t: Value) -> Value {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

// Linear interpolation
#[inline]
pub fn lerp(a: Value, b: Value, t: Value) -> Value {
    a + (b - a) * t
}

// linearly map a number from one range to another
pub fn remap(s: Value, range_in: [Value; 2], range_out: [Value; 2]) -> Value {
    range_out[0] + (s - range_in[0]) * (range_out[1] - range_out[0]) / (range_in[1] - range_in[0])
}

#[inline]
pub fn clamp01(v: Value) -> Value {
    v.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_endpoints_and_midpoint() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);
        assert!((fade(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn remap_unit_to_byte() {
        assert_eq!(remap(0.5, [0.0, 1.0], [0.0, 255.0]), 127.5);
        assert_eq!(remap(-1.0, [-1.0, 1.0], [0.0, 1.0]), 0.0);
    }

    #[test]
    fn clamp01_bounds() {
        assert_eq!(clamp01(-0.2), 0.0);
        assert_eq!(clamp01(1.7), 1.0);
        assert_eq!(clamp01(0.3), 0.3);
    }
}
