use crate::{
    settings::WormSettings,
    types::{Color, Point, Value, Vector},
};

/// A producer of polylines for an external renderer.
///
/// `segment_sizes()[i]` is the length of the segment from `points()[i]` to
/// `points()[i + 1]`, so it always has one entry fewer than `points()`.
pub trait PathGenerator {
    /// Recomputes the path. Calling it again with unchanged settings gives the same path.
    fn generate(&mut self);

    fn points(&self) -> &[Point];

    fn segment_sizes(&self) -> &[Value];

    /// Snapshot of the settings the path was built from.
    fn settings(&self) -> WormSettings;

    /// Per-segment color, for generators that have one.
    ///
    /// `None` means "use the path-wide color".
    fn segment_color(&self, _index: usize) -> Option<Color> {
        None
    }
}

/// Ordered points plus the length of each segment between them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub segment_sizes: Vec<Value>,
}

impl Polyline {
    /// Creates an empty polyline with no points or segments.
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Builds a polyline from points, measuring each segment.
    pub fn from_points(points: Vec<Point>) -> Self {
        let segment_sizes = points
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).norm())
            .collect();
        Self {
            points,
            segment_sizes,
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.segment_sizes.clear();
    }

    /// Appends `point`, recording `size` as the length of the segment reaching it.
    ///
    /// The first point has no incoming segment, so `size` is ignored for it.
    pub fn push(&mut self, point: Point, size: Value) {
        if !self.points.is_empty() {
            self.segment_sizes.push(size);
        }
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    pub fn total_length(&self) -> Value {
        self.segment_sizes.iter().sum()
    }

    /// Arithmetic mean of all points, or `None` for an empty polyline.
    pub fn centroid(&self) -> Option<Point> {
        if self.points.is_empty() {
            return None;
        }
        let sum = self
            .points
            .iter()
            .fold(Vector::zeros(), |acc, p| acc + p.coords);
        Some(Point::from(sum / self.points.len() as Value))
    }

    /// Translates every point so the centroid lands on the origin.
    ///
    /// Segment lengths are unchanged by a translation.
    pub fn recenter(&mut self) {
        if let Some(c) = self.centroid() {
            for p in &mut self.points {
                *p -= c.coords;
            }
        }
    }
}
