use derive_more::Display;

pub type Result<T> = core::result::Result<T, Error>;

/// Configuration problems reported by the optional `validate` helpers.
///
/// Generation itself never fails; these exist for callers that want to
/// reject settings before handing them to a generator.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum Error {
    #[display("segment size range is empty: min {min} >= max {max}")]
    InvalidSegmentRange { min: f64, max: f64 },
    #[display("segment sizes must be positive")]
    NonPositiveSegmentSize,
    #[display("grid must be at least 2x2, got {x}x{z}")]
    InvalidGrid { x: usize, z: usize },
    #[display("grid spacing must be positive")]
    NonPositiveSpacing,
    #[display("sampling step must be positive and finite")]
    NonPositiveStep,
    #[display("sampling step is too fine: more than {limit} samples per axis")]
    TooManySamples { limit: usize },
    #[display("buffer is {got:?}, expected {expected:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
}

impl std::error::Error for Error {}
