//! Error types for time-hull operations.

use thiserror::Error;

/// Result type alias using HullError.
pub type HullResult<T> = Result<T, HullError>;

/// Primary error type for hull construction and cube sampling.
///
/// None of these are transient: they describe malformed input or a
/// genuinely empty geometric intersection, so callers should not retry.
#[derive(Debug, Error)]
pub enum HullError {
    /// Structurally invalid input (too few perimeters, degenerate rings,
    /// mismatched keyframe layouts, unresolvable grid dimensions or CRS).
    #[error("invalid input: {0}")]
    Input(String),

    /// The polygon series window and the cube time axis do not intersect.
    #[error("no temporal overlap between series {series} and cube {cube}")]
    NoOverlap { series: String, cube: String },

    /// Masking every eligible timestep produced zero inside cells.
    #[error("empty result: {0}")]
    EmptyResult(String),

    /// A coordinate could not be carried between reference systems.
    #[error("projection error: {0}")]
    Projection(String),
}

impl HullError {
    /// Create an Input error.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Create a NoOverlap error from display forms of both time windows.
    pub fn no_overlap(series: impl Into<String>, cube: impl Into<String>) -> Self {
        Self::NoOverlap {
            series: series.into(),
            cube: cube.into(),
        }
    }

    /// Create an EmptyResult error.
    pub fn empty_result(msg: impl Into<String>) -> Self {
        Self::EmptyResult(msg.into())
    }

    /// Create a Projection error.
    pub fn projection(msg: impl Into<String>) -> Self {
        Self::Projection(msg.into())
    }

    /// Taxonomy name for this error.
    ///
    /// Projection failures are reported as input errors: they only occur for
    /// coordinates outside a projection's domain.
    pub fn error_code(&self) -> &'static str {
        match self {
            HullError::Input(_) | HullError::Projection(_) => "InputError",
            HullError::NoOverlap { .. } => "NoOverlapError",
            HullError::EmptyResult(_) => "EmptyResultError",
        }
    }
}
