//! Error types for clustering runs.

use thiserror::Error;

use crate::point::PointId;

/// Malformed caller input. Rejected before any rectangle is built.
///
/// A negative extent is not an error: it is replaced by its absolute value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
    #[error("Source {index} has a non-finite position ({x}, {y})")]
    NonFinitePosition { index: usize, x: f64, y: f64 },

    #[error("Source {index} has a non-finite extent {extent}")]
    NonFiniteExtent { index: usize, extent: f64 },
}

/// Internal invariant violation. Fatal to the run that hit it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Defect {
    #[error("Point {0} is not in the remaining set")]
    NotRemaining(PointId),

    #[error("Point {0} is not registered")]
    UnknownPoint(PointId),

    #[error("No remaining points to search")]
    NoRemainingPoints,

    #[error("Growth would leave point {point} outside the rectangle core bounds")]
    ContainmentViolated { point: PointId },
}

/// Errors that can occur during a clustering run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    #[error("Clustering invariant violated: {0}")]
    Defect(#[from] Defect),
}
