use crate::MAX_DIMENSIONS;
use thiserror::Error;

/// Invalid parameters given when constructing a [`Bounds`](crate::tree::Bounds) or an
/// [`NTree`](crate::tree::NTree).
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The center and half-extent slices have different lengths.
    #[error("center has {center} dimensions but half-extent has {half_extent}")]
    MismatchedLengths {
        /// Length of the center.
        center: usize,
        /// Length of the half-extent.
        half_extent: usize,
    },

    /// A tree needs at least one dimension.
    #[error("can't have a 0-dimensional tree")]
    ZeroDimensions,

    /// Child addressing uses one bit of a machine word per dimension.
    #[error("{0} dimensions exceeds the maximum of {}", MAX_DIMENSIONS)]
    TooManyDimensions(usize),

    /// A half-extent is not strictly positive and finite.
    #[error("dimension {dimension} has half-extent {value}, must be positive and finite")]
    InvalidBound {
        /// Index of the offending dimension.
        dimension: usize,
        /// The rejected value.
        value: f64,
    },

    /// A center coordinate is NaN or infinite.
    #[error("dimension {dimension} has center {value}, must be finite")]
    InvalidCenter {
        /// Index of the offending dimension.
        dimension: usize,
        /// The rejected value.
        value: f64,
    },
}

/// Error returned by operations on an [`NTree`](crate::tree::NTree).
#[derive(Clone, Debug, PartialEq, Error)]
pub enum Error {
    /// A node could not be constructed, either at the root or during a split.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A point or query vector does not have the dimensionality of the tree.
    #[error("point is {found} dimensional, tree is {expected}")]
    DimensionMismatch {
        /// Dimensionality of the tree.
        expected: usize,
        /// Dimensionality of the rejected point or query.
        found: usize,
    },

    /// The point lies outside the volume covered by the tree.
    #[error("point doesn't fall within the bounds of the tree")]
    OutOfBounds,

    /// The `2^dimensions` children of a split could not be allocated.
    #[error("cannot allocate the 2^{dimensions} children of a split")]
    Allocation {
        /// Dimensionality of the node that tried to split.
        dimensions: usize,
    },
}

/// Result type with [`Error`] as its default error.
pub type Result<T, E = Error> = std::result::Result<T, E>;
