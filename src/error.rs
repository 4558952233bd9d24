//! Errors raised while reconciling and combining datasets.
//!
//! Every failure here is a caller configuration error: nothing is retried and
//! no partial result is ever returned.

/// Errors that can occur when reconciling or combining datasets.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Promotion was asked to lift an operand of rank 3 or more.
    #[error("rank limit: cannot promote a rank {rank} dataset")]
    RankLimit { rank: usize },

    /// Two axes that must agree in length do not.
    #[error("incompatible lengths: datasets must have the same length ({left} != {right})")]
    IncompatibleLengths { left: usize, right: usize },

    /// Equal-rank operands whose nested geometry differs below the top level.
    #[error("incompatible geometry: rank {rank} datasets differ in shape")]
    IncompatibleGeometry { rank: usize },

    /// A result buffer was needed but no operand had a rectangular shape.
    #[error("no qube operand available: either operand needs to be a qube")]
    NoQubeOperand,

    /// A scalar accessor was given fewer indices than the dataset's rank.
    #[error("rank too low: rank {rank} dataset accessed with {given} indices")]
    RankTooLow { rank: usize, given: usize },

    /// A length query named an axis the dataset does not have.
    #[error("no such axis: rank {rank} dataset has no axis {axis}")]
    NoSuchAxis { rank: usize, axis: usize },

    #[error("index {index} is out of bounds for length {length}")]
    IndexOutOfBounds { index: usize, length: usize },

    /// A dataset of rank `from` cannot stand in for one of rank `onto`.
    #[error("rank mismatch: rank {from} does not fit rank {onto}")]
    RankMismatch { from: usize, onto: usize },

    #[error("unsupported rank {0}: datasets have rank 0 to 4")]
    RankUnsupported(usize),

    #[error("shape {shape:?} needs {expected} values, got {got}")]
    ShapeMismatch { shape: Vec<usize>, expected: usize, got: usize },

    #[error("thread pool: {0}")]
    ThreadPool(String),
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(e: rayon::ThreadPoolBuildError) -> Self { Error::ThreadPool(e.to_string()) }
}

/// Shorthand used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
