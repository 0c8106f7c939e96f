use thiserror::Error;

/// Errors returned when the bucket layout of a histogram cannot be built.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("a histogram needs at least one bucket")]
    NoBuckets,
    #[error("bucket {index} does not start where the previous bucket ends")]
    Discontiguous { index: usize },
    #[error("the last bucket does not extend to u64::MAX")]
    Uncovered,
}

/// Errors returned when combining histograms.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("bucket count mismatch: {expected} != {actual}")]
    BucketCountMismatch { expected: usize, actual: usize },
    #[error("bucket boundaries differ at index {index}")]
    BoundaryMismatch { index: usize },
    #[error("histogram `{name}` cannot be merged: {source}")]
    Incompatible {
        name: String,
        #[source]
        source: Box<Error>,
    },
}
