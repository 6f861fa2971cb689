use thiserror::Error;

use crate::config::GranularityId;
use crate::Count;

/// Failure modes of the counter core.
///
/// Invariant violations only surface from explicit `check_invariant`
/// calls; the mutation paths themselves never fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CounterError {
    /// A query named a granularity the counter was never configured with.
    #[error("unknown granularity `{id}`")]
    UnknownGranularity { id: GranularityId },

    #[error("expected {expected} buckets, but found {observed}")]
    BucketCountMismatch { expected: usize, observed: usize },

    #[error("expected the bucket total and running total to be equal: {expected} != {observed}")]
    TotalMismatch { expected: Count, observed: Count },

    #[error("bucket {index} holds a negative count: {value}")]
    NegativeBucket { index: usize, value: Count },

    #[error("running total for `{finer}` is not the current estimate for `{coarser}`: {expected} != {observed}")]
    EstimateMismatch {
        finer: GranularityId,
        coarser: GranularityId,
        expected: Count,
        observed: Count,
    },

    #[error("granularity `{id}`: {reason}")]
    InvalidConfig {
        id: GranularityId,
        reason: &'static str,
    },
}
