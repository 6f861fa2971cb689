//! Cascading multi-granularity rolling-bucket counters.
//!
//! A [`CascadingCounter`] tracks, for one event, how many occurrences
//! happened within several rolling time windows of different granularity
//! at once (per second, per minute, per hour, ...). Every granularity's
//! current bucket reflects up-to-the-moment activity: on advance, each
//! finer granularity's exact running total is threaded into the next
//! coarser one's current bucket, so coarse windows never wait for their
//! own interval to elapse.
//!
//! The crate has no clock of its own. Callers supply "now" on every call,
//! which keeps everything deterministic and testable with synthetic time.

mod boundary;
mod buffer;
mod cascade;
mod config;
mod counter;
mod error;
pub mod reducers;

pub use boundary::{BoundaryCalculator, EpochBoundaries};
pub use buffer::BucketBuffer;
pub use cascade::CascadingCounter;
pub use config::{GranularityConfig, GranularityId};
pub use counter::GranularityCounter;
pub use error::CounterError;

/// Milliseconds since the Unix epoch, supplied by the caller.
pub type Instant = i64;

/// A span of milliseconds.
pub type Millis = i64;

/// An event occurrence count. Signed so corrections can be applied with a
/// negative `increment`.
pub type Count = i64;
