//! Per-event rolling activity counts over multiple time granularities.
//!
//! `recency` answers "how many occurrences of event X happened in the last
//! N buckets of granularity G" at any instant, including the partially
//! elapsed current bucket. The counter core lives in the `counters` crate;
//! this crate adds the per-event registry ([`EventStore`]), the calendar
//! boundary rules ([`boundary::CalendarBoundaries`]) and the preset
//! granularity tables ([`intervals`]).
//!
//! Time never comes from a wall clock here: every call takes "now" from
//! the caller, so the whole system can be driven by synthetic clocks.

pub mod boundary;
pub mod intervals;
pub mod store;
pub mod types;

pub use counters::{
    reducers, BoundaryCalculator, BucketBuffer, CascadingCounter, Count, CounterError,
    EpochBoundaries, GranularityConfig, GranularityCounter, GranularityId, Instant, Millis,
};
pub use store::EventStore;
pub use types::EventId;
