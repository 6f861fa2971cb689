use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, trace, warn};

use counters::reducers::{count_nonzero, sum};
use counters::{
    BoundaryCalculator, CascadingCounter, Count, CounterError, GranularityConfig, GranularityId,
    Instant,
};

use crate::boundary::CalendarBoundaries;
use crate::intervals::default_intervals;
use crate::types::EventId;

/// Per-event registry: one [`CascadingCounter`] per event id, created
/// lazily the first time an event is recorded.
///
/// Each counter mutates under its map shard's exclusive lock, which is the
/// one exclusive-access boundary the counters need: `record` and `tick`
/// always observe a consistent snapshot across every granularity level of
/// an event.
pub struct EventStore {
    intervals: Vec<GranularityConfig>,
    boundaries: Arc<dyn BoundaryCalculator + Send + Sync>,
    events: DashMap<EventId, CascadingCounter>,
}

impl EventStore {
    pub fn new(
        intervals: Vec<GranularityConfig>,
        boundaries: Arc<dyn BoundaryCalculator + Send + Sync>,
    ) -> Self {
        for config in &intervals {
            if !boundaries.supports(config.id()) {
                warn!(
                    granularity = %config.id(),
                    "granularity not supported by the boundary calculator, counters will drop it"
                );
            }
        }
        Self {
            intervals,
            boundaries,
            events: DashMap::new(),
        }
    }

    /// The default granularity set over calendar boundaries.
    pub fn with_defaults() -> Self {
        Self::new(default_intervals(), Arc::new(CalendarBoundaries))
    }

    /// Record one occurrence of `id` at `now`.
    pub fn record(&self, id: &EventId, now: Instant) {
        self.record_many(id, now, 1);
    }

    /// Record `count` occurrences of `id` at `now`. Due rollovers are
    /// applied before the new count lands, so it cannot fall into a bucket
    /// that should already have rotated.
    pub fn record_many(&self, id: &EventId, now: Instant, count: Count) {
        let mut counter = self.events.entry(id.clone()).or_insert_with(|| {
            debug!(event = %id, "tracking new event");
            CascadingCounter::new(now, self.intervals.clone(), self.boundaries.as_ref())
        });
        counter.maybe_advance(now);
        counter.increment(count);
    }

    /// Advance every tracked counter to `now`, applying due rollovers.
    pub fn tick(&self, now: Instant) {
        trace!(now, "advancing all counters");
        for mut entry in self.events.iter_mut() {
            entry.value_mut().maybe_advance(now);
        }
    }

    /// Callers should tick before reading, so queries see rotated buckets.
    pub fn prepare_for_queries(&self, now: Instant) {
        self.tick(now);
    }

    /// Fold `num_buckets` buckets of `granularity`, starting `from_index`
    /// buckets back from the current one, through `reducer`.
    ///
    /// An event that was never recorded yields `Ok(None)`. A granularity
    /// the store was not configured with is a caller error and fails.
    pub fn query<R>(
        &self,
        event: &EventId,
        num_buckets: i64,
        granularity: &GranularityId,
        from_index: i64,
        reducer: R,
        initial: Count,
    ) -> Result<Option<Count>, CounterError>
    where
        R: Fn(Count, Count) -> Count,
    {
        match self.events.get(event) {
            None => Ok(None),
            Some(counter) => counter
                .query(num_buckets, granularity, from_index, reducer, initial)
                .map(Some),
        }
    }

    /// Occurrences in the last `num_buckets` buckets, the current one
    /// included.
    pub fn recent_count(
        &self,
        event: &EventId,
        num_buckets: i64,
        granularity: &GranularityId,
    ) -> Result<Option<Count>, CounterError> {
        self.query(event, num_buckets, granularity, 0, sum, 0)
    }

    /// Like [`Self::recent_count`], starting `from_index` buckets back:
    /// with a `day` granularity, `from_index` 1 selects yesterday.
    pub fn count_at(
        &self,
        event: &EventId,
        num_buckets: i64,
        granularity: &GranularityId,
        from_index: i64,
    ) -> Result<Option<Count>, CounterError> {
        self.query(event, num_buckets, granularity, from_index, sum, 0)
    }

    /// How many of the last `num_buckets` buckets saw any activity, e.g.
    /// active days in the last 28.
    pub fn active_recent(
        &self,
        event: &EventId,
        num_buckets: i64,
        granularity: &GranularityId,
    ) -> Result<Option<Count>, CounterError> {
        self.query(event, num_buckets, granularity, 0, count_nonzero, 0)
    }

    /// Like [`Self::active_recent`], starting `from_index` buckets back.
    pub fn active_at(
        &self,
        event: &EventId,
        num_buckets: i64,
        granularity: &GranularityId,
        from_index: i64,
    ) -> Result<Option<Count>, CounterError> {
        self.query(event, num_buckets, granularity, from_index, count_nonzero, 0)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
