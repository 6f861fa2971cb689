use crate::buffer::BucketBuffer;
use crate::config::{GranularityConfig, GranularityId};
use crate::error::CounterError;
use crate::{Count, Instant};

/// Event counts for one granularity: a fixed bucket width and a fixed
/// number of retained buckets.
#[derive(Debug, Clone)]
pub struct GranularityCounter {
    config: GranularityConfig,
    data: BucketBuffer,
}

impl GranularityCounter {
    /// An empty counter whose current interval starts at `interval_start`,
    /// normally the granularity's canonical boundary at or before "now".
    pub fn new(config: GranularityConfig, interval_start: Instant) -> Self {
        let data = BucketBuffer::empty(config.bucket_count(), interval_start);
        Self { config, data }
    }

    pub fn id(&self) -> &GranularityId {
        self.config.id()
    }

    pub fn config(&self) -> &GranularityConfig {
        &self.config
    }

    /// Live approximation of the current interval's count. After a cascade
    /// advance it holds what the next finer granularity accumulated since
    /// this interval began.
    pub fn estimate(&self) -> Count {
        self.data.current()
    }

    /// Exact running sum across all retained buckets.
    pub fn total(&self) -> Count {
        self.data.total()
    }

    pub fn increment(&mut self, count: Count) {
        self.data.increment(count);
    }

    /// Whole intervals elapsed since the current bucket began. Zero or
    /// negative means no rollover is due; negative happens when `now`
    /// precedes the interval start (caller clock skew).
    pub fn num_elapsed_intervals(&self, now: Instant) -> i64 {
        (now - self.data.interval_start()).div_euclid(self.config.bucket_millis())
    }

    /// Rotate if at least one interval elapsed, seeding the new current
    /// bucket with `carry_in`. Returns the evicted overflow, or `None` when
    /// no rotation was due. `None` is distinct from `Some(0)`, a rotation
    /// that evicted nothing.
    pub fn maybe_advance(&mut self, now: Instant, carry_in: Count) -> Option<Count> {
        let elapsed = self.num_elapsed_intervals(now);
        if elapsed <= 0 {
            return None;
        }
        // Step by whole intervals rather than jumping to `now`, so the
        // fractional remainder is still owed to the next rollover.
        self.data.advance_start(elapsed * self.config.bucket_millis());
        Some(self.data.rotate(elapsed, carry_in))
    }

    pub fn query<R>(&self, index: i64, num_buckets: i64, reducer: R, initial: Count) -> Count
    where
        R: Fn(Count, Count) -> Count,
    {
        self.data.query(index, num_buckets, reducer, initial)
    }

    pub fn check_invariant(&self) -> Result<(), CounterError> {
        let observed = self.data.len();
        let expected = self.config.bucket_count();
        if observed != expected {
            return Err(CounterError::BucketCountMismatch { expected, observed });
        }
        self.data.check_invariant()
    }
}
