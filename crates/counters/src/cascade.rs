use crate::boundary::BoundaryCalculator;
use crate::config::{GranularityConfig, GranularityId};
use crate::counter::GranularityCounter;
use crate::error::CounterError;
use crate::{Count, Instant};

/// Rolling counts for one event across several granularities at once,
/// ordered finest first.
///
/// Every increment lands in every level. On advance, each finer level's
/// exact running total becomes the next coarser level's current bucket:
/// a rotation carry-in when the coarser interval rolled over, a corrective
/// increment when it did not. Coarse buckets therefore reflect
/// up-to-the-moment activity without waiting for their own interval to
/// elapse.
#[derive(Debug)]
pub struct CascadingCounter {
    counters: Vec<GranularityCounter>,
}

impl CascadingCounter {
    /// Build one counter per configured granularity the calculator
    /// supports, each seeded at its granularity's current boundary before
    /// `now`. Unsupported configs are dropped, which lets tests run with
    /// partial granularity sets.
    pub fn new(
        now: Instant,
        configs: Vec<GranularityConfig>,
        boundaries: &dyn BoundaryCalculator,
    ) -> Self {
        let counters = configs
            .into_iter()
            .filter(|config| boundaries.supports(config.id()))
            .filter_map(|config| {
                let start = boundaries.start_of_current_interval(now, config.id())?;
                Some(GranularityCounter::new(config, start))
            })
            .collect();
        Self { counters }
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn counter(&self, id: &GranularityId) -> Option<&GranularityCounter> {
        self.counters.iter().find(|c| c.id() == id)
    }

    /// Record `count` occurrences at every granularity.
    pub fn increment(&mut self, count: Count) {
        for counter in &mut self.counters {
            counter.increment(count);
        }
    }

    /// Apply due rollovers finest to coarsest, threading each finer
    /// level's running total into the next coarser level's current bucket.
    /// A level whose own interval has not elapsed gets a corrective
    /// increment instead, so its estimate stays current either way.
    ///
    /// Returns the coarsest level's total, or `None` when the finest level
    /// had no rollover due. The corrective pass runs in both cases.
    pub fn maybe_advance(&mut self, now: Instant) -> Option<Count> {
        let mut finest_advanced = false;
        let mut finer_total: Option<Count> = None;
        for counter in &mut self.counters {
            match finer_total {
                // The finest level has nothing finer to carry in.
                None => {
                    finest_advanced = counter.maybe_advance(now, 0).is_some();
                }
                Some(estimate) => {
                    if counter.maybe_advance(now, estimate).is_none() {
                        counter.increment(estimate - counter.estimate());
                    }
                }
            }
            finer_total = Some(counter.total());
        }
        if finest_advanced {
            finer_total
        } else {
            None
        }
    }

    /// Fold `num_buckets` buckets of the named granularity through
    /// `reducer`, starting at `from_index` (0 = the current bucket).
    ///
    /// An unknown id is a configuration mismatch and fails loudly; it is
    /// not an empty result.
    pub fn query<R>(
        &self,
        num_buckets: i64,
        id: &GranularityId,
        from_index: i64,
        reducer: R,
        initial: Count,
    ) -> Result<Count, CounterError>
    where
        R: Fn(Count, Count) -> Count,
    {
        let counter = self
            .counter(id)
            .ok_or_else(|| CounterError::UnknownGranularity { id: id.clone() })?;
        Ok(counter.query(from_index, num_buckets, reducer, initial))
    }

    /// Per-level total-equals-sum first, then the cross-level rule: each
    /// finer total must equal the next coarser estimate. Both hold at the
    /// boundaries of a completed `maybe_advance`, not mid-mutation.
    pub fn check_invariant(&self) -> Result<(), CounterError> {
        for counter in &self.counters {
            counter.check_invariant()?;
        }
        for pair in self.counters.windows(2) {
            let expected = pair[0].total();
            let observed = pair[1].estimate();
            if expected != observed {
                return Err(CounterError::EstimateMismatch {
                    finer: pair[0].id().clone(),
                    coarser: pair[1].id().clone(),
                    expected,
                    observed,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::boundary::EpochBoundaries;
    use crate::reducers::sum;

    const SECOND: i64 = 1_000;
    const MINUTE: i64 = 60 * SECOND;

    fn configs() -> Vec<GranularityConfig> {
        vec![
            GranularityConfig::new("second", Duration::from_secs(1), 60),
            GranularityConfig::new("minute", Duration::from_secs(60), 60),
            GranularityConfig::new("hour", Duration::from_secs(3600), 24),
        ]
    }

    fn counter_at(now: Instant) -> CascadingCounter {
        let configs = configs();
        let boundaries = EpochBoundaries::for_configs(0, &configs);
        CascadingCounter::new(now, configs, &boundaries)
    }

    #[test]
    fn every_granularity_sees_every_increment() {
        let mut counter = counter_at(0);
        counter.increment(1);
        assert_eq!(counter.query(1, &"second".into(), 0, sum, 0), Ok(1));
        assert_eq!(counter.query(1, &"minute".into(), 0, sum, 0), Ok(1));
        assert_eq!(counter.query(1, &"hour".into(), 0, sum, 0), Ok(1));
    }

    #[test]
    fn advancing_a_second_moves_the_count_back_one_bucket() {
        let mut counter = counter_at(0);
        counter.increment(1);
        counter.maybe_advance(SECOND);

        let second = GranularityId::new("second");
        let minute = GranularityId::new("minute");
        assert_eq!(counter.query(1, &second, 0, sum, 0), Ok(0));
        assert_eq!(counter.query(1, &second, 1, sum, 0), Ok(1));
        // The minute has not rolled over; its live estimate still covers
        // the event.
        assert_eq!(counter.query(1, &minute, 0, sum, 0), Ok(1));
        assert!(counter.check_invariant().is_ok());
    }

    #[test]
    fn sixty_seconds_of_activity_roll_into_the_minute() {
        let mut counter = counter_at(0);
        counter.increment(1);
        for i in 1..60 {
            counter.maybe_advance(i * SECOND);
            counter.increment(1);
            assert!(counter.check_invariant().is_ok());
        }
        let second = GranularityId::new("second");
        let minute = GranularityId::new("minute");
        assert_eq!(counter.query(60, &second, 0, sum, 0), Ok(60));
        assert_eq!(counter.counter(&minute).map(|c| c.estimate()), Some(60));

        counter.maybe_advance(60 * SECOND);
        // The finished minute bucket holds the whole minute; the new
        // current bucket is seeded from the second-level running total.
        assert_eq!(counter.query(1, &minute, 1, sum, 0), Ok(60));
        assert_eq!(counter.query(1, &minute, 0, sum, 0), Ok(59));
        assert!(counter.check_invariant().is_ok());
    }

    #[test]
    fn returns_none_when_the_finest_level_is_current() {
        let mut counter = counter_at(0);
        counter.increment(4);
        assert_eq!(counter.maybe_advance(300), None);
        // The corrective pass still ran.
        assert!(counter.check_invariant().is_ok());
    }

    #[test]
    fn some_zero_is_a_rotation_that_evicted_nothing() {
        let mut counter = counter_at(0);
        let coarsest_total = counter.maybe_advance(SECOND);
        assert_eq!(coarsest_total, Some(0));
    }

    #[test]
    fn a_long_quiet_gap_drains_every_level() {
        let mut counter = counter_at(0);
        counter.increment(5);
        let result = counter.maybe_advance(2 * 60 * MINUTE);
        assert_eq!(result, Some(0));
        let second = GranularityId::new("second");
        let minute = GranularityId::new("minute");
        assert_eq!(counter.query(60, &second, 0, sum, 0), Ok(0));
        assert_eq!(counter.query(60, &minute, 0, sum, 0), Ok(0));
        assert!(counter.check_invariant().is_ok());
    }

    #[test]
    fn unknown_granularity_fails_closed() {
        let counter = counter_at(0);
        let id = GranularityId::new("fortnight");
        assert_eq!(
            counter.query(1, &id, 0, sum, 0),
            Err(CounterError::UnknownGranularity { id })
        );
    }

    #[test]
    fn unsupported_configs_are_dropped_not_errors() {
        let boundaries = EpochBoundaries::new(0).with_granularity("second", SECOND);
        let counter = CascadingCounter::new(0, configs(), &boundaries);
        assert_eq!(counter.len(), 1);
        assert!(counter.counter(&GranularityId::new("minute")).is_none());
    }

    #[test]
    fn invariant_reports_the_pair_involved() {
        let mut counter = counter_at(0);
        counter.increment(2);
        counter.maybe_advance(MINUTE + SECOND);
        assert!(counter.check_invariant().is_ok());

        // Corrupt the minute estimate behind the cascade's back.
        counter.counters[1].increment(5);
        assert_eq!(
            counter.check_invariant(),
            Err(CounterError::EstimateMismatch {
                finer: GranularityId::new("second"),
                coarser: GranularityId::new("minute"),
                expected: 0,
                observed: 5,
            })
        );
    }
}
