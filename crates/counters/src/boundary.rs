use std::collections::HashMap;

use crate::config::{GranularityConfig, GranularityId};
use crate::{Instant, Millis};

/// Calendar capability: where does the current interval of a granularity
/// begin? Passed into [`crate::CascadingCounter::new`] as an explicit
/// capability object, never held as global state, so tests can swap in a
/// deterministic implementation.
pub trait BoundaryCalculator {
    /// Whether this calculator knows the granularity at all. Unsupported
    /// ids exclude the granularity from a counter; they are never an
    /// error.
    fn supports(&self, id: &GranularityId) -> bool;

    /// Start of the interval containing `now` for the given granularity,
    /// or `None` when the id is unsupported.
    fn start_of_current_interval(&self, now: Instant, id: &GranularityId) -> Option<Instant>;
}

/// Boundary calculator that aligns every granularity to a fixed origin
/// instead of the calendar: intervals start at `origin + k * width`.
///
/// Deterministic by construction, which makes it the calculator of choice
/// for anything driven by a synthetic clock.
#[derive(Debug, Clone)]
pub struct EpochBoundaries {
    origin: Instant,
    widths: HashMap<GranularityId, Millis>,
}

impl EpochBoundaries {
    pub fn new(origin: Instant) -> Self {
        Self {
            origin,
            widths: HashMap::new(),
        }
    }

    /// Register `id` with buckets `width` milliseconds wide.
    pub fn with_granularity(mut self, id: impl Into<GranularityId>, width: Millis) -> Self {
        self.widths.insert(id.into(), width);
        self
    }

    /// Align every granularity in `configs` to `origin`.
    pub fn for_configs(origin: Instant, configs: &[GranularityConfig]) -> Self {
        let widths = configs
            .iter()
            .map(|config| (config.id().clone(), config.bucket_millis()))
            .collect();
        Self { origin, widths }
    }
}

impl BoundaryCalculator for EpochBoundaries {
    fn supports(&self, id: &GranularityId) -> bool {
        self.widths.contains_key(id)
    }

    fn start_of_current_interval(&self, now: Instant, id: &GranularityId) -> Option<Instant> {
        let width = *self.widths.get(id)?;
        Some(self.origin + (now - self.origin).div_euclid(width) * width)
    }
}
