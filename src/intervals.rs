//! Granularity presets shared by the registry and tests.

use std::time::Duration;

use counters::{GranularityConfig, Millis};

pub const SECOND: Millis = 1_000;
pub const MINUTE: Millis = 60 * SECOND;
pub const HOUR: Millis = 60 * MINUTE;
pub const DAY: Millis = 24 * HOUR;
pub const WEEK: Millis = 7 * DAY;

/// The production set: an hour of minutes, a day of hours, four weeks of
/// days, a year of weeks and five years.
pub fn default_intervals() -> Vec<GranularityConfig> {
    vec![
        GranularityConfig::new("minute", Duration::from_secs(60), 60),
        GranularityConfig::new("hour", Duration::from_secs(60 * 60), 24),
        GranularityConfig::new("day", Duration::from_secs(24 * 60 * 60), 28),
        GranularityConfig::new("week", Duration::from_secs(7 * 24 * 60 * 60), 52),
        GranularityConfig::new("year", Duration::from_secs(365 * 24 * 60 * 60), 5),
    ]
}

/// Finer-grained set for exercising rollovers quickly.
pub fn test_intervals() -> Vec<GranularityConfig> {
    vec![
        GranularityConfig::new("second", Duration::from_secs(1), 60),
        GranularityConfig::new("minute", Duration::from_secs(60), 60),
        GranularityConfig::new("hour", Duration::from_secs(60 * 60), 24),
        GranularityConfig::new("day", Duration::from_secs(24 * 60 * 60), 7),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::CalendarBoundaries;
    use counters::BoundaryCalculator;

    #[test]
    fn presets_are_fully_supported_by_the_calendar() {
        for config in default_intervals().iter().chain(test_intervals().iter()) {
            assert!(
                CalendarBoundaries.supports(config.id()),
                "{} not supported",
                config.id()
            );
        }
    }
}
