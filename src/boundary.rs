use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use counters::{BoundaryCalculator, GranularityId, Instant};

/// Calendar-rule boundaries in UTC: the top of the second, minute and
/// hour, midnight, the start of the week (Sunday) and January 1st.
///
/// The supported ids match the preset granularity tables in
/// [`crate::intervals`]; anything else is excluded, which the counters
/// treat as "drop this granularity", never as an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarBoundaries;

const SUPPORTED: &[&str] = &["second", "minute", "hour", "day", "week", "year"];

impl BoundaryCalculator for CalendarBoundaries {
    fn supports(&self, id: &GranularityId) -> bool {
        SUPPORTED.contains(&id.as_str())
    }

    fn start_of_current_interval(&self, now: Instant, id: &GranularityId) -> Option<Instant> {
        let ts = Utc.timestamp_millis_opt(now).single()?;
        let start = match id.as_str() {
            "second" => ts.with_nanosecond(0)?,
            "minute" => ts.with_nanosecond(0)?.with_second(0)?,
            "hour" => ts.with_nanosecond(0)?.with_second(0)?.with_minute(0)?,
            "day" => midnight(ts)?,
            "week" => {
                let days_back = i64::from(ts.weekday().num_days_from_sunday());
                midnight(ts)? - chrono::Duration::days(days_back)
            }
            "year" => Utc.with_ymd_and_hms(ts.year(), 1, 1, 0, 0, 0).single()?,
            _ => return None,
        };
        Some(start.timestamp_millis())
    }
}

fn midnight(ts: DateTime<Utc>) -> Option<DateTime<Utc>> {
    ts.with_nanosecond(0)?
        .with_second(0)?
        .with_minute(0)?
        .with_hour(0)
}
