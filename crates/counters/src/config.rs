use core::fmt;
use std::time::Duration;

use duration_str::deserialize_duration;
use serde::{Deserialize, Serialize};

use crate::error::CounterError;
use crate::Millis;

/// Stable identifier of one granularity, e.g. `minute`, `hour`, `day`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GranularityId(String);

impl GranularityId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GranularityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GranularityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for GranularityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Immutable geometry of one granularity: how wide each bucket is and how
/// many buckets are retained. Never changes after the owning counter is
/// built.
///
/// Deserializes with human-readable durations, so a config file can say
/// `"bucket_duration": "1m"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawGranularityConfig")]
pub struct GranularityConfig {
    id: GranularityId,
    bucket_duration: Duration,
    bucket_count: usize,
}

impl GranularityConfig {
    /// Panics if the duration is shorter than a millisecond or the bucket
    /// count is zero; both are construction-time programmer errors.
    pub fn new(id: impl Into<GranularityId>, bucket_duration: Duration, bucket_count: usize) -> Self {
        assert!(bucket_count >= 1, "a granularity retains at least one bucket");
        assert!(
            bucket_duration.as_millis() >= 1,
            "bucket duration must be at least one millisecond"
        );
        Self {
            id: id.into(),
            bucket_duration,
            bucket_count,
        }
    }

    pub fn id(&self) -> &GranularityId {
        &self.id
    }

    pub fn bucket_duration(&self) -> Duration {
        self.bucket_duration
    }

    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    /// Bucket width on the millisecond timeline the counters run on.
    pub fn bucket_millis(&self) -> Millis {
        self.bucket_duration.as_millis() as Millis
    }
}

#[derive(Deserialize)]
struct RawGranularityConfig {
    id: GranularityId,
    #[serde(deserialize_with = "deserialize_duration")]
    bucket_duration: Duration,
    bucket_count: usize,
}

impl TryFrom<RawGranularityConfig> for GranularityConfig {
    type Error = CounterError;

    fn try_from(raw: RawGranularityConfig) -> Result<Self, Self::Error> {
        if raw.bucket_count < 1 {
            return Err(CounterError::InvalidConfig {
                id: raw.id,
                reason: "bucket_count must be at least 1",
            });
        }
        if raw.bucket_duration.as_millis() < 1 {
            return Err(CounterError::InvalidConfig {
                id: raw.id,
                reason: "bucket_duration must be at least one millisecond",
            });
        }
        Ok(Self {
            id: raw.id,
            bucket_duration: raw.bucket_duration,
            bucket_count: raw.bucket_count,
        })
    }
}
