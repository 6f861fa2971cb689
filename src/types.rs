use core::fmt;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Identifier of a tracked event type, e.g. `tab.opened`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(String);

impl EventId {
    pub fn try_new<A: AsRef<str>>(id: A) -> Result<Self> {
        let id = id.as_ref();
        if id.is_empty() {
            bail!("event id cannot be empty");
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
