//! Device identity helpers.
//!
//! The instrumentation client assigns each install a random identifier when
//! no vendor advertising identifier is usable. Generation is stateless; the
//! caller decides where (and whether) the value is persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Random device identifier (UUID v4, lower-case hyphenated form).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub String);

impl DeviceId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        DeviceId(uuid::Uuid::new_v4().to_string())
    }

    /// Parse and validate an existing identifier string.
    pub fn parse(s: &str) -> Option<Self> {
        if uuid::Uuid::parse_str(s).is_err() {
            return None;
        }
        Some(DeviceId(s.to_string()))
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
