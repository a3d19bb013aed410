//! Context configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a [`DeviceContext`](crate::DeviceContext).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Whether location sources may be consulted. Gates both the live
    /// most-recent-location read and the geocoding step of country
    /// resolution.
    pub location_listening: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        ContextConfig {
            location_listening: true,
        }
    }
}

impl ContextConfig {
    /// Set the initial location-listening flag.
    pub fn with_location_listening(mut self, enabled: bool) -> Self {
        self.location_listening = enabled;
        self
    }
}
