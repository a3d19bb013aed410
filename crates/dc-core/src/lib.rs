//! Device Context attribute resolution engine.
//!
//! This library resolves a snapshot of host-device attributes for an
//! instrumentation client:
//! - One-time lazy snapshot computation with cached reads
//! - Multi-source country fallback chain (geocode, network, locale)
//! - Optional vendor service probing without a hard dependency
//! - Most-recent-location selection across enabled sources
//!
//! The host application implements the [`platform::Platform`] collaborator
//! traits over its system services; the engine owns all resolution policy
//! and failure handling. See [`context::DeviceContext`] for the public
//! surface.

pub mod advertising;
pub mod capability;
pub mod config;
pub mod context;
pub mod country;
pub mod location;
pub mod logging;
pub mod platform;

// Re-export mock collaborators for integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod mock_platform;

pub use config::ContextConfig;
pub use context::DeviceContext;
pub use dc_common::{AdvertisingIdentity, DeviceSnapshot, LocationFix};
