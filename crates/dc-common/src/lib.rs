//! Device Context common types, identifiers, and errors.
//!
//! This crate provides foundational types shared across dc-core modules:
//! - The resolved device snapshot schema
//! - Advertising identity and location fix payloads
//! - Device identifier generation
//! - Common error types

pub mod error;
pub mod id;
pub mod snapshot;

pub use error::{Error, ErrorCategory, Result};
pub use id::DeviceId;
pub use snapshot::{
    AdvertisingIdentity, DeviceSnapshot, LocationFix, OS_NAME, SNAPSHOT_SCHEMA_VERSION,
};
