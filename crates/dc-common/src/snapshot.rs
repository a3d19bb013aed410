//! Device snapshot schema and types.
//!
//! This module defines the resolved device attribute snapshot served by the
//! context cache, plus the payload types the resolvers produce:
//! - `DeviceSnapshot` is computed once per process and never mutated
//! - `AdvertisingIdentity` pairs the identifier with the user opt-out flag
//! - `LocationFix` is never cached and is recomputed on every request

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current snapshot schema version.
pub const SNAPSHOT_SCHEMA_VERSION: &str = "1.0.0";

/// Operating system name reported in every snapshot.
pub const OS_NAME: &str = "android";

/// Immutable record of resolved device attributes.
///
/// Created exactly once on first access to any attribute, then served
/// unchanged for the lifetime of the owning context. Optional fields are
/// `None` when the backing collaborator was absent or failed; the identity
/// fields (OS, hardware) have no external dependency and are always set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// OS name (constant, see [`OS_NAME`]).
    pub os_name: String,

    /// OS release version.
    pub os_version: String,

    /// Hardware brand.
    pub brand: String,

    /// Hardware manufacturer.
    pub manufacturer: String,

    /// Hardware model.
    pub model: String,

    /// Host application version, if package metadata was readable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,

    /// Language code of the active locale.
    pub language: String,

    /// Network carrier name, if telephony reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,

    /// Approximate country code (geocoded, network, or locale).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Advertising identifier and opt-out flag.
    pub advertising: AdvertisingIdentity,

    /// Whether the optional vendor services runtime reported itself available.
    pub services_available: bool,

    /// App-set identifier, if the optional service provided one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_set_id: Option<String>,

    /// When this snapshot was resolved.
    pub resolved_at: DateTime<Utc>,
}

/// Advertising identifier paired with the limit-ad-tracking opt-out flag.
///
/// The default value (no identifier, tracking not limited) is what every
/// failed or absent resolution path produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvertisingIdentity {
    /// The advertising identifier, absent when unavailable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// User opt-out signal. Defaults to false when the store has no value.
    #[serde(default)]
    pub limit_ad_tracking: bool,
}

/// A single location fix reported by one location source.
///
/// Fixes are fetched fresh on every request and compared by timestamp; the
/// most recent one wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    /// Latitude in degrees.
    pub latitude: f64,

    /// Longitude in degrees.
    pub longitude: f64,

    /// Name of the source that produced the fix.
    pub source: String,

    /// Wall-clock time the fix was recorded.
    pub timestamp: DateTime<Utc>,
}
