//! The device context: one-time snapshot computation and cached reads.
//!
//! `DeviceContext` owns the snapshot cache. The first call to `prefetch()`
//! or to any attribute getter computes the full snapshot synchronously on
//! the calling thread; every later call serves the cached value unchanged,
//! even if the underlying platform state has moved on.
//!
//! Computation can block on platform I/O (location fetch, reverse geocode,
//! carrier query, vendor service calls). Do not touch any accessor from a
//! latency-sensitive execution context; call `prefetch()` from a worker
//! thread instead.

use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::debug;

use dc_common::{DeviceSnapshot, LocationFix, OS_NAME, SNAPSHOT_SCHEMA_VERSION};

use crate::advertising::{resolve_advertising_identity, Vendor};
use crate::capability::{resolve_app_set_id, services_available};
use crate::config::ContextConfig;
use crate::country::resolve_country;
use crate::location::most_recent_fix;
use crate::platform::Platform;

/// Lazily-computed, process-lifetime cache of device attributes.
///
/// Concurrent first access is safe: exactly one thread runs the
/// computation, racing callers block until the snapshot is published, and
/// no attribute is ever recomputed.
pub struct DeviceContext {
    platform: Arc<dyn Platform>,
    location_listening: AtomicBool,
    snapshot: OnceLock<DeviceSnapshot>,
}

impl DeviceContext {
    pub fn new(platform: Arc<dyn Platform>, config: ContextConfig) -> Self {
        DeviceContext {
            platform,
            location_listening: AtomicBool::new(config.location_listening),
            snapshot: OnceLock::new(),
        }
    }

    /// Construct with the default configuration (location listening on).
    pub fn with_defaults(platform: Arc<dyn Platform>) -> Self {
        Self::new(platform, ContextConfig::default())
    }

    /// Force snapshot computation now instead of on first attribute read.
    pub fn prefetch(&self) {
        self.snapshot();
    }

    /// The resolved snapshot, computing it on first call.
    pub fn snapshot(&self) -> &DeviceSnapshot {
        self.snapshot.get_or_init(|| {
            let listening = self.is_location_listening();
            compute_snapshot(self.platform.as_ref(), listening)
        })
    }

    pub fn app_version(&self) -> Option<&str> {
        self.snapshot().app_version.as_deref()
    }

    pub fn os_name(&self) -> &str {
        &self.snapshot().os_name
    }

    pub fn os_version(&self) -> &str {
        &self.snapshot().os_version
    }

    pub fn brand(&self) -> &str {
        &self.snapshot().brand
    }

    pub fn manufacturer(&self) -> &str {
        &self.snapshot().manufacturer
    }

    pub fn model(&self) -> &str {
        &self.snapshot().model
    }

    pub fn carrier(&self) -> Option<&str> {
        self.snapshot().carrier.as_deref()
    }

    pub fn country(&self) -> Option<&str> {
        self.snapshot().country.as_deref()
    }

    pub fn language(&self) -> &str {
        &self.snapshot().language
    }

    pub fn advertising_id(&self) -> Option<&str> {
        self.snapshot().advertising.id.as_deref()
    }

    pub fn limit_ad_tracking(&self) -> bool {
        self.snapshot().advertising.limit_ad_tracking
    }

    pub fn app_set_id(&self) -> Option<&str> {
        self.snapshot().app_set_id.as_deref()
    }

    pub fn services_available(&self) -> bool {
        self.snapshot().services_available
    }

    pub fn is_location_listening(&self) -> bool {
        self.location_listening.load(Ordering::Relaxed)
    }

    pub fn set_location_listening(&self, enabled: bool) {
        self.location_listening.store(enabled, Ordering::Relaxed);
    }

    /// The most recent location fix, re-resolved on every call.
    ///
    /// Unlike the snapshot attributes this is always live: the enabled
    /// sources are re-enumerated and re-read each time.
    pub fn most_recent_location(&self) -> Option<LocationFix> {
        most_recent_fix(self.platform.as_ref(), self.is_location_listening())
    }
}

/// Compute the full snapshot.
///
/// Order is fixed: identity fields with no external dependency first, then
/// locale, then the attributes that may block on platform I/O (carrier,
/// country, advertising identity, availability, app-set id). No field's
/// absence blocks computation of any other field.
fn compute_snapshot(platform: &dyn Platform, listening: bool) -> DeviceSnapshot {
    let build = platform.build_info();
    let vendor = Vendor::classify(&build.manufacturer);
    let app_version = platform.app_version();
    let locale = platform.active_locale();
    let carrier = resolve_carrier(platform);
    let country = resolve_country(platform, listening);
    let advertising = resolve_advertising_identity(platform, vendor);
    let services_available = services_available(platform.capabilities());
    let app_set_id = resolve_app_set_id(platform.capabilities());

    DeviceSnapshot {
        schema_version: SNAPSHOT_SCHEMA_VERSION.to_string(),
        os_name: OS_NAME.to_string(),
        os_version: build.os_version,
        brand: build.brand,
        manufacturer: build.manufacturer,
        model: build.model,
        app_version,
        language: locale.language,
        carrier,
        country,
        advertising,
        services_available,
        app_set_id,
        resolved_at: Utc::now(),
    }
}

fn resolve_carrier(platform: &dyn Platform) -> Option<String> {
    let telephony = platform.telephony()?;
    match telephony.operator_name() {
        Ok(Some(name)) if !name.is_empty() => Some(name),
        Ok(_) => None,
        Err(err) => {
            debug!(error = %err, "failed to read network operator name");
            None
        }
    }
}
