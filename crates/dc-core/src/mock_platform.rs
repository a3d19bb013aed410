//! Mock platform collaborators for testing.
//!
//! This module provides builder-style mocks for every collaborator trait so
//! tests can assemble exactly the device they need: a bare device with no
//! optional services, a fully equipped one, or anything between. Mocks
//! record invocation counts so tests can assert that gated collaborators
//! were never consulted.
//!
//! # Example
//!
//! ```ignore
//! use dc_core::mock_platform::{MockPlatform, MockTelephony};
//!
//! let platform = MockPlatform::builder()
//!     .manufacturer("Amazon")
//!     .telephony(MockTelephony::new().network_country_iso("de"))
//!     .build();
//! ```

use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use dc_common::{Error, LocationFix, Result};

use crate::capability::{Capability, CapabilityRegistry};
use crate::platform::{
    BuildInfo, LocaleInfo, LocationSources, PhoneType, Platform, ReverseGeocoder, SecureSettings,
    Telephony,
};

// ============================================================================
// MockTelephony
// ============================================================================

/// Mock telephony source.
///
/// Defaults: GSM phone type, no operator, no network country ISO.
pub struct MockTelephony {
    operator: Mutex<Option<String>>,
    phone_type: Mutex<PhoneType>,
    iso: Mutex<Option<String>>,
    iso_calls: AtomicUsize,
}

impl MockTelephony {
    pub fn new() -> Self {
        MockTelephony {
            operator: Mutex::new(None),
            phone_type: Mutex::new(PhoneType::Gsm),
            iso: Mutex::new(None),
            iso_calls: AtomicUsize::new(0),
        }
    }

    pub fn operator_name(self, name: &str) -> Self {
        *self.operator.lock().unwrap() = Some(name.to_string());
        self
    }

    pub fn phone_type(self, phone_type: PhoneType) -> Self {
        *self.phone_type.lock().unwrap() = phone_type;
        self
    }

    pub fn network_country_iso(self, iso: &str) -> Self {
        *self.iso.lock().unwrap() = Some(iso.to_string());
        self
    }

    /// How many times the network country ISO was read.
    pub fn iso_calls(&self) -> usize {
        self.iso_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockTelephony {
    fn default() -> Self {
        Self::new()
    }
}

impl Telephony for MockTelephony {
    fn operator_name(&self) -> Result<Option<String>> {
        Ok(self.operator.lock().unwrap().clone())
    }

    fn phone_type(&self) -> Result<PhoneType> {
        Ok(*self.phone_type.lock().unwrap())
    }

    fn network_country_iso(&self) -> Result<Option<String>> {
        self.iso_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.iso.lock().unwrap().clone())
    }
}

// ============================================================================
// MockLocationSources
// ============================================================================

enum SourceBehavior {
    Fix(LocationFix),
    Fails,
}

/// Mock location source registry.
///
/// Sources are enumerated in registration order, which keeps selection
/// tie-breaks deterministic.
pub struct MockLocationSources {
    sources: Vec<(String, SourceBehavior)>,
    fail_enumeration: bool,
    calls: AtomicUsize,
}

impl MockLocationSources {
    pub fn new() -> Self {
        MockLocationSources {
            sources: Vec::new(),
            fail_enumeration: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Register a source named after the fix's `source` field.
    pub fn with_fix(mut self, fix: LocationFix) -> Self {
        self.sources
            .push((fix.source.clone(), SourceBehavior::Fix(fix)));
        self
    }

    /// Register a source whose fetch always fails.
    pub fn with_failing_source(mut self, name: &str) -> Self {
        self.sources
            .push((name.to_string(), SourceBehavior::Fails));
        self
    }

    /// Make the enumeration call itself fail.
    pub fn failing_enumeration(mut self) -> Self {
        self.fail_enumeration = true;
        self
    }

    /// How many times any registry operation was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockLocationSources {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationSources for MockLocationSources {
    fn enabled_sources(&self) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_enumeration {
            return Err(Error::ServiceUnavailable(
                "location source enumeration failed".into(),
            ));
        }
        Ok(self.sources.iter().map(|(name, _)| name.clone()).collect())
    }

    fn last_known_fix(&self, source: &str) -> Result<Option<LocationFix>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.sources.iter().find(|(name, _)| name == source) {
            Some((_, SourceBehavior::Fix(fix))) => Ok(Some(fix.clone())),
            Some((_, SourceBehavior::Fails)) => Err(Error::ServiceUnavailable(format!(
                "location source {source} unavailable"
            ))),
            None => Ok(None),
        }
    }
}

// ============================================================================
// MockGeocoder
// ============================================================================

/// Mock reverse geocoder with a fixed outcome.
pub struct MockGeocoder {
    outcome: Result<Option<String>>,
    calls: AtomicUsize,
}

impl MockGeocoder {
    /// Geocoder that resolves every coordinate to `country_code`.
    pub fn returning(country_code: &str) -> Self {
        MockGeocoder {
            outcome: Ok(Some(country_code.to_string())),
            calls: AtomicUsize::new(0),
        }
    }

    /// Geocoder that resolves every coordinate to no address.
    pub fn empty() -> Self {
        MockGeocoder {
            outcome: Ok(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// Geocoder that fails every call.
    pub fn failing(err: Error) -> Self {
        MockGeocoder {
            outcome: Err(err),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ReverseGeocoder for MockGeocoder {
    fn country_code(&self, _latitude: f64, _longitude: f64) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

// ============================================================================
// MockCapability
// ============================================================================

/// Mock optional service with a fixed response and a call counter.
pub struct MockCapability {
    outcome: Result<Value>,
    calls: AtomicUsize,
}

impl MockCapability {
    pub fn returning(value: Value) -> Self {
        MockCapability {
            outcome: Ok(value),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: Error) -> Self {
        MockCapability {
            outcome: Err(err),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Capability for MockCapability {
    fn invoke(&self, _args: &Value) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

// ============================================================================
// MockSettings
// ============================================================================

/// Mock secure settings store backed by in-memory maps.
#[derive(Default)]
pub struct MockSettings {
    strings: HashMap<String, String>,
    ints: HashMap<String, i64>,
}

impl SecureSettings for MockSettings {
    fn string_value(&self, key: &str) -> Option<String> {
        self.strings.get(key).cloned()
    }

    fn int_value(&self, key: &str) -> Option<i64> {
        self.ints.get(key).copied()
    }
}

// ============================================================================
// MockPlatform
// ============================================================================

/// Mock platform bridge assembled by [`MockPlatformBuilder`].
///
/// Locale and app version can be mutated after construction so tests can
/// prove snapshot idempotence against changing platform state.
pub struct MockPlatform {
    build: BuildInfo,
    app_version: Mutex<Option<String>>,
    locale: Mutex<LocaleInfo>,
    permission: bool,
    settings: MockSettings,
    telephony: Option<MockTelephony>,
    location_sources: Option<MockLocationSources>,
    geocoder: Option<MockGeocoder>,
    registry: CapabilityRegistry,
    capability_mocks: HashMap<String, Arc<MockCapability>>,
}

impl MockPlatform {
    pub fn builder() -> MockPlatformBuilder {
        MockPlatformBuilder::new()
    }

    /// Replace the active locale reported to the engine.
    pub fn set_locale(&self, language: &str, country: &str) {
        *self.locale.lock().unwrap() = LocaleInfo {
            language: language.to_string(),
            country: country.to_string(),
        };
    }

    /// Replace the app version reported to the engine.
    pub fn set_app_version(&self, version: Option<&str>) {
        *self.app_version.lock().unwrap() = version.map(str::to_string);
    }

    /// Total calls made against the location source registry.
    pub fn location_source_calls(&self) -> usize {
        self.location_sources.as_ref().map_or(0, |s| s.calls())
    }

    /// Calls made against the reverse geocoder.
    pub fn geocoder_calls(&self) -> usize {
        self.geocoder.as_ref().map_or(0, |g| g.calls())
    }

    /// Reads of the telephony network country ISO.
    pub fn network_iso_calls(&self) -> usize {
        self.telephony.as_ref().map_or(0, |t| t.iso_calls())
    }

    /// Invocations of a registered optional service.
    pub fn capability_calls(&self, name: &str) -> usize {
        self.capability_mocks.get(name).map_or(0, |c| c.calls())
    }
}

impl Platform for MockPlatform {
    fn build_info(&self) -> BuildInfo {
        self.build.clone()
    }

    fn app_version(&self) -> Option<String> {
        self.app_version.lock().unwrap().clone()
    }

    fn active_locale(&self) -> LocaleInfo {
        self.locale.lock().unwrap().clone()
    }

    fn has_location_permission(&self) -> bool {
        self.permission
    }

    fn secure_settings(&self) -> &dyn SecureSettings {
        &self.settings
    }

    fn telephony(&self) -> Option<&dyn Telephony> {
        self.telephony.as_ref().map(|t| t as &dyn Telephony)
    }

    fn location_sources(&self) -> Option<&dyn LocationSources> {
        self.location_sources
            .as_ref()
            .map(|s| s as &dyn LocationSources)
    }

    fn geocoder(&self) -> Option<&dyn ReverseGeocoder> {
        self.geocoder.as_ref().map(|g| g as &dyn ReverseGeocoder)
    }

    fn capabilities(&self) -> &CapabilityRegistry {
        &self.registry
    }
}

/// Builder for [`MockPlatform`].
///
/// Defaults describe a plain device: Google Pixel hardware, English locale
/// with no country, location permission granted, no telephony, no location
/// sources, no geocoder, no optional services.
pub struct MockPlatformBuilder {
    build: BuildInfo,
    app_version: Option<String>,
    locale: LocaleInfo,
    permission: bool,
    settings: MockSettings,
    telephony: Option<MockTelephony>,
    location_sources: Option<MockLocationSources>,
    geocoder: Option<MockGeocoder>,
    capabilities: Vec<(String, Arc<MockCapability>)>,
}

impl MockPlatformBuilder {
    pub fn new() -> Self {
        MockPlatformBuilder {
            build: BuildInfo {
                os_version: "14".to_string(),
                brand: "google".to_string(),
                manufacturer: "Google".to_string(),
                model: "Pixel 8".to_string(),
            },
            app_version: None,
            locale: LocaleInfo {
                language: "en".to_string(),
                country: String::new(),
            },
            permission: true,
            settings: MockSettings::default(),
            telephony: None,
            location_sources: None,
            geocoder: None,
            capabilities: Vec::new(),
        }
    }

    pub fn build_info(mut self, build: BuildInfo) -> Self {
        self.build = build;
        self
    }

    pub fn manufacturer(mut self, manufacturer: &str) -> Self {
        self.build.manufacturer = manufacturer.to_string();
        self
    }

    pub fn app_version(mut self, version: &str) -> Self {
        self.app_version = Some(version.to_string());
        self
    }

    pub fn locale(mut self, language: &str, country: &str) -> Self {
        self.locale = LocaleInfo {
            language: language.to_string(),
            country: country.to_string(),
        };
        self
    }

    pub fn location_permission(mut self, granted: bool) -> Self {
        self.permission = granted;
        self
    }

    pub fn setting_string(mut self, key: &str, value: &str) -> Self {
        self.settings
            .strings
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn setting_int(mut self, key: &str, value: i64) -> Self {
        self.settings.ints.insert(key.to_string(), value);
        self
    }

    pub fn telephony(mut self, telephony: MockTelephony) -> Self {
        self.telephony = Some(telephony);
        self
    }

    pub fn location_sources(mut self, sources: MockLocationSources) -> Self {
        self.location_sources = Some(sources);
        self
    }

    pub fn geocoder(mut self, geocoder: MockGeocoder) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    pub fn capability(mut self, name: &str, capability: MockCapability) -> Self {
        self.capabilities.push((name.to_string(), Arc::new(capability)));
        self
    }

    pub fn build(self) -> MockPlatform {
        let mut registry = CapabilityRegistry::new();
        let mut capability_mocks = HashMap::new();
        for (name, capability) in self.capabilities {
            registry.register(name.clone(), capability.clone() as Arc<dyn Capability>);
            capability_mocks.insert(name, capability);
        }
        MockPlatform {
            build: self.build,
            app_version: Mutex::new(self.app_version),
            locale: Mutex::new(self.locale),
            permission: self.permission,
            settings: self.settings,
            telephony: self.telephony,
            location_sources: self.location_sources,
            geocoder: self.geocoder,
            registry,
            capability_mocks,
        }
    }
}

impl Default for MockPlatformBuilder {
    fn default() -> Self {
        Self::new()
    }
}
