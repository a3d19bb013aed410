//! Platform collaborator interfaces.
//!
//! The engine never talks to the operating system directly; the host bridge
//! implements these traits over whatever the platform offers (system
//! services on device, stubs in tests). Collaborators fall into two groups:
//! - Always present: build info, locale, secure settings, permission checks
//! - Possibly absent: telephony, location sources, reverse geocoder, and the
//!   optional vendor services reached through the capability registry
//!
//! Absence of an optional collaborator is a normal state, not a fault; every
//! resolver degrades to an absent attribute.

use dc_common::{LocationFix, Result};
use serde::{Deserialize, Serialize};

use crate::capability::CapabilityRegistry;

/// Hardware and OS identity fields.
///
/// These have no external dependency and cannot fail; the bridge reads them
/// once from the platform's build constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    /// OS release version.
    pub os_version: String,
    /// Hardware brand.
    pub brand: String,
    /// Hardware manufacturer.
    pub manufacturer: String,
    /// Hardware model.
    pub model: String,
}

/// Language and country of the active system locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleInfo {
    /// ISO 639 language code, may be empty.
    pub language: String,
    /// ISO 3166 country code, may be empty.
    pub country: String,
}

/// Radio technology reported by telephony.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneType {
    /// No voice radio.
    None,
    /// GSM family.
    Gsm,
    /// CDMA family. Network country ISO codes are unreliable here.
    Cdma,
    /// SIP-based voice.
    Sip,
}

/// Telephony information source.
pub trait Telephony: Send + Sync {
    /// Display name of the registered network operator.
    fn operator_name(&self) -> Result<Option<String>>;

    /// Radio technology of the device.
    fn phone_type(&self) -> Result<PhoneType>;

    /// ISO country code of the registered network, lower- or mixed-case.
    fn network_country_iso(&self) -> Result<Option<String>>;
}

/// Registry of location sources and their last-known fixes.
pub trait LocationSources: Send + Sync {
    /// Names of the currently enabled sources.
    fn enabled_sources(&self) -> Result<Vec<String>>;

    /// Last known fix recorded by a source, if any.
    fn last_known_fix(&self, source: &str) -> Result<Option<LocationFix>>;
}

/// Reverse-geocoding capability.
pub trait ReverseGeocoder: Send + Sync {
    /// Country code of the first usable address for the coordinates.
    fn country_code(&self, latitude: f64, longitude: f64) -> Result<Option<String>>;
}

/// Secure key-value settings store.
///
/// Absence of a key is reported as `None`, never as an error.
pub trait SecureSettings: Send + Sync {
    fn string_value(&self, key: &str) -> Option<String>;
    fn int_value(&self, key: &str) -> Option<i64>;
}

/// Aggregate handle to every platform collaborator.
///
/// The `Option`-returning accessors model services the device may simply not
/// have (no telephony radio, no location manager, no geocoder backend);
/// resolvers treat `None` the same as a service that failed to answer.
pub trait Platform: Send + Sync {
    /// Hardware and OS identity. Infallible.
    fn build_info(&self) -> BuildInfo;

    /// Host application version from package metadata, if readable.
    fn app_version(&self) -> Option<String>;

    /// The active system locale.
    fn active_locale(&self) -> LocaleInfo;

    /// Whether the host granted a location permission.
    fn has_location_permission(&self) -> bool;

    /// Secure settings store.
    fn secure_settings(&self) -> &dyn SecureSettings;

    /// Telephony service, when the device has one.
    fn telephony(&self) -> Option<&dyn Telephony>;

    /// Location source registry, when the device has one.
    fn location_sources(&self) -> Option<&dyn LocationSources>;

    /// Reverse geocoder, when present.
    fn geocoder(&self) -> Option<&dyn ReverseGeocoder>;

    /// Registry of optional vendor services.
    fn capabilities(&self) -> &CapabilityRegistry;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_type_serde_names() {
        assert_eq!(
            serde_json::to_string(&PhoneType::Cdma).unwrap(),
            "\"cdma\""
        );
        assert_eq!(serde_json::to_string(&PhoneType::Gsm).unwrap(), "\"gsm\"");
    }

    #[test]
    fn test_locale_info_default_is_empty() {
        let locale = LocaleInfo::default();
        assert!(locale.language.is_empty());
        assert!(locale.country.is_empty());
    }
}
