//! Country resolution fallback chain.
//!
//! Order of preference: reverse-geocoded location, network country ISO,
//! locale country. The first step to produce a non-empty code wins; every
//! failure inside a step makes that step yield nothing and the chain move
//! on. Must not be invoked from a latency-sensitive context: the geocoding
//! step can block on location and network I/O.

use tracing::{debug, warn};

use crate::location::most_recent_fix;
use crate::platform::{PhoneType, Platform};

/// Resolve the approximate country of the device.
///
/// Returns `None` only when all three steps are exhausted.
pub fn resolve_country(platform: &dyn Platform, listening: bool) -> Option<String> {
    country_from_location(platform, listening)
        .or_else(|| country_from_network(platform))
        .or_else(|| country_from_locale(platform))
}

fn country_from_location(platform: &dyn Platform, listening: bool) -> Option<String> {
    if !listening {
        return None;
    }
    let fix = most_recent_fix(platform, listening)?;
    let Some(geocoder) = platform.geocoder() else {
        debug!("reverse geocoder not present");
        return None;
    };
    match geocoder.country_code(fix.latitude, fix.longitude) {
        Ok(Some(code)) if !code.trim().is_empty() => Some(code),
        Ok(_) => None,
        Err(err) => {
            warn!(error = %err, "reverse geocoding failed");
            None
        }
    }
}

fn country_from_network(platform: &dyn Platform) -> Option<String> {
    let telephony = platform.telephony()?;
    match telephony.phone_type() {
        // ISO codes are unreliable on CDMA networks; skip the step entirely.
        Ok(PhoneType::Cdma) => return None,
        Ok(_) => {}
        Err(err) => {
            debug!(error = %err, "failed to read phone type");
            return None;
        }
    }
    match telephony.network_country_iso() {
        Ok(Some(iso)) if !iso.trim().is_empty() => Some(iso.to_ascii_uppercase()),
        Ok(_) => None,
        Err(err) => {
            debug!(error = %err, "failed to read network country iso");
            None
        }
    }
}

fn country_from_locale(platform: &dyn Platform) -> Option<String> {
    let country = platform.active_locale().country;
    if country.is_empty() {
        None
    } else {
        Some(country)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_platform::{
        MockGeocoder, MockLocationSources, MockPlatform, MockTelephony,
    };
    use chrono::{TimeZone, Utc};
    use dc_common::{Error, LocationFix};

    fn gps_fix() -> LocationFix {
        LocationFix {
            latitude: 48.85,
            longitude: 2.35,
            source: "gps".to_string(),
            timestamp: Utc.timestamp_opt(1000, 0).unwrap(),
        }
    }

    fn platform_with_all() -> MockPlatform {
        MockPlatform::builder()
            .location_sources(MockLocationSources::new().with_fix(gps_fix()))
            .geocoder(MockGeocoder::returning("FR"))
            .telephony(MockTelephony::new().network_country_iso("de"))
            .locale("en", "US")
            .build()
    }

    #[test]
    fn test_geocode_takes_precedence() {
        let platform = platform_with_all();
        assert_eq!(resolve_country(&platform, true), Some("FR".to_string()));
    }

    #[test]
    fn test_network_iso_uppercased_when_geocoder_absent() {
        let platform = MockPlatform::builder()
            .location_sources(MockLocationSources::new().with_fix(gps_fix()))
            .telephony(MockTelephony::new().network_country_iso("de"))
            .locale("en", "US")
            .build();
        assert_eq!(resolve_country(&platform, true), Some("DE".to_string()));
    }

    #[test]
    fn test_locale_when_location_and_network_absent() {
        let platform = MockPlatform::builder().locale("en", "US").build();
        assert_eq!(resolve_country(&platform, true), Some("US".to_string()));
    }

    #[test]
    fn test_all_steps_exhausted() {
        let platform = MockPlatform::builder().locale("en", "").build();
        assert_eq!(resolve_country(&platform, true), None);
    }

    #[test]
    fn test_cdma_skips_iso_entirely() {
        let telephony = MockTelephony::new()
            .phone_type(PhoneType::Cdma)
            .network_country_iso("kr");
        let platform = MockPlatform::builder()
            .telephony(telephony)
            .locale("ko", "KR")
            .build();
        assert_eq!(resolve_country(&platform, true), Some("KR".to_string()));
        assert_eq!(platform.network_iso_calls(), 0);
    }

    #[test]
    fn test_empty_iso_falls_through_to_locale() {
        let platform = MockPlatform::builder()
            .telephony(MockTelephony::new().network_country_iso(""))
            .locale("en", "GB")
            .build();
        assert_eq!(resolve_country(&platform, true), Some("GB".to_string()));
    }

    #[test]
    fn test_geocoder_error_falls_through() {
        let platform = MockPlatform::builder()
            .location_sources(MockLocationSources::new().with_fix(gps_fix()))
            .geocoder(MockGeocoder::failing(Error::MalformedInput(
                "bad coordinates".into(),
            )))
            .telephony(MockTelephony::new().network_country_iso("jp"))
            .build();
        assert_eq!(resolve_country(&platform, true), Some("JP".to_string()));
    }

    #[test]
    fn test_listening_disabled_skips_geocode_step() {
        let platform = platform_with_all();
        // Geocode would win, but the gate forces the network step.
        assert_eq!(resolve_country(&platform, false), Some("DE".to_string()));
        assert_eq!(platform.location_source_calls(), 0);
        assert_eq!(platform.geocoder_calls(), 0);
    }

    #[test]
    fn test_no_fix_skips_geocoder() {
        let platform = MockPlatform::builder()
            .location_sources(MockLocationSources::new())
            .geocoder(MockGeocoder::returning("FR"))
            .locale("en", "US")
            .build();
        assert_eq!(resolve_country(&platform, true), Some("US".to_string()));
        assert_eq!(platform.geocoder_calls(), 0);
    }
}
