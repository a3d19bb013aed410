//! Advertising identity resolution.
//!
//! Resolution branches on the hardware vendor, classified once from the
//! manufacturer field. Amazon devices expose the identifier and the opt-out
//! flag in the secure settings store; everything else goes through the
//! optional advertising-identifier service. Both paths degrade to the
//! default identity (no id, tracking not limited) on any failure.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use dc_common::AdvertisingIdentity;

use crate::capability::{service_names, CapabilityRegistry, Probe};
use crate::platform::{Platform, SecureSettings};

/// Manufacturer string that selects the settings-store path. Exact match.
pub const AMAZON_MANUFACTURER: &str = "Amazon";

/// Secure settings key for the advertising identifier.
pub const SETTING_ADVERTISING_ID: &str = "advertising_id";

/// Secure settings key for the opt-out flag (1 means limited).
pub const SETTING_LIMIT_AD_TRACKING: &str = "limit_ad_tracking";

/// Hardware vendor classification, derived once from the manufacturer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
    /// Amazon device: settings-store resolution, no service probe.
    Amazon,
    /// Any other vendor: resolution through the optional service.
    Other,
}

impl Vendor {
    pub fn classify(manufacturer: &str) -> Self {
        if manufacturer == AMAZON_MANUFACTURER {
            Vendor::Amazon
        } else {
            Vendor::Other
        }
    }
}

/// Resolve the advertising identifier and opt-out flag for the device.
pub fn resolve_advertising_identity(
    platform: &dyn Platform,
    vendor: Vendor,
) -> AdvertisingIdentity {
    match vendor {
        Vendor::Amazon => settings_identity(platform.secure_settings()),
        Vendor::Other => probed_identity(platform.capabilities()),
    }
}

/// Amazon path: direct settings reads. A missing key yields the default.
fn settings_identity(settings: &dyn SecureSettings) -> AdvertisingIdentity {
    AdvertisingIdentity {
        id: settings.string_value(SETTING_ADVERTISING_ID),
        limit_ad_tracking: settings.int_value(SETTING_LIMIT_AD_TRACKING).unwrap_or(0) == 1,
    }
}

#[derive(Debug, Deserialize)]
struct AdvertisingPayload {
    id: Option<String>,
    #[serde(default)]
    limit_ad_tracking: bool,
}

/// Generic path: probe the advertising-identifier service.
fn probed_identity(registry: &CapabilityRegistry) -> AdvertisingIdentity {
    match registry.invoke_optional(service_names::ADVERTISING_ID, &Value::Null) {
        Probe::Success(value) => match serde_json::from_value::<AdvertisingPayload>(value) {
            Ok(payload) => AdvertisingIdentity {
                id: payload.id,
                limit_ad_tracking: payload.limit_ad_tracking,
            },
            Err(err) => {
                warn!(error = %err, "malformed advertising identity payload");
                AdvertisingIdentity::default()
            }
        },
        // Absence and failure are already logged by the registry.
        Probe::NotFound | Probe::Failed(_) => AdvertisingIdentity::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_platform::{MockCapability, MockPlatform};
    use dc_common::Error;
    use serde_json::json;

    #[test]
    fn test_vendor_classify_exact_match() {
        assert_eq!(Vendor::classify("Amazon"), Vendor::Amazon);
        assert_eq!(Vendor::classify("amazon"), Vendor::Other);
        assert_eq!(Vendor::classify("Amazon Lab126"), Vendor::Other);
        assert_eq!(Vendor::classify("Google"), Vendor::Other);
    }

    #[test]
    fn test_amazon_path_reads_settings() {
        let platform = MockPlatform::builder()
            .manufacturer("Amazon")
            .setting_string(SETTING_ADVERTISING_ID, "fire-ad-id")
            .setting_int(SETTING_LIMIT_AD_TRACKING, 1)
            .build();
        let identity = resolve_advertising_identity(&platform, Vendor::Amazon);
        assert_eq!(identity.id.as_deref(), Some("fire-ad-id"));
        assert!(identity.limit_ad_tracking);
    }

    #[test]
    fn test_amazon_path_missing_settings() {
        let platform = MockPlatform::builder().manufacturer("Amazon").build();
        let identity = resolve_advertising_identity(&platform, Vendor::Amazon);
        assert_eq!(identity, AdvertisingIdentity::default());
    }

    #[test]
    fn test_amazon_path_never_probes() {
        let platform = MockPlatform::builder()
            .manufacturer("Amazon")
            .capability(
                service_names::ADVERTISING_ID,
                MockCapability::returning(json!({"id": "should-not-be-read"})),
            )
            .build();
        resolve_advertising_identity(&platform, Vendor::Amazon);
        assert_eq!(
            platform.capability_calls(service_names::ADVERTISING_ID),
            0
        );
    }

    #[test]
    fn test_probed_path_success() {
        let platform = MockPlatform::builder()
            .capability(
                service_names::ADVERTISING_ID,
                MockCapability::returning(json!({
                    "id": "gads-id-9",
                    "limit_ad_tracking": true,
                })),
            )
            .build();
        let identity = resolve_advertising_identity(&platform, Vendor::Other);
        assert_eq!(identity.id.as_deref(), Some("gads-id-9"));
        assert!(identity.limit_ad_tracking);
    }

    #[test]
    fn test_probed_path_service_absent() {
        let platform = MockPlatform::builder().build();
        let identity = resolve_advertising_identity(&platform, Vendor::Other);
        assert_eq!(identity, AdvertisingIdentity::default());
    }

    #[test]
    fn test_probed_path_service_failure() {
        let platform = MockPlatform::builder()
            .capability(
                service_names::ADVERTISING_ID,
                MockCapability::failing(Error::CapabilityInvocationFailed {
                    service: service_names::ADVERTISING_ID.into(),
                    reason: "remote exception".into(),
                }),
            )
            .build();
        let identity = resolve_advertising_identity(&platform, Vendor::Other);
        assert_eq!(identity, AdvertisingIdentity::default());
    }

    #[test]
    fn test_probed_path_malformed_payload() {
        let platform = MockPlatform::builder()
            .capability(
                service_names::ADVERTISING_ID,
                MockCapability::returning(json!([1, 2, 3])),
            )
            .build();
        let identity = resolve_advertising_identity(&platform, Vendor::Other);
        assert_eq!(identity, AdvertisingIdentity::default());
    }

    #[test]
    fn test_probed_path_flag_defaults_false() {
        let platform = MockPlatform::builder()
            .capability(
                service_names::ADVERTISING_ID,
                MockCapability::returning(json!({"id": "gads-id-9"})),
            )
            .build();
        let identity = resolve_advertising_identity(&platform, Vendor::Other);
        assert_eq!(identity.id.as_deref(), Some("gads-id-9"));
        assert!(!identity.limit_ad_tracking);
    }
}
