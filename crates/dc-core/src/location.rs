//! Most-recent-location selection.
//!
//! Fixes are never cached: every call re-enumerates the enabled sources and
//! re-reads their last-known fixes. A source that fails to enumerate or to
//! answer is skipped, not fatal.

use tracing::{debug, warn};

use dc_common::LocationFix;

use crate::platform::Platform;

/// Select the most recent fix across all enabled location sources.
///
/// Returns `None` immediately, without touching any source, when listening
/// is disabled or the location permission is missing. Among the fixes that
/// could be fetched, the one with the strictly greatest timestamp wins; on
/// equal timestamps the first one seen is kept.
pub fn most_recent_fix(platform: &dyn Platform, listening: bool) -> Option<LocationFix> {
    if !listening {
        return None;
    }
    if !platform.has_location_permission() {
        debug!("location permission not granted");
        return None;
    }

    // A device without location services is a normal state.
    let sources = platform.location_sources()?;

    // The source registry can run out of process; a failed enumeration is
    // treated as an empty list.
    let names = match sources.enabled_sources() {
        Ok(names) => names,
        Err(err) => {
            warn!(error = %err, "failed to enumerate location sources");
            return None;
        }
    };

    let mut best: Option<LocationFix> = None;
    for name in names {
        let fix = match sources.last_known_fix(&name) {
            Ok(Some(fix)) => fix,
            Ok(None) => continue,
            Err(err) => {
                warn!(source = %name, error = %err, "failed to read last known fix");
                continue;
            }
        };
        match &best {
            Some(current) if fix.timestamp <= current.timestamp => {}
            _ => best = Some(fix),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_platform::{MockLocationSources, MockPlatform};
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn fix(source: &str, ts_secs: i64) -> LocationFix {
        LocationFix {
            latitude: 37.42,
            longitude: -122.08,
            source: source.to_string(),
            timestamp: Utc.timestamp_opt(ts_secs, 0).unwrap(),
        }
    }

    #[test]
    fn test_selects_greatest_timestamp() {
        let platform = MockPlatform::builder()
            .location_sources(
                MockLocationSources::new()
                    .with_fix(fix("network", 100))
                    .with_fix(fix("gps", 300))
                    .with_fix(fix("passive", 200)),
            )
            .build();
        let best = most_recent_fix(&platform, true).unwrap();
        assert_eq!(best.source, "gps");
        assert_eq!(best.timestamp, Utc.timestamp_opt(300, 0).unwrap());
    }

    #[test]
    fn test_tie_keeps_first_seen() {
        let platform = MockPlatform::builder()
            .location_sources(
                MockLocationSources::new()
                    .with_fix(fix("network", 300))
                    .with_fix(fix("gps", 300)),
            )
            .build();
        assert_eq!(most_recent_fix(&platform, true).unwrap().source, "network");
    }

    #[test]
    fn test_empty_fix_set_is_absent() {
        let platform = MockPlatform::builder()
            .location_sources(MockLocationSources::new())
            .build();
        assert_eq!(most_recent_fix(&platform, true), None);
    }

    #[test]
    fn test_listening_gate_short_circuits() {
        let sources = MockLocationSources::new().with_fix(fix("gps", 100));
        let platform = MockPlatform::builder().location_sources(sources).build();
        assert_eq!(most_recent_fix(&platform, false), None);
        assert_eq!(platform.location_source_calls(), 0);
    }

    #[test]
    fn test_permission_gate_short_circuits() {
        let platform = MockPlatform::builder()
            .location_sources(MockLocationSources::new().with_fix(fix("gps", 100)))
            .location_permission(false)
            .build();
        assert_eq!(most_recent_fix(&platform, true), None);
        assert_eq!(platform.location_source_calls(), 0);
    }

    #[test]
    fn test_no_location_service() {
        let platform = MockPlatform::builder().build();
        assert_eq!(most_recent_fix(&platform, true), None);
    }

    #[test]
    fn test_enumeration_failure_is_absent() {
        let platform = MockPlatform::builder()
            .location_sources(
                MockLocationSources::new()
                    .with_fix(fix("gps", 100))
                    .failing_enumeration(),
            )
            .build();
        assert_eq!(most_recent_fix(&platform, true), None);
    }

    #[test]
    fn test_failing_source_is_skipped() {
        let platform = MockPlatform::builder()
            .location_sources(
                MockLocationSources::new()
                    .with_failing_source("gps")
                    .with_fix(fix("network", 50)),
            )
            .build();
        assert_eq!(most_recent_fix(&platform, true).unwrap().source, "network");
    }

    proptest! {
        #[test]
        fn prop_selected_fix_has_max_timestamp(ts in proptest::collection::vec(0i64..1_000_000, 1..16)) {
            let mut sources = MockLocationSources::new();
            for (i, secs) in ts.iter().enumerate() {
                sources = sources.with_fix(fix(&format!("src-{i}"), *secs));
            }
            let platform = MockPlatform::builder().location_sources(sources).build();
            let best = most_recent_fix(&platform, true).unwrap();
            let max = ts.iter().copied().max().unwrap();
            prop_assert_eq!(best.timestamp, Utc.timestamp_opt(max, 0).unwrap());
        }
    }
}
