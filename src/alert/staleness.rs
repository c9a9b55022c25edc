/// Reading staleness detection.
///
/// Marine stations report every few minutes under normal conditions. A
/// sensor that has gone quiet still shows its last tier on the dashboard,
/// so callers use these checks to separate live sensors from silent ones.
///
/// # Clock injection
/// All `_at` functions accept a `now: DateTime<Utc>` parameter rather than
/// calling `Utc::now()` internally, keeping tests deterministic.

use chrono::{DateTime, Utc};

use crate::model::Sensor;

/// A sensor is considered active if it updated within this window.
pub const ACTIVE_WINDOW_MINUTES: u64 = 5;

// ---------------------------------------------------------------------------
// Staleness check
// ---------------------------------------------------------------------------

/// Returns `true` if `timestamp` is older than `max_age_minutes` relative
/// to `now`.
///
/// Staleness is strictly greater than the threshold:
///   age > max_age_minutes  →  stale
///   age == max_age_minutes →  not stale
///
/// Timestamps in the future are never stale.
pub fn is_stale_at(timestamp: DateTime<Utc>, max_age_minutes: u64, now: DateTime<Utc>) -> bool {
    let age_seconds = (now - timestamp).num_seconds();
    age_seconds > 0 && age_seconds as u64 > max_age_minutes.saturating_mul(60)
}

/// Convenience wrapper that uses the real current time.
pub fn is_stale(timestamp: DateTime<Utc>, max_age_minutes: u64) -> bool {
    is_stale_at(timestamp, max_age_minutes, Utc::now())
}

/// Whether the sensor reported within `ACTIVE_WINDOW_MINUTES` of `now`.
pub fn sensor_is_active_at(sensor: &Sensor, now: DateTime<Utc>) -> bool {
    !is_stale_at(sensor.last_updated, ACTIVE_WINDOW_MINUTES, now)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StationType;
    use chrono::{Duration, TimeZone};

    /// A fixed "now" used across all tests: 2024-05-01 13:00:00 UTC.
    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap()
    }

    fn sensor_updated_at(last_updated: DateTime<Utc>) -> Sensor {
        Sensor {
            id: "9447130".to_string(),
            name: "Seattle, WA".to_string(),
            station_type: StationType::TideGauge,
            readings: vec![],
            last_updated,
        }
    }

    // --- Not stale ----------------------------------------------------------

    #[test]
    fn test_reading_5_minutes_old_is_not_stale() {
        let ts = fixed_now() - Duration::minutes(5);
        assert!(!is_stale_at(ts, 15, fixed_now()));
    }

    #[test]
    fn test_reading_exactly_at_threshold_is_not_stale() {
        let ts = fixed_now() - Duration::minutes(15);
        assert!(
            !is_stale_at(ts, 15, fixed_now()),
            "staleness is strictly greater than, not >="
        );
    }

    #[test]
    fn test_future_timestamp_is_not_stale() {
        let ts = fixed_now() + Duration::hours(2);
        assert!(!is_stale_at(ts, 0, fixed_now()));
    }

    // --- Stale --------------------------------------------------------------

    #[test]
    fn test_one_second_past_threshold_is_stale() {
        let ts = fixed_now() - Duration::minutes(15) - Duration::seconds(1);
        assert!(is_stale_at(ts, 15, fixed_now()));
    }

    #[test]
    fn test_same_reading_stale_under_tight_threshold_not_under_loose() {
        let ts = fixed_now() - Duration::minutes(30);
        assert!(is_stale_at(ts, 20, fixed_now()));
        assert!(!is_stale_at(ts, 60, fixed_now()));
    }

    // --- Sensor activity ----------------------------------------------------

    #[test]
    fn test_recently_updated_sensor_is_active() {
        let sensor = sensor_updated_at(fixed_now() - Duration::minutes(2));
        assert!(sensor_is_active_at(&sensor, fixed_now()));
    }

    #[test]
    fn test_sensor_silent_for_an_hour_is_inactive() {
        let sensor = sensor_updated_at(fixed_now() - Duration::hours(1));
        assert!(!sensor_is_active_at(&sensor, fixed_now()));
    }
}
