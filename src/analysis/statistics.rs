//! Dashboard statistics over sensor and alert snapshots.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::alert::staleness::sensor_is_active_at;
use crate::model::{Alert, AlertSeverity, AlertStatus, Reading, Sensor, StationType, StatusTier};

/// Relative change between the first and second half of a series below
/// which the trend is reported as stable.
pub const TREND_TOLERANCE: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorStatistics {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub by_type: BTreeMap<StationType, usize>,
    /// Keyed by the tier of each sensor's latest reading. Sensors with no
    /// readings are not counted here.
    pub by_status: BTreeMap<StatusTier, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertStatistics {
    pub total: usize,
    pub active: usize,
    pub resolved: usize,
    pub by_severity: BTreeMap<AlertSeverity, usize>,
    pub by_type: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingSummary {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub trend: Trend,
}

pub fn sensor_statistics(sensors: &[Sensor], now: DateTime<Utc>) -> SensorStatistics {
    let active = sensors.iter().filter(|s| sensor_is_active_at(s, now)).count();

    let mut by_type = BTreeMap::new();
    let mut by_status = BTreeMap::new();
    for sensor in sensors {
        *by_type.entry(sensor.station_type).or_insert(0) += 1;
        if let Some(latest) = sensor.latest() {
            *by_status.entry(latest.status).or_insert(0) += 1;
        }
    }

    SensorStatistics {
        total: sensors.len(),
        active,
        inactive: sensors.len() - active,
        by_type,
        by_status,
    }
}

pub fn alert_statistics(alerts: &[Alert]) -> AlertStatistics {
    let mut by_severity = BTreeMap::new();
    let mut by_type = BTreeMap::new();
    for alert in alerts {
        *by_severity.entry(alert.severity).or_insert(0) += 1;
        *by_type.entry(alert.alert_type.clone()).or_insert(0) += 1;
    }

    AlertStatistics {
        total: alerts.len(),
        active: alerts.iter().filter(|a| a.status == AlertStatus::Active).count(),
        resolved: alerts.iter().filter(|a| a.status == AlertStatus::Resolved).count(),
        by_severity,
        by_type,
    }
}

/// Min, max, mean and direction of a reading series, in the given order.
///
/// The trend compares the mean of the later half against the earlier half.
/// Returns `None` for an empty series.
pub fn summarize_readings(readings: &[Reading]) -> Option<ReadingSummary> {
    if readings.is_empty() {
        return None;
    }

    let values: Vec<f64> = readings.iter().map(|r| r.value).collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let average = mean(&values);

    Some(ReadingSummary {
        min,
        max,
        average,
        trend: trend(&values),
    })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn trend(values: &[f64]) -> Trend {
    if values.len() < 2 {
        return Trend::Stable;
    }
    let (earlier, later) = values.split_at(values.len() / 2);
    let before = mean(earlier);
    let after = mean(later);

    // Relative to the earlier mean; an all-zero start falls back to absolute.
    let scale = before.abs().max(f64::EPSILON);
    let change = (after - before) / scale;
    if change > TREND_TOLERANCE {
        Trend::Increasing
    } else if change < -TREND_TOLERANCE {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}
