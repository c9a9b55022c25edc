//! Composite risk assessment.
//!
//! Folds one snapshot of alerts, sensors and predictions into a single
//! `RiskAssessment` by additive point scoring. The steps run in a fixed
//! order so `risk_factors` is deterministic:
//!
//! 1. active alerts with high or critical severity
//! 2. sensors whose latest reading is at `warning`
//! 3. predictions with at least one high-risk forecast point
//!
//! Sensors at `critical` are not counted by step 2. That matches the scoring
//! the dashboard has always shown and is kept as-is until the weighting is
//! revisited.

use serde::{Deserialize, Serialize};

use crate::logging::{self, Component};
use crate::model::{Alert, AlertStatus, Prediction, RiskAssessment, RiskError, RiskLevel, Sensor, StatusTier};

// ---------------------------------------------------------------------------
// Scoring configuration
// ---------------------------------------------------------------------------

/// Points added per counted entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RiskWeights {
    pub high_severity_alert: u32,
    pub warning_sensor: u32,
    pub high_risk_prediction: u32,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            high_severity_alert: 25,
            warning_sensor: 15,
            high_risk_prediction: 20,
        }
    }
}

/// Minimum scores for each risk level above `low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RiskBreakpoints {
    pub medium: u32,
    pub high: u32,
    pub critical: u32,
}

impl Default for RiskBreakpoints {
    fn default() -> Self {
        Self {
            medium: 30,
            high: 60,
            critical: 80,
        }
    }
}

impl RiskBreakpoints {
    /// Maps a score to a level, checking the highest breakpoint first.
    pub fn level(&self, score: u32) -> RiskLevel {
        if score >= self.critical {
            RiskLevel::Critical
        } else if score >= self.high {
            RiskLevel::High
        } else if score >= self.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Everything the aggregator needs besides the snapshot itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RiskConfig {
    pub weights: RiskWeights,
    pub breakpoints: RiskBreakpoints,
    /// Standing guidance attached to every assessment.
    pub recommendations: Vec<String>,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            weights: RiskWeights::default(),
            breakpoints: RiskBreakpoints::default(),
            recommendations: vec![
                "Monitor all active alerts closely".to_string(),
                "Review sensor readings for anomalies".to_string(),
                "Prepare emergency response protocols".to_string(),
                "Communicate with affected communities".to_string(),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Assesses risk with the default weights and breakpoints.
pub fn assess_risk(
    alerts: &[Alert],
    sensors: &[Sensor],
    predictions: &[Prediction],
) -> Result<RiskAssessment, RiskError> {
    assess_risk_with(alerts, sensors, predictions, &RiskConfig::default())
}

/// Assesses risk for one snapshot.
///
/// Empty sequences contribute nothing. A sensor with no readings has no
/// latest tier and rejects the whole call; no partial assessment is ever
/// returned.
pub fn assess_risk_with(
    alerts: &[Alert],
    sensors: &[Sensor],
    predictions: &[Prediction],
    config: &RiskConfig,
) -> Result<RiskAssessment, RiskError> {
    let mut warning_sensors = 0usize;
    for sensor in sensors {
        let latest = sensor.latest().ok_or_else(|| {
            let err = RiskError::IncompleteEntity {
                entity: "sensor",
                id: sensor.id.clone(),
                field: "readings",
            };
            logging::log_rejection(Component::Aggregator, &err);
            err
        })?;
        if latest.status == StatusTier::Warning {
            warning_sensors += 1;
        }
    }

    let high_severity_alerts = alerts
        .iter()
        .filter(|a| a.status == AlertStatus::Active && a.severity.is_high())
        .count();
    let high_risk_predictions = predictions.iter().filter(|p| p.has_high_risk()).count();

    let weights = &config.weights;
    let mut score = 0u32;
    let mut factors = Vec::new();

    if high_severity_alerts > 0 {
        score = score.saturating_add(points(high_severity_alerts, weights.high_severity_alert));
        factors.push(format!("{} high-severity alerts active", high_severity_alerts));
    }
    if warning_sensors > 0 {
        score = score.saturating_add(points(warning_sensors, weights.warning_sensor));
        factors.push(format!("{} sensors showing warnings", warning_sensors));
    }
    if high_risk_predictions > 0 {
        score = score.saturating_add(points(high_risk_predictions, weights.high_risk_prediction));
        factors.push(format!("{} high-risk predictions", high_risk_predictions));
    }

    let level = config.breakpoints.level(score);
    logging::debug(
        Component::Aggregator,
        None,
        &format!(
            "{} alerts, {} sensors, {} predictions -> score {} ({})",
            alerts.len(),
            sensors.len(),
            predictions.len(),
            score,
            level
        ),
    );

    Ok(RiskAssessment {
        risk_score: score,
        risk_level: level,
        risk_factors: factors,
        recommendations: config.recommendations.clone(),
    })
}

fn points(count: usize, weight: u32) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX).saturating_mul(weight)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AlertSeverity, ForecastPoint, ForecastRisk, ParameterKind, Reading, SensorReading,
        StationType,
    };
    use chrono::{DateTime, TimeZone, Utc};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap()
    }

    fn alert(id: &str, severity: AlertSeverity, status: AlertStatus) -> Alert {
        Alert {
            id: id.to_string(),
            severity,
            status,
            alert_type: "storm_surge".to_string(),
            timestamp: fixed_now(),
        }
    }

    fn sensor(id: &str, tiers: &[StatusTier]) -> Sensor {
        Sensor {
            id: id.to_string(),
            name: format!("Sensor {}", id),
            station_type: StationType::WaveBuoy,
            readings: tiers
                .iter()
                .map(|&status| SensorReading {
                    reading: Reading {
                        timestamp: fixed_now(),
                        value: 1.8,
                        unit: "m".to_string(),
                        parameter: ParameterKind::Wave,
                    },
                    status,
                })
                .collect(),
            last_updated: fixed_now(),
        }
    }

    fn prediction(id: &str, risks: &[ForecastRisk]) -> Prediction {
        Prediction {
            id: id.to_string(),
            forecast: risks
                .iter()
                .map(|&risk_level| ForecastPoint {
                    timestamp: fixed_now(),
                    value: 2.8,
                    confidence: 0.8,
                    risk_level,
                })
                .collect(),
        }
    }

    #[test]
    fn test_empty_snapshot_is_low_risk() {
        let result = assess_risk(&[], &[], &[]).unwrap();
        assert_eq!(result.risk_score, 0);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert!(result.risk_factors.is_empty());
    }

    #[test]
    fn test_alerts_and_warning_sensor_scenario() {
        let alerts = [
            alert("a1", AlertSeverity::High, AlertStatus::Active),
            alert("a2", AlertSeverity::High, AlertStatus::Active),
        ];
        let sensors = [sensor("s1", &[StatusTier::Normal, StatusTier::Warning])];
        let result = assess_risk(&alerts, &sensors, &[]).unwrap();
        assert_eq!(result.risk_score, 65);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(
            result.risk_factors,
            vec!["2 high-severity alerts active", "1 sensors showing warnings"]
        );
    }

    #[test]
    fn test_three_high_risk_predictions_scenario() {
        let predictions = [
            prediction("p1", &[ForecastRisk::Medium, ForecastRisk::High]),
            prediction("p2", &[ForecastRisk::High]),
            prediction("p3", &[ForecastRisk::Low, ForecastRisk::High, ForecastRisk::Medium]),
        ];
        let result = assess_risk(&[], &[], &predictions).unwrap();
        assert_eq!(result.risk_score, 60);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.risk_factors, vec!["3 high-risk predictions"]);
    }

    #[test]
    fn test_inactive_and_low_severity_alerts_do_not_count() {
        let alerts = [
            alert("a1", AlertSeverity::Critical, AlertStatus::Resolved),
            alert("a2", AlertSeverity::High, AlertStatus::Investigating),
            alert("a3", AlertSeverity::Medium, AlertStatus::Active),
        ];
        let result = assess_risk(&alerts, &[], &[]).unwrap();
        assert_eq!(result.risk_score, 0);
        assert!(result.risk_factors.is_empty(), "zero-count steps add no factor");
    }

    #[test]
    fn test_only_latest_reading_tier_counts() {
        let sensors = [sensor("s1", &[StatusTier::Warning, StatusTier::Normal])];
        let result = assess_risk(&[], &sensors, &[]).unwrap();
        assert_eq!(result.risk_score, 0);
    }

    #[test]
    fn test_critical_sensor_adds_nothing() {
        let sensors = [sensor("s1", &[StatusTier::Critical])];
        let result = assess_risk(&[], &sensors, &[]).unwrap();
        assert_eq!(result.risk_score, 0);
        assert_eq!(result.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_sensor_without_readings_rejects_the_call() {
        let sensors = [sensor("s1", &[StatusTier::Warning]), sensor("s2", &[])];
        let result = assess_risk(&[], &sensors, &[]);
        assert_eq!(
            result,
            Err(RiskError::IncompleteEntity {
                entity: "sensor",
                id: "s2".to_string(),
                field: "readings",
            })
        );
    }

    #[test]
    fn test_score_is_independent_of_input_order() {
        let mut alerts = vec![
            alert("a1", AlertSeverity::High, AlertStatus::Active),
            alert("a2", AlertSeverity::Low, AlertStatus::Active),
            alert("a3", AlertSeverity::Critical, AlertStatus::Active),
        ];
        let mut sensors = vec![
            sensor("s1", &[StatusTier::Warning]),
            sensor("s2", &[StatusTier::Normal]),
        ];
        let mut predictions = vec![
            prediction("p1", &[ForecastRisk::High]),
            prediction("p2", &[ForecastRisk::Low]),
        ];
        let forward = assess_risk(&alerts, &sensors, &predictions).unwrap();
        alerts.reverse();
        sensors.reverse();
        predictions.reverse();
        let reversed = assess_risk(&alerts, &sensors, &predictions).unwrap();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_adding_high_alert_never_lowers_risk() {
        let mut alerts = Vec::new();
        let sensors = [sensor("s1", &[StatusTier::Warning])];
        let mut previous = assess_risk(&alerts, &sensors, &[]).unwrap();
        for i in 0..6 {
            alerts.push(alert(&format!("a{}", i), AlertSeverity::High, AlertStatus::Active));
            let next = assess_risk(&alerts, &sensors, &[]).unwrap();
            assert!(next.risk_score >= previous.risk_score);
            assert!(next.risk_level >= previous.risk_level);
            previous = next;
        }
        assert_eq!(previous.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn test_breakpoints_are_inclusive() {
        let breakpoints = RiskBreakpoints::default();
        assert_eq!(breakpoints.level(29), RiskLevel::Low);
        assert_eq!(breakpoints.level(30), RiskLevel::Medium);
        assert_eq!(breakpoints.level(59), RiskLevel::Medium);
        assert_eq!(breakpoints.level(60), RiskLevel::High);
        assert_eq!(breakpoints.level(80), RiskLevel::Critical);
        assert_eq!(breakpoints.level(500), RiskLevel::Critical);
    }

    #[test]
    fn test_custom_weights_apply() {
        let config = RiskConfig {
            weights: RiskWeights {
                high_severity_alert: 40,
                warning_sensor: 0,
                high_risk_prediction: 0,
            },
            ..RiskConfig::default()
        };
        let alerts = [alert("a1", AlertSeverity::High, AlertStatus::Active)];
        let result = assess_risk_with(&alerts, &[], &[], &config).unwrap();
        assert_eq!(result.risk_score, 40);
        assert_eq!(result.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_recommendations_come_from_config() {
        let result = assess_risk(&[], &[], &[]).unwrap();
        assert_eq!(result.recommendations.len(), 4);
        assert_eq!(result.recommendations[0], "Monitor all active alerts closely");
    }
}
