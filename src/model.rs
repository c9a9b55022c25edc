/// Core data types for the coastal risk engine.
///
/// This module defines the shared domain model imported by all other modules:
/// readings, status tiers, alerts, predictions, sensors, the derived risk
/// assessment, and the engine's error type. Apart from small accessors and
/// name parsing it contains no logic and no I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Parameter kinds
// ---------------------------------------------------------------------------

/// The physical quantity a reading measures.
///
/// Determines which threshold policy the classifier applies: tide, wave and
/// wind speed only escalate upward; temperature and pH escalate on both
/// sides of a safe band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Tide / water level, in metres.
    #[serde(alias = "water_level")]
    Tide,
    /// Significant wave height, in metres.
    Wave,
    /// Water temperature, in °C.
    Temperature,
    /// Wind speed, in m/s.
    WindSpeed,
    /// Water pH.
    Ph,
    /// Anything a source reports that the engine has no policy for.
    Other,
}

impl ParameterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterKind::Tide => "tide",
            ParameterKind::Wave => "wave",
            ParameterKind::Temperature => "temperature",
            ParameterKind::WindSpeed => "wind_speed",
            ParameterKind::Ph => "ph",
            ParameterKind::Other => "other",
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterKind {
    type Err = RiskError;

    /// Parses the parameter names used by the marine data sources.
    /// `water_level` is the same policy as `tide`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tide" | "water_level" => Ok(ParameterKind::Tide),
            "wave" => Ok(ParameterKind::Wave),
            "temperature" => Ok(ParameterKind::Temperature),
            "wind_speed" => Ok(ParameterKind::WindSpeed),
            "ph" => Ok(ParameterKind::Ph),
            "other" => Ok(ParameterKind::Other),
            _ => Err(RiskError::InvalidParameterKind(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// A single measurement from a marine data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub unit: String,
    pub parameter: ParameterKind,
}

/// Status tier of a reading, in ascending order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTier {
    Normal,
    Warning,
    Critical,
}

impl fmt::Display for StatusTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusTier::Normal => write!(f, "normal"),
            StatusTier::Warning => write!(f, "warning"),
            StatusTier::Critical => write!(f, "critical"),
        }
    }
}

/// A reading together with the tier it was classified into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    #[serde(flatten)]
    pub reading: Reading,
    pub status: StatusTier,
}

// ---------------------------------------------------------------------------
// Stations and sensors
// ---------------------------------------------------------------------------

/// Kind of station a sensor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationType {
    TideGauge,
    WaveBuoy,
    WaterQuality,
    WeatherStation,
    Satellite,
}

impl StationType {
    /// The parameter a station of this type reports when a source does not
    /// say otherwise.
    pub fn default_parameter(&self) -> ParameterKind {
        match self {
            StationType::TideGauge => ParameterKind::Tide,
            StationType::WaveBuoy => ParameterKind::Wave,
            StationType::WaterQuality => ParameterKind::Ph,
            StationType::WeatherStation => ParameterKind::Temperature,
            StationType::Satellite => ParameterKind::Other,
        }
    }
}

impl fmt::Display for StationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationType::TideGauge => write!(f, "tide_gauge"),
            StationType::WaveBuoy => write!(f, "wave_buoy"),
            StationType::WaterQuality => write!(f, "water_quality"),
            StationType::WeatherStation => write!(f, "weather_station"),
            StationType::Satellite => write!(f, "satellite"),
        }
    }
}

/// Public data provider a station's readings come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Noaa,
    Ndbc,
    Usgs,
    Stormglass,
}

/// A sensor and its ordered readings. The last reading is the latest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: String,
    pub name: String,
    pub station_type: StationType,
    pub readings: Vec<SensorReading>,
    pub last_updated: DateTime<Utc>,
}

impl Sensor {
    /// Most recent reading, if the sensor has reported anything.
    pub fn latest(&self) -> Option<&SensorReading> {
        self.readings.last()
    }
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    /// High and critical alerts are the ones that drive the risk score.
    pub fn is_high(&self) -> bool {
        matches!(self, AlertSeverity::High | AlertSeverity::Critical)
    }
}

/// Alert lifecycle state. Alerts are created active and may move to
/// investigating or resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Investigating,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub severity: AlertSeverity,
    pub status: AlertStatus,
    #[serde(rename = "type")]
    pub alert_type: String,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Predictions
// ---------------------------------------------------------------------------

/// Risk level attached to a single forecast point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastRisk {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub confidence: f64,
    pub risk_level: ForecastRisk,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub forecast: Vec<ForecastPoint>,
}

impl Prediction {
    pub fn has_high_risk(&self) -> bool {
        self.forecast.iter().any(|f| f.risk_level == ForecastRisk::High)
    }
}

// ---------------------------------------------------------------------------
// Risk assessment
// ---------------------------------------------------------------------------

/// Overall risk level, in ascending order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Critical => write!(f, "critical"),
        }
    }
}

/// Result of aggregating one snapshot of alerts, sensors and predictions.
/// Recomputed on every evaluation; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub risk_score: u32,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised by classification and risk aggregation.
#[derive(Debug, Clone, PartialEq)]
pub enum RiskError {
    /// The parameter kind is unknown or has no entry in the threshold table.
    InvalidParameterKind(String),
    /// A threshold table violates the strict ordering of its bounds.
    MalformedThresholdTable { kind: ParameterKind, reason: String },
    /// An entity is present in an input sequence but lacks a required field.
    IncompleteEntity {
        entity: &'static str,
        id: String,
        field: &'static str,
    },
}

impl fmt::Display for RiskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskError::InvalidParameterKind(kind) => {
                write!(f, "Invalid parameter kind: {}", kind)
            }
            RiskError::MalformedThresholdTable { kind, reason } => {
                write!(f, "Malformed thresholds for {}: {}", kind, reason)
            }
            RiskError::IncompleteEntity { entity, id, field } => {
                write!(f, "Incomplete {} {}: missing {}", entity, id, field)
            }
        }
    }
}

impl std::error::Error for RiskError {}
