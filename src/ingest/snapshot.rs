/// Snapshot ingest
///
/// Parses the JSON snapshots handed over by the data-fetching layer (alerts,
/// sensors with their readings, predictions) and converts them into the
/// strongly typed model the engine works on.
///
/// Wire records keep every field optional so a missing field can be
/// reported by name instead of as a generic parse failure. Conversion is
/// all-or-nothing: one incomplete entity rejects the whole snapshot.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

use crate::alert::ThresholdTable;
use crate::analysis::risk::{assess_risk_with, RiskConfig};
use crate::logging::{self, Component};
use crate::model::{
    Alert, AlertSeverity, AlertStatus, ForecastPoint, ForecastRisk, ParameterKind, Prediction,
    Reading, RiskAssessment, RiskError, Sensor, SensorReading, StationType, StatusTier,
};

// ============================================================================
// Wire records
// ============================================================================

/// Top-level snapshot document. Absent sequences are empty.
#[derive(Debug, Default, Deserialize)]
pub struct SnapshotRecord {
    #[serde(default)]
    pub alerts: Vec<AlertRecord>,
    #[serde(default)]
    pub sensors: Vec<SensorRecord>,
    #[serde(default)]
    pub predictions: Vec<PredictionRecord>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AlertRecord {
    pub id: Option<String>,
    pub severity: Option<AlertSeverity>,
    pub status: Option<AlertStatus>,
    #[serde(rename = "type")]
    pub alert_type: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SensorRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub station_type: Option<StationType>,
    /// Parameter reported by every reading of this sensor, unless a reading
    /// names its own. Kept as text so an unknown name is rejected as an
    /// invalid parameter kind rather than a parse failure.
    pub parameter: Option<String>,
    pub readings: Option<Vec<ReadingRecord>>,
    #[serde(rename = "lastUpdated", alias = "last_updated")]
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReadingRecord {
    pub timestamp: Option<DateTime<Utc>>,
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: String,
    pub parameter: Option<String>,
    pub status: Option<StatusTier>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PredictionRecord {
    pub id: Option<String>,
    pub forecast: Option<Vec<ForecastRecord>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ForecastRecord {
    pub timestamp: Option<DateTime<Utc>>,
    pub value: Option<f64>,
    pub confidence: Option<f64>,
    pub risk_level: Option<ForecastRisk>,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, PartialEq)]
pub enum SnapshotError {
    /// The document is not valid JSON or a field has the wrong type or an
    /// unknown enum value.
    Parse(String),
    /// The document parsed but an entity could not be converted.
    Rejected(RiskError),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Parse(msg) => write!(f, "Snapshot parse error: {}", msg),
            SnapshotError::Rejected(err) => write!(f, "Snapshot rejected: {}", err),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Rejected(err) => Some(err),
            SnapshotError::Parse(_) => None,
        }
    }
}

impl From<RiskError> for SnapshotError {
    fn from(err: RiskError) -> Self {
        SnapshotError::Rejected(err)
    }
}

// ============================================================================
// Converted snapshot
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub alerts: Vec<Alert>,
    pub sensors: Vec<Sensor>,
    pub predictions: Vec<Prediction>,
}

impl Snapshot {
    pub fn assess(&self, config: &RiskConfig) -> Result<RiskAssessment, RiskError> {
        assess_risk_with(&self.alerts, &self.sensors, &self.predictions, config)
    }
}

/// Parses and converts a snapshot document.
///
/// Readings that arrive without a status are classified against
/// `thresholds`.
pub fn parse_snapshot(json: &str, thresholds: &ThresholdTable) -> Result<Snapshot, SnapshotError> {
    let record: SnapshotRecord =
        serde_json::from_str(json).map_err(|e| SnapshotError::Parse(e.to_string()))?;
    convert_snapshot(record, thresholds).map_err(|err| {
        logging::log_rejection(Component::Ingest, &err);
        SnapshotError::Rejected(err)
    })
}

pub fn convert_snapshot(
    record: SnapshotRecord,
    thresholds: &ThresholdTable,
) -> Result<Snapshot, RiskError> {
    let alerts = record
        .alerts
        .into_iter()
        .enumerate()
        .map(|(i, a)| convert_alert(a, i))
        .collect::<Result<Vec<_>, _>>()?;
    let sensors = record
        .sensors
        .into_iter()
        .enumerate()
        .map(|(i, s)| convert_sensor(s, i, thresholds))
        .collect::<Result<Vec<_>, _>>()?;
    let predictions = record
        .predictions
        .into_iter()
        .enumerate()
        .map(|(i, p)| convert_prediction(p, i))
        .collect::<Result<Vec<_>, _>>()?;

    logging::debug(
        Component::Ingest,
        None,
        &format!(
            "Snapshot: {} alerts, {} sensors, {} predictions",
            alerts.len(),
            sensors.len(),
            predictions.len()
        ),
    );

    Ok(Snapshot {
        alerts,
        sensors,
        predictions,
    })
}

// ============================================================================
// Per-entity conversion
// ============================================================================

/// Entities without an id are identified by their position in the input.
fn entity_id(id: &Option<String>, index: usize) -> String {
    id.clone().unwrap_or_else(|| format!("#{}", index))
}

fn require<T>(value: Option<T>, entity: &'static str, id: &str, field: &'static str) -> Result<T, RiskError> {
    value.ok_or_else(|| RiskError::IncompleteEntity {
        entity,
        id: id.to_string(),
        field,
    })
}

pub fn convert_alert(record: AlertRecord, index: usize) -> Result<Alert, RiskError> {
    let id = entity_id(&record.id, index);
    Ok(Alert {
        severity: require(record.severity, "alert", &id, "severity")?,
        status: require(record.status, "alert", &id, "status")?,
        alert_type: require(record.alert_type, "alert", &id, "type")?,
        timestamp: require(record.timestamp, "alert", &id, "timestamp")?,
        id: require(record.id, "alert", &id, "id")?,
    })
}

pub fn convert_sensor(
    record: SensorRecord,
    index: usize,
    thresholds: &ThresholdTable,
) -> Result<Sensor, RiskError> {
    let id = entity_id(&record.id, index);
    let station_type = require(record.station_type, "sensor", &id, "type")?;
    let sensor_parameter = match record.parameter {
        Some(name) => name.parse::<ParameterKind>()?,
        None => station_type.default_parameter(),
    };

    let readings = require(record.readings, "sensor", &id, "readings")?
        .into_iter()
        .map(|r| convert_reading(r, &id, sensor_parameter, thresholds))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Sensor {
        name: require(record.name, "sensor", &id, "name")?,
        last_updated: require(record.last_updated, "sensor", &id, "lastUpdated")?,
        id: require(record.id, "sensor", &id, "id")?,
        station_type,
        readings,
    })
}

fn convert_reading(
    record: ReadingRecord,
    sensor_id: &str,
    sensor_parameter: ParameterKind,
    thresholds: &ThresholdTable,
) -> Result<SensorReading, RiskError> {
    let parameter = match record.parameter {
        Some(name) => name.parse::<ParameterKind>()?,
        None => sensor_parameter,
    };
    let reading = Reading {
        timestamp: require(record.timestamp, "sensor", sensor_id, "readings.timestamp")?,
        value: require(record.value, "sensor", sensor_id, "readings.value")?,
        unit: record.unit,
        parameter,
    };

    let status = match record.status {
        Some(status) => status,
        None => {
            let status = thresholds.classify_reading(&reading)?;
            logging::debug(
                Component::Classifier,
                Some(sensor_id),
                &format!("{} {} {} -> {}", reading.parameter, reading.value, reading.unit, status),
            );
            status
        }
    };

    Ok(SensorReading { reading, status })
}

pub fn convert_prediction(record: PredictionRecord, index: usize) -> Result<Prediction, RiskError> {
    let id = entity_id(&record.id, index);
    let forecast = require(record.forecast, "prediction", &id, "forecast")?
        .into_iter()
        .map(|f| {
            Ok(ForecastPoint {
                timestamp: require(f.timestamp, "prediction", &id, "forecast.timestamp")?,
                value: require(f.value, "prediction", &id, "forecast.value")?,
                confidence: require(f.confidence, "prediction", &id, "forecast.confidence")?,
                risk_level: require(f.risk_level, "prediction", &id, "forecast.risk_level")?,
            })
        })
        .collect::<Result<Vec<_>, RiskError>>()?;

    Ok(Prediction {
        id: require(record.id, "prediction", &id, "id")?,
        forecast,
    })
}

// ============================================================================
// Tests
// ============================================================================
