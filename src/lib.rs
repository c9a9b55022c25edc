//! Coastal hazard risk engine.
//!
//! Classifies marine sensor readings into normal / warning / critical tiers
//! and folds alerts, sensor tiers and forecast risk levels into a single
//! risk assessment for the dashboard.
//!
//! ```
//! use coastal_risk::alert::{classify, ThresholdTable};
//! use coastal_risk::model::{ParameterKind, StatusTier};
//!
//! let table = ThresholdTable::default();
//! assert_eq!(classify(9.5, ParameterKind::Ph, &table), Ok(StatusTier::Critical));
//! ```

pub mod alert;
pub mod analysis;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod stations;

pub use alert::{classify, ThresholdTable};
pub use analysis::{assess_risk, assess_risk_with, RiskConfig};
pub use config::EngineConfig;
pub use model::{RiskAssessment, RiskError, StatusTier};
