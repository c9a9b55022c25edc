/// Snapshot-level analysis for the coastal risk engine.
///
/// Submodules:
/// - `risk`       — composite risk scoring over alerts, sensors and predictions.
/// - `statistics` — dashboard counts and reading-series summaries.

pub mod risk;
pub mod statistics;

pub use risk::{assess_risk, assess_risk_with, RiskBreakpoints, RiskConfig, RiskWeights};
