//! Per-reading alerting: status tiers and staleness.
//!
//! Submodules:
//! - `thresholds` — threshold tables and the status classifier.
//! - `staleness`  — detects sensors that have stopped reporting.

pub mod staleness;
pub mod thresholds;

pub use thresholds::{classify, KindThresholds, ThresholdTable};
