//! Input side of the engine.
//!
//! Fetching from NOAA / NDBC / USGS and the alert backend happens elsewhere;
//! this module only turns the snapshots those collaborators produce into
//! the typed model.

pub mod snapshot;

pub use snapshot::{parse_snapshot, Snapshot, SnapshotError};
