//! Sensor status classification.
//!
//! A `ThresholdTable` holds the tier boundaries for each parameter kind and
//! is validated once when it is built. `classify` then maps a single value
//! to a `StatusTier` with no memory of earlier readings.
//!
//! Comparisons are strict throughout: a value sitting exactly on a boundary
//! resolves to the less severe tier.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{ParameterKind, Reading, RiskError, StatusTier};

// ---------------------------------------------------------------------------
// Threshold types
// ---------------------------------------------------------------------------

/// Tier boundaries for one parameter kind.
///
/// Deserialized from a flat table holding exactly one of the two bound
/// sets; a table mixing both, or with unknown keys, is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged, try_from = "RawKindThresholds")]
pub enum KindThresholds {
    /// Danger only above: `warning < critical`.
    Directional { warning: f64, critical: f64 },
    /// Danger on both sides of a safe band:
    /// `critical_low < warning_low < warning_high < critical_high`.
    Bidirectional {
        critical_low: f64,
        warning_low: f64,
        warning_high: f64,
        critical_high: f64,
    },
}

/// Config-file form of `KindThresholds`, before the shape is decided.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawKindThresholds {
    warning: Option<f64>,
    critical: Option<f64>,
    critical_low: Option<f64>,
    warning_low: Option<f64>,
    warning_high: Option<f64>,
    critical_high: Option<f64>,
}

impl TryFrom<RawKindThresholds> for KindThresholds {
    type Error = String;

    fn try_from(raw: RawKindThresholds) -> Result<Self, Self::Error> {
        match raw {
            RawKindThresholds {
                warning: Some(warning),
                critical: Some(critical),
                critical_low: None,
                warning_low: None,
                warning_high: None,
                critical_high: None,
            } => Ok(KindThresholds::Directional { warning, critical }),
            RawKindThresholds {
                warning: None,
                critical: None,
                critical_low: Some(critical_low),
                warning_low: Some(warning_low),
                warning_high: Some(warning_high),
                critical_high: Some(critical_high),
            } => Ok(KindThresholds::Bidirectional {
                critical_low,
                warning_low,
                warning_high,
                critical_high,
            }),
            _ => Err("expected exactly warning/critical or \
                 critical_low/warning_low/warning_high/critical_high"
                .to_string()),
        }
    }
}

impl KindThresholds {
    fn validate(&self, kind: ParameterKind) -> Result<(), RiskError> {
        let malformed = |reason: &str| RiskError::MalformedThresholdTable {
            kind,
            reason: reason.to_string(),
        };

        match *self {
            KindThresholds::Directional { warning, critical } => {
                if !(warning.is_finite() && critical.is_finite()) {
                    return Err(malformed("bounds must be finite"));
                }
                if warning >= critical {
                    return Err(malformed("warning must be strictly below critical"));
                }
                if kind.is_bidirectional() {
                    return Err(malformed("expected low and high bounds"));
                }
            }
            KindThresholds::Bidirectional {
                critical_low,
                warning_low,
                warning_high,
                critical_high,
            } => {
                let bounds = [critical_low, warning_low, warning_high, critical_high];
                if bounds.iter().any(|b| !b.is_finite()) {
                    return Err(malformed("bounds must be finite"));
                }
                if !bounds.windows(2).all(|w| w[0] < w[1]) {
                    return Err(malformed(
                        "expected critical_low < warning_low < warning_high < critical_high",
                    ));
                }
                if kind.is_directional() {
                    return Err(malformed("expected a single warning/critical pair"));
                }
            }
        }
        Ok(())
    }

    /// Classifies `value` against these bounds.
    pub fn classify(&self, value: f64) -> StatusTier {
        match *self {
            KindThresholds::Directional { warning, critical } => upper_tier(value, warning, critical),
            KindThresholds::Bidirectional {
                critical_low,
                warning_low,
                warning_high,
                critical_high,
            } => {
                let upper = upper_tier(value, warning_high, critical_high);
                let lower = if value < critical_low {
                    StatusTier::Critical
                } else if value < warning_low {
                    StatusTier::Warning
                } else {
                    StatusTier::Normal
                };
                upper.max(lower)
            }
        }
    }
}

fn upper_tier(value: f64, warning: f64, critical: f64) -> StatusTier {
    if value > critical {
        StatusTier::Critical
    } else if value > warning {
        StatusTier::Warning
    } else {
        StatusTier::Normal
    }
}

impl ParameterKind {
    /// Tide, wave and wind speed only escalate as the value rises.
    pub fn is_directional(&self) -> bool {
        matches!(
            self,
            ParameterKind::Tide | ParameterKind::Wave | ParameterKind::WindSpeed
        )
    }

    /// Temperature and pH escalate away from a safe band in either direction.
    pub fn is_bidirectional(&self) -> bool {
        matches!(self, ParameterKind::Temperature | ParameterKind::Ph)
    }
}

// ---------------------------------------------------------------------------
// Threshold table
// ---------------------------------------------------------------------------

/// Validated mapping from parameter kind to tier boundaries.
///
/// Built once at startup (from `Default` or a config file) and passed by
/// reference into every classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, KindThresholds>")]
#[serde(into = "BTreeMap<String, KindThresholds>")]
pub struct ThresholdTable {
    entries: BTreeMap<ParameterKind, KindThresholds>,
}

impl ThresholdTable {
    /// Builds a table, rejecting any entry whose bounds are not strictly
    /// ordered or whose shape does not match the kind's policy.
    pub fn new(
        entries: impl IntoIterator<Item = (ParameterKind, KindThresholds)>,
    ) -> Result<Self, RiskError> {
        let entries: BTreeMap<_, _> = entries.into_iter().collect();
        for (kind, thresholds) in &entries {
            thresholds.validate(*kind)?;
        }
        Ok(Self { entries })
    }

    pub fn get(&self, kind: ParameterKind) -> Option<&KindThresholds> {
        self.entries.get(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = ParameterKind> + '_ {
        self.entries.keys().copied()
    }

    /// Classifies a reading using its own parameter kind.
    pub fn classify_reading(&self, reading: &Reading) -> Result<StatusTier, RiskError> {
        classify(reading.value, reading.parameter, self)
    }
}

impl TryFrom<BTreeMap<String, KindThresholds>> for ThresholdTable {
    type Error = RiskError;

    /// Keys are parameter names as the sources spell them (`water_level`
    /// is accepted for `tide`).
    fn try_from(entries: BTreeMap<String, KindThresholds>) -> Result<Self, Self::Error> {
        let parsed = entries
            .into_iter()
            .map(|(name, thresholds)| Ok((name.parse::<ParameterKind>()?, thresholds)))
            .collect::<Result<Vec<_>, RiskError>>()?;
        ThresholdTable::new(parsed)
    }
}

impl From<ThresholdTable> for BTreeMap<String, KindThresholds> {
    fn from(table: ThresholdTable) -> Self {
        table
            .entries
            .into_iter()
            .map(|(kind, thresholds)| (kind.to_string(), thresholds))
            .collect()
    }
}

impl Default for ThresholdTable {
    /// Production thresholds for the monitored coastal stations.
    ///
    /// `Other` has no entry.
    fn default() -> Self {
        let entries = BTreeMap::from([
            (
                ParameterKind::Tide,
                KindThresholds::Directional { warning: 2.5, critical: 3.0 },
            ),
            (
                ParameterKind::Wave,
                KindThresholds::Directional { warning: 2.5, critical: 4.0 },
            ),
            (
                ParameterKind::WindSpeed,
                KindThresholds::Directional { warning: 15.0, critical: 25.0 },
            ),
            (
                ParameterKind::Temperature,
                KindThresholds::Bidirectional {
                    critical_low: 0.0,
                    warning_low: 5.0,
                    warning_high: 30.0,
                    critical_high: 35.0,
                },
            ),
            (
                ParameterKind::Ph,
                KindThresholds::Bidirectional {
                    critical_low: 6.0,
                    warning_low: 6.5,
                    warning_high: 8.5,
                    critical_high: 9.0,
                },
            ),
        ]);
        Self { entries }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Maps one value to a status tier for the given parameter kind.
///
/// Returns `InvalidParameterKind` if the table has no entry for `kind`;
/// an unknown kind is never treated as normal.
pub fn classify(
    value: f64,
    kind: ParameterKind,
    thresholds: &ThresholdTable,
) -> Result<StatusTier, RiskError> {
    thresholds
        .get(kind)
        .map(|t| t.classify(value))
        .ok_or_else(|| RiskError::InvalidParameterKind(kind.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn tide_table() -> ThresholdTable {
        ThresholdTable::new([(
            ParameterKind::Tide,
            KindThresholds::Directional { warning: 2.5, critical: 3.0 },
        )])
        .expect("valid tide table")
    }

    fn ph_table() -> ThresholdTable {
        ThresholdTable::new([(
            ParameterKind::Ph,
            KindThresholds::Bidirectional {
                critical_low: 6.0,
                warning_low: 6.5,
                warning_high: 8.5,
                critical_high: 9.0,
            },
        )])
        .expect("valid pH table")
    }

    // --- Directional --------------------------------------------------------

    #[test]
    fn test_tide_below_warning_is_normal() {
        assert_eq!(classify(1.8, ParameterKind::Tide, &tide_table()), Ok(StatusTier::Normal));
    }

    #[test]
    fn test_tide_exactly_at_warning_is_normal() {
        assert_eq!(classify(2.5, ParameterKind::Tide, &tide_table()), Ok(StatusTier::Normal));
    }

    #[test]
    fn test_tide_exactly_at_critical_is_warning() {
        // Boundary values resolve to the less severe tier.
        assert_eq!(classify(3.0, ParameterKind::Tide, &tide_table()), Ok(StatusTier::Warning));
    }

    #[test]
    fn test_tide_above_critical_is_critical() {
        assert_eq!(classify(3.01, ParameterKind::Tide, &tide_table()), Ok(StatusTier::Critical));
    }

    #[test]
    fn test_directional_never_escalates_downward() {
        assert_eq!(classify(-50.0, ParameterKind::Tide, &tide_table()), Ok(StatusTier::Normal));
    }

    #[test]
    fn test_default_wind_and_wave_bands() {
        let table = ThresholdTable::default();
        assert_eq!(classify(15.0, ParameterKind::WindSpeed, &table), Ok(StatusTier::Normal));
        assert_eq!(classify(20.0, ParameterKind::WindSpeed, &table), Ok(StatusTier::Warning));
        assert_eq!(classify(26.0, ParameterKind::WindSpeed, &table), Ok(StatusTier::Critical));
        assert_eq!(classify(3.5, ParameterKind::Wave, &table), Ok(StatusTier::Warning));
        assert_eq!(classify(4.5, ParameterKind::Wave, &table), Ok(StatusTier::Critical));
    }

    // --- Bidirectional ------------------------------------------------------

    #[test]
    fn test_ph_upper_branch_dominates() {
        assert_eq!(classify(9.5, ParameterKind::Ph, &ph_table()), Ok(StatusTier::Critical));
    }

    #[test]
    fn test_ph_bands_on_both_sides() {
        let table = ph_table();
        assert_eq!(classify(7.2, ParameterKind::Ph, &table), Ok(StatusTier::Normal));
        assert_eq!(classify(6.5, ParameterKind::Ph, &table), Ok(StatusTier::Normal));
        assert_eq!(classify(6.2, ParameterKind::Ph, &table), Ok(StatusTier::Warning));
        assert_eq!(classify(6.0, ParameterKind::Ph, &table), Ok(StatusTier::Warning));
        assert_eq!(classify(5.9, ParameterKind::Ph, &table), Ok(StatusTier::Critical));
        assert_eq!(classify(8.7, ParameterKind::Ph, &table), Ok(StatusTier::Warning));
        assert_eq!(classify(9.0, ParameterKind::Ph, &table), Ok(StatusTier::Warning));
    }

    #[test]
    fn test_bidirectional_is_symmetric_about_band_centre() {
        let table = ThresholdTable::new([(
            ParameterKind::Temperature,
            KindThresholds::Bidirectional {
                critical_low: 0.0,
                warning_low: 5.0,
                warning_high: 25.0,
                critical_high: 30.0,
            },
        )])
        .unwrap();
        let mid = 15.0;
        for d in [0.0, 4.0, 10.0, 12.5, 15.0, 20.0] {
            let above = classify(mid + d, ParameterKind::Temperature, &table).unwrap();
            let below = classify(mid - d, ParameterKind::Temperature, &table).unwrap();
            assert_eq!(above, below, "asymmetric tiers at distance {}", d);
        }
    }

    #[test]
    fn test_default_temperature_cold_water_is_critical() {
        let table = ThresholdTable::default();
        assert_eq!(classify(-1.0, ParameterKind::Temperature, &table), Ok(StatusTier::Critical));
        assert_eq!(classify(3.0, ParameterKind::Temperature, &table), Ok(StatusTier::Warning));
        assert_eq!(classify(24.5, ParameterKind::Temperature, &table), Ok(StatusTier::Normal));
    }

    // --- Errors -------------------------------------------------------------

    #[test]
    fn test_kind_missing_from_table_is_an_error() {
        let result = classify(1.0, ParameterKind::Other, &ThresholdTable::default());
        assert_eq!(result, Err(RiskError::InvalidParameterKind("other".to_string())));
    }

    #[test]
    fn test_inverted_directional_bounds_rejected() {
        let result = ThresholdTable::new([(
            ParameterKind::Wave,
            KindThresholds::Directional { warning: 4.0, critical: 2.5 },
        )]);
        assert!(matches!(
            result,
            Err(RiskError::MalformedThresholdTable { kind: ParameterKind::Wave, .. })
        ));
    }

    #[test]
    fn test_equal_bounds_rejected() {
        let result = ThresholdTable::new([(
            ParameterKind::Tide,
            KindThresholds::Directional { warning: 3.0, critical: 3.0 },
        )]);
        assert!(result.is_err(), "equal warning and critical must be rejected");
    }

    #[test]
    fn test_unordered_bidirectional_bounds_rejected() {
        let result = ThresholdTable::new([(
            ParameterKind::Ph,
            KindThresholds::Bidirectional {
                critical_low: 6.5,
                warning_low: 6.0,
                warning_high: 8.5,
                critical_high: 9.0,
            },
        )]);
        assert!(result.is_err());
    }

    #[test]
    fn test_shape_must_match_kind_policy() {
        let result = ThresholdTable::new([(
            ParameterKind::Ph,
            KindThresholds::Directional { warning: 8.5, critical: 9.0 },
        )]);
        assert!(result.is_err(), "pH needs low and high bounds");
    }

    #[test]
    fn test_non_finite_bound_rejected() {
        let result = ThresholdTable::new([(
            ParameterKind::Tide,
            KindThresholds::Directional { warning: 2.5, critical: f64::INFINITY },
        )]);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_table_passes_validation() {
        let default = ThresholdTable::default();
        let rebuilt = ThresholdTable::new(default.kinds().map(|k| (k, *default.get(k).unwrap())));
        assert_eq!(rebuilt, Ok(default));
    }
}
