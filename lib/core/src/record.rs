//! Property records: coordinates, neighborhood averages and user overrides.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate as sent by the client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[inline]
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Property specifications supplied by the caller. Each field is independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyOverrides {
    #[serde(default)]
    pub bedrooms: Option<f64>,
    #[serde(default)]
    pub bathrooms: Option<f64>,
    #[serde(default)]
    pub sqft: Option<f64>,
    #[serde(default)]
    pub lot_sqft: Option<f64>,
}

impl PropertyOverrides {
    pub fn is_empty(&self) -> bool {
        self.bedrooms.is_none()
            && self.bathrooms.is_none()
            && self.sqft.is_none()
            && self.lot_sqft.is_none()
    }
}

/// Typical property statistics for a postal prefix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeighborhoodRecord {
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub sqft: f64,
    pub lot_sqft: f64,
}

impl NeighborhoodRecord {
    /// Record used when a prefix has no row in the lookup table.
    pub const DEFAULT: NeighborhoodRecord = NeighborhoodRecord {
        bedrooms: 3.0,
        bathrooms: 2.0,
        sqft: 1500.0,
        lot_sqft: 0.0,
    };

    /// Overlay the caller's overrides. A present override always wins.
    pub fn with_overrides(self, overrides: &PropertyOverrides) -> Self {
        Self {
            bedrooms: overrides.bedrooms.unwrap_or(self.bedrooms),
            bathrooms: overrides.bathrooms.unwrap_or(self.bathrooms),
            sqft: overrides.sqft.unwrap_or(self.sqft),
            lot_sqft: overrides.lot_sqft.unwrap_or(self.lot_sqft),
        }
    }
}

impl Default for NeighborhoodRecord {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Where the base record of a [`ResolvedStats`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsSource {
    Lookup,
    Default,
}

/// The fully populated statistics fed into the feature vector.
///
/// Serializes as the plain four-field record (`specs_used` in responses).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedStats {
    #[serde(flatten)]
    pub record: NeighborhoodRecord,
    #[serde(skip)]
    pub source: StatsSource,
}

impl ResolvedStats {
    pub fn new(base: NeighborhoodRecord, source: StatsSource, overrides: &PropertyOverrides) -> Self {
        Self {
            record: base.with_overrides(overrides),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_override_only_changes_its_field() {
        let overrides = PropertyOverrides {
            bedrooms: Some(5.0),
            ..Default::default()
        };
        let record = NeighborhoodRecord::DEFAULT.with_overrides(&overrides);
        assert_eq!(
            record,
            NeighborhoodRecord {
                bedrooms: 5.0,
                bathrooms: 2.0,
                sqft: 1500.0,
                lot_sqft: 0.0,
            }
        );
    }

    #[test]
    fn test_override_wins_even_when_zero() {
        let base = NeighborhoodRecord {
            bedrooms: 2.0,
            bathrooms: 1.0,
            sqft: 900.0,
            lot_sqft: 250.0,
        };
        let overrides = PropertyOverrides {
            lot_sqft: Some(0.0),
            sqft: Some(1200.0),
            ..Default::default()
        };
        let record = base.with_overrides(&overrides);
        assert_eq!(record.lot_sqft, 0.0);
        assert_eq!(record.sqft, 1200.0);
        assert_eq!(record.bedrooms, 2.0);
        assert_eq!(record.bathrooms, 1.0);
    }

    #[test]
    fn test_overrides_deserialize_missing_fields_as_none() {
        let overrides: PropertyOverrides = serde_json::from_str(r#"{"sqft": 1800}"#).unwrap();
        assert_eq!(overrides.sqft, Some(1800.0));
        assert!(overrides.bedrooms.is_none());
        assert!(!overrides.is_empty());
        assert!(PropertyOverrides::default().is_empty());
    }

    #[test]
    fn test_resolved_stats_serializes_flat_record() {
        let stats = ResolvedStats::new(
            NeighborhoodRecord::DEFAULT,
            StatsSource::Default,
            &PropertyOverrides::default(),
        );
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "bedrooms": 3.0,
                "bathrooms": 2.0,
                "sqft": 1500.0,
                "lot_sqft": 0.0
            })
        );
    }
}
