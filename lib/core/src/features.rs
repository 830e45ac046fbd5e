//! Feature vector assembly
//!
//! Projects a coordinate and its [`ResolvedStats`] onto the model's
//! [`FeatureSchema`]. Every known feature is a [`FeatureKey`] with exactly one
//! value source; a [`FeatureLayout`] compiled from the schema records which
//! slots each key fills. Slots no key claims stay at 0.

use crate::record::{Coordinate, ResolvedStats};
use crate::schema::FeatureSchema;
use serde::Serialize;

/// Crime count within 1 km. Not derived from data yet; every request uses it.
pub const CRIME_COUNT_PLACEHOLDER: f64 = 5.0;

/// One-hot value for the "House" property type, the only category served.
pub const PROPERTY_TYPE_HOUSE: f64 = 1.0;

/// The features this service knows how to populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKey {
    Latitude,
    Longitude,
    Bedrooms,
    Bathrooms,
    Sqft,
    LotSqft,
    CrimeCount1km,
    PropertyTypeHouse,
}

impl FeatureKey {
    pub const ALL: [FeatureKey; 8] = [
        FeatureKey::Latitude,
        FeatureKey::Longitude,
        FeatureKey::Bedrooms,
        FeatureKey::Bathrooms,
        FeatureKey::Sqft,
        FeatureKey::LotSqft,
        FeatureKey::CrimeCount1km,
        FeatureKey::PropertyTypeHouse,
    ];

    /// Column name used by the trained model
    pub const fn name(self) -> &'static str {
        match self {
            FeatureKey::Latitude => "latitude",
            FeatureKey::Longitude => "longitude",
            FeatureKey::Bedrooms => "bedrooms",
            FeatureKey::Bathrooms => "bathrooms",
            FeatureKey::Sqft => "sqft",
            FeatureKey::LotSqft => "lot_sqft",
            FeatureKey::CrimeCount1km => "crime_count_1km",
            FeatureKey::PropertyTypeHouse => "property_type_House",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }

    /// Value of this feature for one request
    pub fn value(self, coordinate: &Coordinate, stats: &ResolvedStats) -> f64 {
        match self {
            FeatureKey::Latitude => coordinate.latitude,
            FeatureKey::Longitude => coordinate.longitude,
            FeatureKey::Bedrooms => stats.record.bedrooms,
            FeatureKey::Bathrooms => stats.record.bathrooms,
            FeatureKey::Sqft => stats.record.sqft,
            FeatureKey::LotSqft => stats.record.lot_sqft,
            FeatureKey::CrimeCount1km => CRIME_COUNT_PLACEHOLDER,
            FeatureKey::PropertyTypeHouse => PROPERTY_TYPE_HOUSE,
        }
    }
}

/// Model input, ordered by schema position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    #[inline]
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.values
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self { values }
    }
}

/// Slot assignment compiled from a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureLayout {
    width: usize,
    slots: Vec<(usize, FeatureKey)>,
    unmapped: Vec<String>,
    missing: Vec<FeatureKey>,
}

impl FeatureLayout {
    pub fn compile(schema: &FeatureSchema) -> Self {
        let mut slots = Vec::new();
        let mut unmapped = Vec::new();

        for (index, column) in schema.iter().enumerate() {
            match FeatureKey::from_name(column) {
                Some(key) => slots.push((index, key)),
                None => unmapped.push(column.to_string()),
            }
        }

        let missing = FeatureKey::ALL
            .into_iter()
            .filter(|key| !slots.iter().any(|(_, k)| k == key))
            .collect();

        Self {
            width: schema.len(),
            slots,
            unmapped,
            missing,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Schema columns no feature key populates; always 0 at inference.
    pub fn unmapped_columns(&self) -> &[String] {
        &self.unmapped
    }

    /// Known feature keys the schema does not ask for.
    pub fn missing_keys(&self) -> &[FeatureKey] {
        &self.missing
    }

    /// Log the gaps between the schema and the known feature keys.
    pub fn report(&self) {
        for column in &self.unmapped {
            tracing::warn!(
                "Schema column '{}' has no feature source and will always be 0",
                column
            );
        }
        for key in &self.missing {
            tracing::warn!("Feature '{}' is not part of the model schema", key.name());
        }
        tracing::info!(
            "Feature layout: {} columns, {} mapped, {} unmapped",
            self.width,
            self.slots.len(),
            self.unmapped.len()
        );
    }

    pub fn build(&self, coordinate: &Coordinate, stats: &ResolvedStats) -> FeatureVector {
        let mut vector = FeatureVector::zeros(self.width);
        for &(index, key) in &self.slots {
            vector.values[index] = key.value(coordinate, stats);
        }
        vector
    }
}

/// Build the feature vector for `schema` in one step.
///
/// Compiles a throwaway layout; callers serving many requests should keep a
/// [`FeatureLayout`] instead.
pub fn build_vector(schema: &FeatureSchema, coordinate: &Coordinate, stats: &ResolvedStats) -> FeatureVector {
    FeatureLayout::compile(schema).build(coordinate, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{NeighborhoodRecord, PropertyOverrides, StatsSource};

    fn stats(bedrooms: f64, bathrooms: f64, sqft: f64, lot_sqft: f64) -> ResolvedStats {
        ResolvedStats::new(
            NeighborhoodRecord {
                bedrooms,
                bathrooms,
                sqft,
                lot_sqft,
            },
            StatsSource::Lookup,
            &PropertyOverrides::default(),
        )
    }

    #[test]
    fn test_full_schema_in_order() {
        let schema = FeatureSchema::new([
            "latitude",
            "longitude",
            "bedrooms",
            "bathrooms",
            "sqft",
            "lot_sqft",
            "crime_count_1km",
            "property_type_House",
        ])
        .unwrap();
        let vector = build_vector(
            &schema,
            &Coordinate::new(43.65, -79.38),
            &stats(4.0, 2.0, 1800.0, 0.0),
        );
        assert_eq!(
            vector.as_slice(),
            &[43.65, -79.38, 4.0, 2.0, 1800.0, 0.0, 5.0, 1.0]
        );
    }

    #[test]
    fn test_positions_follow_schema_not_key_order() {
        let schema = FeatureSchema::new(["sqft", "property_type_House", "latitude"]).unwrap();
        let vector = build_vector(
            &schema,
            &Coordinate::new(44.0, -79.46),
            &stats(3.0, 2.0, 1500.0, 0.0),
        );
        assert_eq!(vector.as_slice(), &[1500.0, 1.0, 44.0]);
    }

    #[test]
    fn test_unknown_columns_stay_zero() {
        let schema = FeatureSchema::new([
            "property_type_Condo",
            "bedrooms",
            "year_built",
            "Latitude",
        ])
        .unwrap();
        let layout = FeatureLayout::compile(&schema);
        for s in [stats(1.0, 1.0, 500.0, 0.0), stats(6.0, 4.0, 4200.0, 9000.0)] {
            let vector = layout.build(&Coordinate::new(-33.9, 151.2), &s);
            assert_eq!(vector.as_slice()[0], 0.0);
            assert_eq!(vector.as_slice()[1], s.record.bedrooms);
            assert_eq!(vector.as_slice()[2], 0.0);
            // names are case sensitive
            assert_eq!(vector.as_slice()[3], 0.0);
        }
        assert_eq!(
            layout.unmapped_columns(),
            &["property_type_Condo", "year_built", "Latitude"]
        );
    }

    #[test]
    fn test_width_always_matches_schema() {
        let stats = stats(3.0, 2.0, 1500.0, 0.0);
        let coordinate = Coordinate::new(43.0, -79.0);
        for width in 1..40 {
            let columns: Vec<String> = (0..width)
                .map(|i| match i % 3 {
                    0 => format!("col_{}", i),
                    1 => "sqft".to_string(),
                    _ => FeatureKey::ALL[i % FeatureKey::ALL.len()].name().to_string(),
                })
                .collect();
            let schema = FeatureSchema::new(columns).unwrap();
            assert_eq!(build_vector(&schema, &coordinate, &stats).len(), width);
        }
    }

    #[test]
    fn test_repeated_column_fills_every_slot() {
        let schema = FeatureSchema::new(["sqft", "bedrooms", "sqft"]).unwrap();
        let vector = build_vector(&schema, &Coordinate::new(0.0, 0.0), &stats(2.0, 1.0, 950.0, 0.0));
        assert_eq!(vector.as_slice(), &[950.0, 2.0, 950.0]);
    }

    #[test]
    fn test_missing_keys_reported() {
        let schema = FeatureSchema::new(["latitude", "longitude", "extra"]).unwrap();
        let layout = FeatureLayout::compile(&schema);
        assert_eq!(layout.width(), 3);
        assert_eq!(layout.missing_keys().len(), FeatureKey::ALL.len() - 2);
        assert!(!layout.missing_keys().contains(&FeatureKey::Latitude));
        assert!(layout.missing_keys().contains(&FeatureKey::CrimeCount1km));
    }

    #[test]
    fn test_key_names_roundtrip() {
        for key in FeatureKey::ALL {
            assert_eq!(FeatureKey::from_name(key.name()), Some(key));
        }
        assert_eq!(FeatureKey::from_name("crime_count"), None);
    }
}
