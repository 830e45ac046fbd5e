//! Neighborhood lookup table
//!
//! Maps a postal prefix (FSA) to the typical property statistics of that
//! area. The table is loaded once from a CSV file and never mutated.

use crate::error::{ArtifactError, Result};
use crate::record::{NeighborhoodRecord, PropertyOverrides, ResolvedStats, StatsSource};
use ahash::AHashMap;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Name of the index column in the averages file.
pub const PREFIX_COLUMN: &str = "FSA";

#[derive(Debug, Deserialize)]
struct LookupRow {
    #[serde(rename = "FSA")]
    prefix: String,
    #[serde(default)]
    bedrooms: Option<f64>,
    #[serde(default)]
    bathrooms: Option<f64>,
    #[serde(default)]
    sqft: Option<f64>,
    #[serde(default)]
    lot_sqft: Option<f64>,
}

impl LookupRow {
    /// Absent columns and empty cells count as 0.
    fn into_record(self, line: usize) -> (String, NeighborhoodRecord) {
        let fields = [
            ("bedrooms", self.bedrooms),
            ("bathrooms", self.bathrooms),
            ("sqft", self.sqft),
            ("lot_sqft", self.lot_sqft),
        ];
        for (name, value) in fields {
            if value.is_none() {
                tracing::warn!(
                    "Neighborhood '{}' on line {} has no {}; using 0",
                    self.prefix,
                    line,
                    name
                );
            }
        }

        let record = NeighborhoodRecord {
            bedrooms: self.bedrooms.unwrap_or(0.0),
            bathrooms: self.bathrooms.unwrap_or(0.0),
            sqft: self.sqft.unwrap_or(0.0),
            lot_sqft: self.lot_sqft.unwrap_or(0.0),
        };
        (self.prefix, record)
    }
}

/// Read-only mapping from postal prefix to [`NeighborhoodRecord`].
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    rows: AHashMap<String, NeighborhoodRecord>,
}

impl LookupTable {
    /// Build a table from `(prefix, record)` pairs. Prefixes are normalized
    /// the same way as CSV keys; later duplicates replace earlier ones.
    pub fn from_records<I, S>(records: I) -> Self
    where
        I: IntoIterator<Item = (S, NeighborhoodRecord)>,
        S: AsRef<str>,
    {
        let rows = records
            .into_iter()
            .map(|(prefix, record)| (normalize_prefix(prefix.as_ref()), record))
            .collect();
        Self { rows }
    }

    /// Load the table from a CSV file with an `FSA` column.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ArtifactError::io(path, e))?;
        let table = Self::from_reader(file)?;
        tracing::debug!("Loaded {} neighborhood rows from {:?}", table.len(), path);
        Ok(table)
    }

    /// Parse CSV data. Extra columns are ignored and missing statistics
    /// load as 0; empty or duplicate prefixes and non-numeric cells are
    /// rejected.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = csv_reader.headers()?;
        if !headers.iter().any(|h| h == PREFIX_COLUMN) {
            return Err(ArtifactError::InvalidTable(format!(
                "missing '{}' column",
                PREFIX_COLUMN
            )));
        }

        let mut rows = AHashMap::new();
        for (index, row) in csv_reader.deserialize::<LookupRow>().enumerate() {
            let row = row?;
            // header is line 1
            let line = index + 2;
            let (prefix, record) = row.into_record(line);
            let prefix = normalize_prefix(&prefix);
            if prefix.is_empty() {
                return Err(ArtifactError::InvalidTable(format!(
                    "empty {} on line {}",
                    PREFIX_COLUMN, line
                )));
            }
            if rows.insert(prefix.clone(), record).is_some() {
                return Err(ArtifactError::InvalidTable(format!(
                    "duplicate {} '{}' on line {}",
                    PREFIX_COLUMN, prefix, line
                )));
            }
        }

        Ok(Self { rows })
    }

    pub fn get(&self, prefix: &str) -> Option<&NeighborhoodRecord> {
        self.rows.get(prefix)
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.rows.contains_key(prefix)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolve the statistics for a postal prefix.
    ///
    /// The table row for `prefix` is the base when present, otherwise
    /// [`NeighborhoodRecord::DEFAULT`]. Every present override then replaces
    /// its field, independently of the others.
    pub fn resolve_stats(&self, prefix: &str, overrides: &PropertyOverrides) -> ResolvedStats {
        match self.rows.get(prefix) {
            Some(record) => ResolvedStats::new(*record, StatsSource::Lookup, overrides),
            None => ResolvedStats::new(NeighborhoodRecord::DEFAULT, StatsSource::Default, overrides),
        }
    }
}

fn normalize_prefix(prefix: &str) -> String {
    prefix.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "\
FSA,bedrooms,bathrooms,sqft,lot_sqft,price
M5V,2,1,900,0,650000
L4C,3.5,2.5,2100,4500,1100000
k1a,4,3,2600,6000,990000
";

    fn record(bedrooms: f64, bathrooms: f64, sqft: f64, lot_sqft: f64) -> NeighborhoodRecord {
        NeighborhoodRecord {
            bedrooms,
            bathrooms,
            sqft,
            lot_sqft,
        }
    }

    #[test]
    fn test_load_from_reader() {
        let table = LookupTable::from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("M5V"), Some(&record(2.0, 1.0, 900.0, 0.0)));
        assert_eq!(table.get("L4C"), Some(&record(3.5, 2.5, 2100.0, 4500.0)));
        // keys are uppercased on load
        assert!(table.contains("K1A"));
        assert!(!table.contains("k1a"));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        let table = LookupTable::from_path(file.path()).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = LookupTable::from_path("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, ArtifactError::Io { .. }));
    }

    #[test]
    fn test_missing_prefix_column() {
        let data = "postcode,bedrooms,bathrooms,sqft,lot_sqft\nM5V,2,1,900,0\n";
        assert!(matches!(
            LookupTable::from_reader(data.as_bytes()),
            Err(ArtifactError::InvalidTable(_))
        ));
    }

    #[test]
    fn test_duplicate_prefix_rejected() {
        let data = "FSA,bedrooms,bathrooms,sqft,lot_sqft\nM5V,2,1,900,0\nm5v,3,2,1000,0\n";
        let err = LookupTable::from_reader(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_non_numeric_cell_rejected() {
        let data = "FSA,bedrooms,bathrooms,sqft,lot_sqft\nM5V,two,1,900,0\n";
        assert!(matches!(
            LookupTable::from_reader(data.as_bytes()),
            Err(ArtifactError::Csv(_))
        ));
    }

    #[test]
    fn test_missing_stat_column_loads_as_zero() {
        let data = "FSA,bedrooms,bathrooms,sqft\nM5V,2,1,900\n";
        let table = LookupTable::from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.get("M5V"), Some(&record(2.0, 1.0, 900.0, 0.0)));
    }

    #[test]
    fn test_empty_stat_cell_loads_as_zero() {
        let data = "FSA,bedrooms,bathrooms,sqft,lot_sqft\nM5V,2,1,900,\nL4C,,2,1800,4000\n";
        let table = LookupTable::from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.get("M5V"), Some(&record(2.0, 1.0, 900.0, 0.0)));
        assert_eq!(table.get("L4C"), Some(&record(0.0, 2.0, 1800.0, 4000.0)));

        let stats = table.resolve_stats("L4C", &PropertyOverrides::default());
        assert_eq!(stats.record.bedrooms, 0.0);
        assert_eq!(stats.source, StatsSource::Lookup);
    }

    #[test]
    fn test_resolve_known_prefix_returns_row() {
        let table = LookupTable::from_reader(CSV.as_bytes()).unwrap();
        for prefix in ["M5V", "L4C", "K1A"] {
            let stats = table.resolve_stats(prefix, &PropertyOverrides::default());
            assert_eq!(&stats.record, table.get(prefix).unwrap());
            assert_eq!(stats.source, StatsSource::Lookup);
        }
    }

    #[test]
    fn test_resolve_unknown_prefix_returns_default() {
        let table = LookupTable::from_reader(CSV.as_bytes()).unwrap();
        for prefix in ["Unknown", "", "ZZZ", "m5v"] {
            let stats = table.resolve_stats(prefix, &PropertyOverrides::default());
            assert_eq!(stats.record, record(3.0, 2.0, 1500.0, 0.0));
            assert_eq!(stats.source, StatsSource::Default);
        }
    }

    #[test]
    fn test_resolve_unknown_prefix_with_bedrooms_override() {
        let table = LookupTable::default();
        let overrides = PropertyOverrides {
            bedrooms: Some(5.0),
            ..Default::default()
        };
        let stats = table.resolve_stats("Unknown", &overrides);
        assert_eq!(stats.record, record(5.0, 2.0, 1500.0, 0.0));
    }

    #[test]
    fn test_resolve_each_override_independently() {
        let table = LookupTable::from_records([("M5V", record(2.0, 1.0, 900.0, 0.0))]);
        let base = record(2.0, 1.0, 900.0, 0.0);

        let cases = [
            (PropertyOverrides { bedrooms: Some(4.0), ..Default::default() }, record(4.0, 1.0, 900.0, 0.0)),
            (PropertyOverrides { bathrooms: Some(3.0), ..Default::default() }, record(2.0, 3.0, 900.0, 0.0)),
            (PropertyOverrides { sqft: Some(1400.0), ..Default::default() }, record(2.0, 1.0, 1400.0, 0.0)),
            (PropertyOverrides { lot_sqft: Some(800.0), ..Default::default() }, record(2.0, 1.0, 900.0, 800.0)),
        ];
        for (overrides, expected) in cases {
            let stats = table.resolve_stats("M5V", &overrides);
            assert_eq!(stats.record, expected);
            assert_ne!(stats.record, base);
        }
    }
}
