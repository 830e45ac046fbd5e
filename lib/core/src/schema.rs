//! Feature schema
//!
//! The ordered list of column names the regression model was trained on.
//! It fixes both the width of every feature vector and the position of each
//! feature inside it.

use crate::error::{ArtifactError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl FeatureSchema {
    /// Create a schema from column names. The list must be non-empty and
    /// contain no blank names. Repeated names are allowed.
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let schema = Self {
            columns: columns.into_iter().map(Into::into).collect(),
        };
        schema.validate()?;
        Ok(schema)
    }

    /// Load a schema serialized as a JSON array of strings.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ArtifactError::io(path, e))?;
        let schema = Self::from_reader(BufReader::new(file))?;
        tracing::debug!("Loaded {} schema columns from {:?}", schema.len(), path);
        Ok(schema)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let schema: FeatureSchema = serde_json::from_reader(reader)?;
        schema.validate()?;
        Ok(schema)
    }

    fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(ArtifactError::InvalidSchema("schema has no columns".to_string()));
        }
        if let Some(index) = self.columns.iter().position(|c| c.trim().is_empty()) {
            return Err(ArtifactError::InvalidSchema(format!(
                "column {} has a blank name",
                index
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    /// Position of the first column with this name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_schema_from_json() {
        let json = r#"["latitude", "longitude", "bedrooms", "property_type_Condo"]"#;
        let schema = FeatureSchema::from_reader(json.as_bytes()).unwrap();
        assert_eq!(schema.len(), 4);
        assert_eq!(schema.position("bedrooms"), Some(2));
        assert_eq!(schema.position("sqft"), None);
        assert_eq!(schema.iter().last(), Some("property_type_Condo"));
    }

    #[test]
    fn test_schema_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"["latitude", "longitude"]"#).unwrap();
        let schema = FeatureSchema::from_path(file.path()).unwrap();
        assert_eq!(schema.columns(), &["latitude".to_string(), "longitude".to_string()]);
    }

    #[test]
    fn test_empty_schema_error() {
        assert!(matches!(
            FeatureSchema::from_reader("[]".as_bytes()),
            Err(ArtifactError::InvalidSchema(_))
        ));
        assert!(FeatureSchema::new(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_blank_column_error() {
        let err = FeatureSchema::new(["latitude", "  "]).unwrap_err();
        assert!(err.to_string().contains("column 1"));
    }

    #[test]
    fn test_not_an_array_is_json_error() {
        assert!(matches!(
            FeatureSchema::from_reader(r#"{"columns": []}"#.as_bytes()),
            Err(ArtifactError::Json(_))
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let schema = FeatureSchema::new(["a", "b", "a"]).unwrap();
        let json = serde_json::to_string(&schema).unwrap();
        assert_eq!(json, r#"["a","b","a"]"#);
        let parsed: FeatureSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, parsed);
    }
}
