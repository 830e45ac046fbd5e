//! Immutable prediction context
//!
//! Everything a request needs besides the geocoder: the lookup table, the
//! schema with its compiled layout, and the predictor. Built once at start-up
//! and shared read-only between workers.

use crate::error::{ArtifactError, InferenceError, Result};
use crate::features::{FeatureLayout, FeatureVector};
use crate::lookup::LookupTable;
use crate::model::{ModelArtifact, Predictor};
use crate::record::{Coordinate, PropertyOverrides, ResolvedStats};
use crate::schema::FeatureSchema;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_MODEL_FILE: &str = "house_price_model.json";
pub const DEFAULT_COLUMNS_FILE: &str = "model_columns.json";
pub const DEFAULT_LOOKUP_FILE: &str = "neighborhood_averages.csv";

/// Locations of the start-up artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub columns: PathBuf,
    pub lookup: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside `dir`
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(DEFAULT_MODEL_FILE),
            columns: dir.join(DEFAULT_COLUMNS_FILE),
            lookup: dir.join(DEFAULT_LOOKUP_FILE),
        }
    }
}

/// Result of a single valuation
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    /// Prediction rounded to cents
    pub price: f64,
    pub raw: f64,
    pub stats: ResolvedStats,
}

pub struct PredictionContext {
    lookup: LookupTable,
    schema: FeatureSchema,
    layout: FeatureLayout,
    predictor: Arc<dyn Predictor>,
}

impl std::fmt::Debug for PredictionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionContext")
            .field("lookup_rows", &self.lookup.len())
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl PredictionContext {
    /// Assemble a context. Fails when the predictor declares a feature count
    /// different from the schema width.
    pub fn new(lookup: LookupTable, schema: FeatureSchema, predictor: Arc<dyn Predictor>) -> Result<Self> {
        if let Some(model) = predictor.expected_features() {
            if model != schema.len() {
                return Err(ArtifactError::WidthMismatch {
                    model,
                    schema: schema.len(),
                });
            }
        }
        let layout = FeatureLayout::compile(&schema);
        Ok(Self {
            lookup,
            schema,
            layout,
            predictor,
        })
    }

    /// Load all three artifacts from disk
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        tracing::info!("Loading model artifacts...");
        let model = ModelArtifact::from_path(&paths.model)?;
        let schema = FeatureSchema::from_path(&paths.columns)?;
        let lookup = LookupTable::from_path(&paths.lookup)?;

        let context = Self::new(lookup, schema, Arc::new(model))?;
        context.layout.report();
        tracing::info!(
            "Artifacts loaded: {} neighborhoods, {} features",
            context.lookup.len(),
            context.schema.len()
        );
        Ok(context)
    }

    pub fn lookup(&self) -> &LookupTable {
        &self.lookup
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    pub fn resolve_stats(&self, prefix: &str, overrides: &PropertyOverrides) -> ResolvedStats {
        self.lookup.resolve_stats(prefix, overrides)
    }

    pub fn build_vector(&self, coordinate: &Coordinate, stats: &ResolvedStats) -> FeatureVector {
        self.layout.build(coordinate, stats)
    }

    /// Resolve, vectorize and predict for an already geocoded request.
    pub fn estimate(
        &self,
        coordinate: &Coordinate,
        prefix: &str,
        overrides: &PropertyOverrides,
    ) -> std::result::Result<Estimate, InferenceError> {
        let stats = self.resolve_stats(prefix, overrides);
        tracing::debug!("Resolved stats for '{}' from {:?}: {:?}", prefix, stats.source, stats.record);

        let vector = self.build_vector(coordinate, &stats);
        let raw = self.predictor.predict(&vector)?;

        Ok(Estimate {
            price: round_price(raw),
            raw,
            stats,
        })
    }
}

/// Round to two decimal places, half away from zero.
#[inline]
pub fn round_price(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
