//! # homeval
//!
//! House price estimation from a coordinate plus optional property specs.
//!
//! A request is reverse-geocoded to its postal prefix (FSA), the prefix's
//! neighborhood averages are looked up, caller-supplied specs override them,
//! and the result is projected onto the model's feature schema and scored.
//!
//! ## Quick Start
//!
//! ```bash
//! homeval --data-dir ./data --port 8000
//! curl -X POST localhost:8000/predict \
//!      -H 'content-type: application/json' \
//!      -d '{"latitude": 43.65, "longitude": -79.38, "bedrooms": 3}'
//! ```
//!
//! The data directory holds three artifacts produced by the training job:
//!
//! - `house_price_model.json` - linear or tree-ensemble model
//! - `model_columns.json` - ordered feature names
//! - `neighborhood_averages.csv` - `FSA,bedrooms,bathrooms,sqft,lot_sqft`
//!
//! ## Crate Structure
//!
//! - `homeval-core` - Lookup table, schema, feature resolution, inference
//! - `homeval-geocode` - Reverse geocoding (Nominatim) and FSA extraction
//! - `homeval-api` - REST API

// Re-export core types
pub use homeval_core::{
    build_vector, ArtifactError, ArtifactPaths, Coordinate, Estimate, FeatureKey, FeatureLayout,
    FeatureSchema, FeatureVector, InferenceError, LookupTable, ModelArtifact, NeighborhoodRecord,
    PredictionContext, Predictor, PropertyOverrides, ResolvedStats,
};

// Re-export geocoding
pub use homeval_geocode::{GeocodeError, GeocodingAdapter, Location, NominatimClient, ReverseGeocoder};

// Re-export API
pub use homeval_api::{ApiError, AppState, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        build_vector, ArtifactPaths, Coordinate, FeatureSchema, FeatureVector, LookupTable,
        ModelArtifact, PredictionContext, Predictor, PropertyOverrides, ResolvedStats,
        GeocodingAdapter, Location, ReverseGeocoder,
        AppState, RestApi,
    };
}
