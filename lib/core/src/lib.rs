//! # homeval Core
//!
//! Core library for the homeval price estimation service.
//!
//! This crate turns a coordinate, its postal prefix and optional property
//! specifications into a model-ready feature vector, and runs the model:
//!
//! - [`LookupTable`] - Neighborhood averages keyed by postal prefix
//! - [`FeatureSchema`] - Ordered column names the model expects
//! - [`FeatureLayout`] - Schema compiled into feature slots
//! - [`Predictor`] - Single-row regression inference
//! - [`PredictionContext`] - All of the above, loaded once at start-up
//!
//! ## Example
//!
//! ```rust
//! use homeval_core::{
//!     Coordinate, FeatureSchema, LinearModel, LookupTable, ModelArtifact,
//!     NeighborhoodRecord, PredictionContext, PropertyOverrides,
//! };
//! use std::sync::Arc;
//!
//! let lookup = LookupTable::from_records([(
//!     "M5V",
//!     NeighborhoodRecord { bedrooms: 2.0, bathrooms: 1.0, sqft: 900.0, lot_sqft: 0.0 },
//! )]);
//! let schema = FeatureSchema::new(["bedrooms", "sqft"]).unwrap();
//! let model = ModelArtifact::Linear(LinearModel {
//!     intercept: 50_000.0,
//!     coefficients: vec![20_000.0, 300.0],
//! });
//!
//! let context = PredictionContext::new(lookup, schema, Arc::new(model)).unwrap();
//! let estimate = context
//!     .estimate(&Coordinate::new(43.64, -79.39), "M5V", &PropertyOverrides::default())
//!     .unwrap();
//! assert_eq!(estimate.price, 50_000.0 + 40_000.0 + 270_000.0);
//! ```

pub mod context;
pub mod error;
pub mod features;
pub mod lookup;
pub mod model;
pub mod record;
pub mod schema;

pub use context::{ArtifactPaths, Estimate, PredictionContext, round_price};
pub use error::{ArtifactError, InferenceError, Result};
pub use features::{
    build_vector, FeatureKey, FeatureLayout, FeatureVector, CRIME_COUNT_PLACEHOLDER,
    PROPERTY_TYPE_HOUSE,
};
pub use lookup::LookupTable;
pub use model::{Aggregation, LinearModel, ModelArtifact, Predictor, RegressionTree, TreeEnsemble, TreeNode};
pub use record::{Coordinate, NeighborhoodRecord, PropertyOverrides, ResolvedStats, StatsSource};
pub use schema::FeatureSchema;
