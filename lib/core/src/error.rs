use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ArtifactError>;

/// Failures while loading the start-up artifacts (lookup table, schema, model).
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid lookup table: {0}")]
    InvalidTable(String),

    #[error("Invalid feature schema: {0}")]
    InvalidSchema(String),

    #[error("Invalid model artifact: {0}")]
    InvalidModel(String),

    #[error("Model expects {model} features but the schema has {schema} columns")]
    WidthMismatch { model: usize, schema: usize },
}

impl ArtifactError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failures raised by a predictor for a single feature vector.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("Invalid feature count: expected {expected}, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("Model produced a non-finite estimate: {0}")]
    NonFinite(f64),

    #[error("{0}")]
    Model(String),
}
