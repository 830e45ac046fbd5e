//! # homeval API
//!
//! REST surface of the homeval service:
//!
//! - `GET /` - liveness message
//! - `GET /ready` - 200 once the model artifacts are loaded, 503 otherwise
//! - `POST /predict` - price estimate for a coordinate and optional specs

pub mod dto;
pub mod error;
pub mod rest;
pub mod state;

pub use dto::{LocationInfo, PredictRequest, PredictResponse};
pub use error::{ApiError, ErrorBody};
pub use rest::{configure, RestApi};
pub use state::{AppState, PredictionService};
