//! Shared application state

use crate::dto::{LocationInfo, PredictRequest, PredictResponse};
use crate::error::ApiError;
use homeval_core::PredictionContext;
use homeval_geocode::GeocodingAdapter;
use std::sync::Arc;

/// Geocode, resolve, vectorize and predict for one request.
#[derive(Clone)]
pub struct PredictionService {
    context: Arc<PredictionContext>,
    geocoder: GeocodingAdapter,
}

impl PredictionService {
    pub fn new(context: Arc<PredictionContext>, geocoder: GeocodingAdapter) -> Self {
        Self { context, geocoder }
    }

    pub fn context(&self) -> &PredictionContext {
        &self.context
    }

    pub async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, ApiError> {
        let coordinate = request.coordinate();
        let location = self.geocoder.resolve(coordinate).await?;
        tracing::debug!("Resolved FSA '{}' ({})", location.postal_prefix, location.address);

        let estimate = self
            .context
            .estimate(&coordinate, &location.postal_prefix, &request.overrides)?;
        tracing::info!(
            "Estimated {:.2} for FSA '{}' ({:?} stats)",
            estimate.price,
            location.postal_prefix,
            estimate.stats.source
        );

        Ok(PredictResponse {
            estimated_price: estimate.price,
            location_info: LocationInfo {
                fsa: location.postal_prefix,
                address: location.address,
            },
            specs_used: estimate.stats,
        })
    }
}

/// Whether the start-up artifacts were loaded
pub enum AppState {
    Ready(PredictionService),
    NotReady { reason: String },
}

impl AppState {
    pub fn ready(context: Arc<PredictionContext>, geocoder: GeocodingAdapter) -> Self {
        AppState::Ready(PredictionService::new(context, geocoder))
    }

    pub fn not_ready(reason: impl Into<String>) -> Self {
        AppState::NotReady {
            reason: reason.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, AppState::Ready(_))
    }

    pub fn service(&self) -> Result<&PredictionService, ApiError> {
        match self {
            AppState::Ready(service) => Ok(service),
            AppState::NotReady { .. } => Err(ApiError::NotReady),
        }
    }
}
