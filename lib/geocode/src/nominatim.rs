//! OpenStreetMap Nominatim client

use crate::adapter::{Place, ReverseGeocoder};
use crate::error::{GeocodeError, Result};
use async_trait::async_trait;
use homeval_core::Coordinate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Nominatim's usage policy requires an identifying User-Agent.
pub const DEFAULT_USER_AGENT: &str = "my_house_price_app_v1";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NominatimConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NOMINATIM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReverseResponse {
    // Nominatim answers 200 with {"error": "Unable to geocode"} for open sea etc.
    NotFound { error: String },
    Found(Place),
}

/// Reverse geocoder backed by the Nominatim `/reverse` endpoint.
pub struct NominatimClient {
    client: Client,
    reverse_url: String,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;

        tracing::info!(
            "Initializing Nominatim geocoder: url={}, timeout={:?}",
            config.base_url,
            config.timeout
        );

        Ok(Self {
            client,
            reverse_url: format!("{}/reverse", config.base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    async fn reverse(&self, coordinate: Coordinate) -> Result<Option<Place>> {
        let response = self
            .client
            .get(&self.reverse_url)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        match serde_json::from_slice::<ReverseResponse>(&body) {
            Ok(ReverseResponse::Found(place)) => Ok(Some(place)),
            Ok(ReverseResponse::NotFound { error }) => {
                tracing::debug!("Nominatim has no result: {}", error);
                Ok(None)
            }
            Err(e) => Err(GeocodeError::Decode(e.to_string())),
        }
    }
}
