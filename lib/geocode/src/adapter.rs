//! Geocoding adapter
//!
//! Wraps a [`ReverseGeocoder`] and reduces its raw answer to the two things a
//! valuation needs: the postal prefix and a display address.

use crate::error::Result;
use crate::postal::{postal_prefix, UNKNOWN_ADDRESS, UNKNOWN_PREFIX};
use async_trait::async_trait;
use homeval_core::Coordinate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Address components of a provider answer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressDetails {
    #[serde(default)]
    pub postcode: Option<String>,
}

/// Raw reverse-geocoding answer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub address: Option<AddressDetails>,
}

/// External reverse-geocoding provider
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// `Ok(None)` when the provider knows nothing about the coordinate.
    async fn reverse(&self, coordinate: Coordinate) -> Result<Option<Place>>;
}

/// Postal prefix and human-readable address of a coordinate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub postal_prefix: String,
    pub address: String,
}

impl Location {
    pub fn unknown() -> Self {
        Self {
            postal_prefix: UNKNOWN_PREFIX.to_string(),
            address: UNKNOWN_ADDRESS.to_string(),
        }
    }

    pub fn from_place(place: Option<Place>) -> Self {
        match place {
            Some(Place {
                display_name,
                address: Some(details),
            }) => Self {
                postal_prefix: postal_prefix(details.postcode.as_deref()),
                address: display_name.unwrap_or_else(|| UNKNOWN_ADDRESS.to_string()),
            },
            _ => Self::unknown(),
        }
    }
}

#[derive(Clone)]
pub struct GeocodingAdapter {
    geocoder: Arc<dyn ReverseGeocoder>,
}

impl GeocodingAdapter {
    pub fn new(geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self { geocoder }
    }

    /// Provider errors are returned as-is; only an empty answer becomes
    /// [`Location::unknown`].
    pub async fn resolve(&self, coordinate: Coordinate) -> Result<Location> {
        let place = self.geocoder.reverse(coordinate).await?;
        if place.is_none() {
            tracing::debug!(
                "No geocoding result for ({}, {})",
                coordinate.latitude,
                coordinate.longitude
            );
        }
        Ok(Location::from_place(place))
    }
}
