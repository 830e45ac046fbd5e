//! # homeval Geocode
//!
//! Reverse geocoding for the homeval service: a coordinate goes in, a postal
//! prefix (FSA) and a display address come out.
//!
//! - [`ReverseGeocoder`] - The provider contract
//! - [`NominatimClient`] - OpenStreetMap Nominatim implementation
//! - [`GeocodingAdapter`] - Reduces provider answers to a [`Location`]

pub mod adapter;
pub mod error;
pub mod nominatim;
pub mod postal;

pub use adapter::{AddressDetails, GeocodingAdapter, Location, Place, ReverseGeocoder};
pub use error::{GeocodeError, Result};
pub use nominatim::{NominatimClient, NominatimConfig};
pub use postal::{postal_prefix, UNKNOWN_ADDRESS, UNKNOWN_PREFIX};
