use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeocodeError>;

/// A reverse-geocoding call that did not produce an answer.
///
/// "No result" is not an error; see [`crate::ReverseGeocoder::reverse`].
#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("Geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Geocoding provider returned HTTP {0}")]
    Status(u16),

    #[error("Could not decode geocoding response: {0}")]
    Decode(String),

    #[error("Geocoding provider error: {0}")]
    Provider(String),
}
