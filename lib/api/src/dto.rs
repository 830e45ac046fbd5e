//! Request and response bodies of the REST API

use homeval_core::{Coordinate, PropertyOverrides, ResolvedStats};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(flatten)]
    pub overrides: PropertyOverrides,
}

impl PredictRequest {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationInfo {
    pub fsa: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub estimated_price: f64,
    pub location_info: LocationInfo,
    pub specs_used: ResolvedStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_overrides_are_flattened() {
        let request: PredictRequest = serde_json::from_str(
            r#"{"latitude": 43.65, "longitude": -79.38, "bedrooms": 4, "lot_sqft": null}"#,
        )
        .unwrap();
        assert_eq!(request.coordinate(), Coordinate::new(43.65, -79.38));
        assert_eq!(
            request.overrides,
            PropertyOverrides {
                bedrooms: Some(4.0),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_request_without_overrides() {
        let request: PredictRequest =
            serde_json::from_str(r#"{"latitude": 44.0, "longitude": -79.46}"#).unwrap();
        assert!(request.overrides.is_empty());
    }

    #[test]
    fn test_request_requires_coordinate() {
        let err = serde_json::from_str::<PredictRequest>(r#"{"latitude": 44.0, "sqft": 900}"#)
            .unwrap_err();
        assert!(err.to_string().contains("longitude"));
    }
}
