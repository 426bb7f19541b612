//! Places API response DTOs.
//!
//! These types map directly to the provider's JSON responses. They use
//! `Option` liberally because the provider omits fields rather than sending
//! null values in many cases.

use serde::Deserialize;

/// Response from the Nearby Search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct NearbySearchResponse {
    /// Request status, e.g. "OK" or "ZERO_RESULTS".
    pub status: String,

    /// Matching places.
    #[serde(default)]
    pub results: Vec<PlaceResult>,

    /// Human-readable detail when `status` is an error.
    pub error_message: Option<String>,

    /// Token for the next page of results, if any.
    pub next_page_token: Option<String>,
}

/// Response from the Place Details endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDetailsResponse {
    /// Request status, e.g. "OK" or "NOT_FOUND".
    pub status: String,

    /// The place, present when `status` is "OK".
    pub result: Option<PlaceResult>,

    /// Human-readable detail when `status` is an error.
    pub error_message: Option<String>,
}

/// A place as returned by either endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceResult {
    /// Provider place identifier.
    pub place_id: Option<String>,

    /// Display name.
    pub name: Option<String>,

    /// Short address, returned by Nearby Search.
    pub vicinity: Option<String>,

    /// Full address, returned by Place Details.
    pub formatted_address: Option<String>,

    /// Location and viewport.
    pub geometry: Option<Geometry>,

    /// Average rating (1.0 to 5.0).
    pub rating: Option<f64>,

    /// Number of user ratings.
    pub user_ratings_total: Option<u32>,

    /// Provider categories, e.g. "restaurant".
    #[serde(default)]
    pub types: Vec<String>,

    /// e.g. "OPERATIONAL", "CLOSED_PERMANENTLY".
    pub business_status: Option<String>,
}

/// Geometry block of a place.
#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

/// A raw coordinate pair.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_nearby_response() {
        let json = r#"{
            "html_attributions": [],
            "results": [
                {
                    "business_status": "OPERATIONAL",
                    "geometry": {
                        "location": { "lat": 40.7366, "lng": -74.0276 },
                        "viewport": {
                            "northeast": { "lat": 40.738, "lng": -74.026 },
                            "southwest": { "lat": 40.735, "lng": -74.029 }
                        }
                    },
                    "name": "Pier A Park",
                    "place_id": "ChIJ1",
                    "rating": 4.7,
                    "types": ["park", "point_of_interest"],
                    "user_ratings_total": 2543,
                    "vicinity": "Frank Sinatra Dr, Hoboken"
                }
            ],
            "status": "OK"
        }"#;

        let response: NearbySearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, "OK");
        assert_eq!(response.results.len(), 1);

        let place = &response.results[0];
        assert_eq!(place.name.as_deref(), Some("Pier A Park"));
        assert_eq!(place.user_ratings_total, Some(2543));
        assert_eq!(place.types, ["park", "point_of_interest"]);
        assert!(place.geometry.is_some());
    }

    #[test]
    fn parse_error_response() {
        let json = r#"{
            "error_message": "The provided API key is invalid.",
            "html_attributions": [],
            "results": [],
            "status": "REQUEST_DENIED"
        }"#;

        let response: NearbySearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, "REQUEST_DENIED");
        assert!(response.results.is_empty());
        assert!(response.error_message.is_some());
    }

    #[test]
    fn parse_details_without_result() {
        let json = r#"{ "html_attributions": [], "status": "NOT_FOUND" }"#;
        let response: PlaceDetailsResponse = serde_json::from_str(json).unwrap();
        assert!(response.result.is_none());
    }
}
