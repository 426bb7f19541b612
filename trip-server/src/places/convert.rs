//! Conversion from Places DTOs to domain types.

use tracing::warn;

use crate::domain::{Location, Place, PlaceId};

use super::types::PlaceResult;

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Place ID failed validation
    #[error("invalid place ID: {0}")]
    InvalidPlaceId(String),

    /// Coordinates failed validation
    #[error("invalid location: {0}")]
    InvalidLocation(String),
}

/// Convert a single provider result to a [`Place`].
pub fn convert_place(result: &PlaceResult) -> Result<Place, ConversionError> {
    let raw_id = result
        .place_id
        .as_deref()
        .ok_or(ConversionError::MissingField("place_id"))?;
    let place_id =
        PlaceId::new(raw_id).map_err(|e| ConversionError::InvalidPlaceId(e.to_string()))?;

    let title = result
        .name
        .clone()
        .ok_or(ConversionError::MissingField("name"))?;

    let raw_location = result
        .geometry
        .as_ref()
        .map(|g| g.location)
        .ok_or(ConversionError::MissingField("geometry.location"))?;
    let location = Location::new(raw_location.lat, raw_location.lng)
        .map_err(|e| ConversionError::InvalidLocation(e.to_string()))?;

    // Nearby Search returns `vicinity`, Place Details `formatted_address`
    let address = result
        .formatted_address
        .clone()
        .or_else(|| result.vicinity.clone())
        .unwrap_or_default();

    let mut place = Place::new(place_id, title, address, location);
    place.rating = result.rating;
    place.ratings_total = result.user_ratings_total;
    Ok(place)
}

/// Convert a page of search results, skipping any that can't be used.
pub fn convert_results(results: &[PlaceResult]) -> Vec<Place> {
    results
        .iter()
        .filter_map(|result| match convert_place(result) {
            Ok(place) => Some(place),
            Err(e) => {
                warn!(
                    place_id = result.place_id.as_deref().unwrap_or("<none>"),
                    error = %e,
                    "Skipping unusable place result"
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::types::{Geometry, LatLng};

    fn result(id: Option<&str>, name: Option<&str>, lat: f64) -> PlaceResult {
        PlaceResult {
            place_id: id.map(str::to_string),
            name: name.map(str::to_string),
            vicinity: Some("Hudson St".to_string()),
            formatted_address: None,
            geometry: Some(Geometry {
                location: LatLng { lat, lng: -74.03 },
            }),
            rating: Some(4.2),
            user_ratings_total: Some(10),
            types: vec![],
            business_status: None,
        }
    }

    #[test]
    fn converts_complete_result() {
        let place = convert_place(&result(Some("p1"), Some("Cafe"), 40.7)).unwrap();
        assert_eq!(place.place_id.as_str(), "p1");
        assert_eq!(place.title, "Cafe");
        assert_eq!(place.address, "Hudson St");
        assert_eq!(place.rating, Some(4.2));
        assert_eq!(place.ratings_total, Some(10));
    }

    #[test]
    fn prefers_formatted_address() {
        let mut r = result(Some("p1"), Some("Cafe"), 40.7);
        r.formatted_address = Some("1 Hudson St, Hoboken, NJ 07030".to_string());
        let place = convert_place(&r).unwrap();
        assert_eq!(place.address, "1 Hudson St, Hoboken, NJ 07030");
    }

    #[test]
    fn missing_fields_are_errors() {
        assert!(matches!(
            convert_place(&result(None, Some("Cafe"), 40.7)),
            Err(ConversionError::MissingField("place_id"))
        ));
        assert!(matches!(
            convert_place(&result(Some("p1"), None, 40.7)),
            Err(ConversionError::MissingField("name"))
        ));

        let mut r = result(Some("p1"), Some("Cafe"), 40.7);
        r.geometry = None;
        assert!(convert_place(&r).is_err());
    }

    #[test]
    fn bad_location_is_error() {
        assert!(matches!(
            convert_place(&result(Some("p1"), Some("Cafe"), 123.0)),
            Err(ConversionError::InvalidLocation(_))
        ));
    }

    #[test]
    fn convert_results_skips_bad_entries() {
        let results = vec![
            result(Some("p1"), Some("One"), 40.7),
            result(None, Some("No id"), 40.7),
            result(Some("p2"), Some("Two"), 40.8),
        ];
        let places = convert_results(&results);
        let ids: Vec<&str> = places.iter().map(|p| p.place_id.as_str()).collect();
        assert_eq!(ids, ["p1", "p2"]);
    }
}
