//! Place type.

use serde::{Deserialize, Serialize};

use super::{Location, PlaceId};

/// A point of interest returned by the mapping provider.
///
/// Only `place_id` participates in trip logic. The remaining fields are
/// carried along for display and for building provider links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    /// Provider-assigned identity
    pub place_id: PlaceId,

    /// Display name
    pub title: String,

    /// Display address
    pub address: String,

    /// Where the place is
    pub location: Location,

    /// Average user rating, if the provider has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    /// Number of ratings behind `rating`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings_total: Option<u32>,
}

impl Place {
    /// Create a place with no rating metadata.
    pub fn new(
        place_id: PlaceId,
        title: impl Into<String>,
        address: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            place_id,
            title: title.into(),
            address: address.into(),
            location,
            rating: None,
            ratings_total: None,
        }
    }

    /// Attach rating metadata.
    pub fn with_rating(mut self, rating: f64, ratings_total: u32) -> Self {
        self.rating = Some(rating);
        self.ratings_total = Some(ratings_total);
        self
    }
}
