//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Place, PlaceId};
use crate::trip::{SaveOutcome, TripSnapshot};

/// Request to move a stop.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    /// Current index of the stop
    pub from: usize,

    /// Index the stop should end up at
    pub to: usize,
}

/// Request to open or close a stop's detail popup.
#[derive(Debug, Deserialize)]
pub struct ActiveInfoRequest {
    /// Stop index, or `null` to close
    pub index: Option<usize>,
}

/// Request to replace the trip with the places in a share link.
#[derive(Debug, Deserialize)]
pub struct HydrateRequest {
    /// A link produced by the share endpoint
    pub link: String,
}

/// Query for the share link endpoint.
#[derive(Debug, Deserialize)]
pub struct ShareQuery {
    /// Override the configured base URL
    pub base_url: Option<String>,
}

/// Query for nearby place search.
#[derive(Debug, Deserialize)]
pub struct NearbyRequest {
    pub lat: f64,
    pub lng: f64,

    /// Radius in metres (defaults to 1500)
    pub radius: Option<u32>,

    /// Free-text filter
    pub keyword: Option<String>,

    /// Provider category
    #[serde(rename = "type")]
    pub category: Option<String>,
}

/// A link for the client to open or copy.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkResponse {
    pub url: String,
}

/// Result of a save command.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub outcome: SaveOutcomeDto,
    pub trip: TripSnapshot,
}

/// Wire form of [`SaveOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveOutcomeDto {
    Saved,
    AlreadySaving,
}

impl From<SaveOutcome> for SaveOutcomeDto {
    fn from(outcome: SaveOutcome) -> Self {
        match outcome {
            SaveOutcome::Saved => SaveOutcomeDto::Saved,
            SaveOutcome::AlreadySaving => SaveOutcomeDto::AlreadySaving,
        }
    }
}

/// Result of hydrating from a share link.
#[derive(Debug, Serialize)]
pub struct HydrateResponse {
    pub trip: TripSnapshot,

    /// IDs from the link that could not be resolved
    pub skipped: Vec<String>,
}

/// A place in search results.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(flatten)]
    pub place: Place,

    /// Whether the place is already a stop
    pub in_trip: bool,
}

impl SearchResult {
    /// Mark a search result against the current trip.
    pub fn new(place: Place, trip: &TripSnapshot) -> Self {
        let in_trip = trip.contains(&place.place_id);
        Self { place, in_trip }
    }
}

/// Response for nearby search.
#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    pub places: Vec<SearchResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Parse a place ID taken from a URL path segment.
pub(crate) fn path_place_id(raw: &str) -> Result<PlaceId, String> {
    PlaceId::new(raw).map_err(|e| format!("{e}: {raw:?}"))
}
