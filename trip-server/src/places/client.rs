//! Places API HTTP client.
//!
//! Provides async methods for searching nearby places and resolving
//! place IDs. Handles authentication, concurrency limiting, and
//! conversion to domain types.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{Location, Place, PlaceId};

use super::convert::{convert_place, convert_results};
use super::error::PlacesError;
use super::types::{NearbySearchResponse, PlaceDetailsResponse};

/// Default base URL for the Places API.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default search radius in metres.
pub const DEFAULT_RADIUS_M: u32 = 1500;

/// Largest radius the provider accepts, in metres.
pub const MAX_RADIUS_M: u32 = 50_000;

/// Fields requested from Place Details; everything a [`Place`] needs.
const DETAIL_FIELDS: &str = "place_id,name,formatted_address,geometry/location,rating,user_ratings_total";

/// Configuration for the Places client.
#[derive(Debug, Clone)]
pub struct PlacesConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl PlacesConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// A nearby search: everything within `radius_m` of `location`.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    /// Centre of the search circle
    pub location: Location,
    /// Radius in metres, clamped to the provider maximum
    pub radius_m: u32,
    /// Free-text filter, e.g. "coffee"
    pub keyword: Option<String>,
    /// Provider category, e.g. "restaurant"
    pub category: Option<String>,
}

impl NearbyQuery {
    /// Search the default radius around a location.
    pub fn new(location: Location) -> Self {
        Self {
            location,
            radius_m: DEFAULT_RADIUS_M,
            keyword: None,
            category: None,
        }
    }

    pub fn with_radius(mut self, radius_m: u32) -> Self {
        self.radius_m = radius_m.clamp(1, MAX_RADIUS_M);
        self
    }

    /// Filter by keyword; blank keywords are ignored.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = non_blank(keyword.into());
        self
    }

    /// Filter by category; blank categories are ignored.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = non_blank(category.into());
        self
    }

    fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("location", self.location.to_string()),
            ("radius", self.radius_m.to_string()),
        ];
        if let Some(keyword) = &self.keyword {
            params.push(("keyword", keyword.clone()));
        }
        if let Some(category) = &self.category {
            params.push(("type", category.clone()));
        }
        params
    }
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Places API client.
///
/// Uses a semaphore to limit concurrent requests and avoid rate limiting.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    semaphore: Arc<Semaphore>,
}

impl PlacesClient {
    /// Create a new Places client with the given configuration.
    pub fn new(config: PlacesConfig) -> Result<Self, PlacesError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Search for places near a location.
    ///
    /// Results the provider returns without a usable ID, name or location
    /// are skipped.
    pub async fn nearby_search(&self, query: &NearbyQuery) -> Result<Vec<Place>, PlacesError> {
        let url = format!("{}/nearbysearch/json", self.base_url);
        let response: NearbySearchResponse = self.get_json(&url, &query.query_params()).await?;

        match response.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => return Ok(Vec::new()),
            status => return Err(PlacesError::from_status(status, response.error_message)),
        }

        let places = convert_results(&response.results);
        debug!(
            location = %query.location,
            radius = query.radius_m,
            results = places.len(),
            "Nearby search complete"
        );
        Ok(places)
    }

    /// Resolve a place ID to a full place.
    pub async fn place_details(&self, place_id: &PlaceId) -> Result<Place, PlacesError> {
        let url = format!("{}/details/json", self.base_url);
        let params = [
            ("place_id", place_id.to_string()),
            ("fields", DETAIL_FIELDS.to_string()),
        ];
        let response: PlaceDetailsResponse = self.get_json(&url, &params).await?;

        match response.status.as_str() {
            "OK" => {}
            // The provider answers INVALID_REQUEST for malformed IDs
            "NOT_FOUND" | "INVALID_REQUEST" => {
                return Err(PlacesError::NotFound {
                    place_id: place_id.to_string(),
                });
            }
            status => return Err(PlacesError::from_status(status, response.error_message)),
        }

        let result = response.result.ok_or_else(|| PlacesError::NotFound {
            place_id: place_id.to_string(),
        })?;
        Ok(convert_place(&result)?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, PlacesError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| PlacesError::Api {
                status: "CLIENT".to_string(),
                message: "Semaphore closed".to_string(),
            })?;

        let response = self
            .http
            .get(url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PlacesError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlacesError::Api {
                status: status.as_u16().to_string(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| PlacesError::Json {
            message: e.to_string(),
        })
    }
}
