//! Caching layer for Places API responses.
//!
//! Place details change rarely, so they are cached by ID. Nearby searches
//! are cached by a key with the centre rounded to a grid (about 11 m at
//! 4 decimal places), so a map nudged by a few pixels reuses the last page.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{Place, PlaceId};

use super::client::{NearbyQuery, PlacesClient};
use super::error::PlacesError;

/// Grid resolution for nearby-search keys: 1e4 buckets per degree.
const GRID_PER_DEGREE: f64 = 10_000.0;

/// Cache key for nearby searches: (lat cell, lng cell, radius, keyword, category).
type NearbyKey = (i32, i32, u32, Option<String>, Option<String>);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct PlacesCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per kind.
    pub max_capacity: u64,
}

impl Default for PlacesCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 1000,
        }
    }
}

impl PlacesCacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }
}

fn grid_cell(degrees: f64) -> i32 {
    (degrees * GRID_PER_DEGREE).round() as i32
}

fn nearby_key(query: &NearbyQuery) -> NearbyKey {
    (
        grid_cell(query.location.lat()),
        grid_cell(query.location.lng()),
        query.radius_m,
        query.keyword.as_ref().map(|k| k.to_lowercase()),
        query.category.clone(),
    )
}

/// Places client with caching.
///
/// Wraps a `PlacesClient`; errors are never cached.
pub struct CachedPlacesClient {
    client: PlacesClient,
    details: MokaCache<PlaceId, Arc<Place>>,
    nearby: MokaCache<NearbyKey, Arc<Vec<Place>>>,
}

impl CachedPlacesClient {
    /// Create a new cached client.
    pub fn new(client: PlacesClient, config: &PlacesCacheConfig) -> Self {
        let details = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let nearby = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            client,
            details,
            nearby,
        }
    }

    /// Search nearby places, using the cache if available.
    pub async fn nearby_search(&self, query: &NearbyQuery) -> Result<Arc<Vec<Place>>, PlacesError> {
        let key = nearby_key(query);

        if let Some(cached) = self.nearby.get(&key).await {
            return Ok(cached);
        }

        let places = Arc::new(self.client.nearby_search(query).await?);

        // Results are fresh enough to seed the details cache too
        for place in places.iter() {
            self.details
                .insert(place.place_id.clone(), Arc::new(place.clone()))
                .await;
        }
        self.nearby.insert(key, places.clone()).await;

        Ok(places)
    }

    /// Resolve a place ID, using the cache if available.
    pub async fn place_details(&self, place_id: &PlaceId) -> Result<Arc<Place>, PlacesError> {
        if let Some(cached) = self.details.get(place_id).await {
            return Ok(cached);
        }

        let place = Arc::new(self.client.place_details(place_id).await?);
        self.details.insert(place_id.clone(), place.clone()).await;
        Ok(place)
    }
}
