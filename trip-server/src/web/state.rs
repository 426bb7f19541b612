//! Application state for the web layer.

use std::sync::Arc;

use crate::persist::ConfiguredStore;
use crate::places::CachedPlacesClient;
use crate::trip::TripManager;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// The trip every request operates on
    pub trip: Arc<TripManager<ConfiguredStore>>,

    /// Cached Places API client
    pub places: Arc<CachedPlacesClient>,

    /// Base URL share links point at
    pub share_base_url: Arc<str>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        trip: TripManager<ConfiguredStore>,
        places: CachedPlacesClient,
        share_base_url: impl Into<String>,
    ) -> Self {
        Self {
            trip: Arc::new(trip),
            places: Arc::new(places),
            share_base_url: Arc::from(share_base_url.into()),
        }
    }
}
