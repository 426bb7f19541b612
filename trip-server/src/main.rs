use std::error::Error;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trip_server::config::ServerConfig;
use trip_server::places::{CachedPlacesClient, PlacesClient};
use trip_server::trip::TripManager;
use trip_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trip_server=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    // Pick up where the last saved trip left off; an unreachable store
    // shouldn't stop the planner from starting
    let store = config.store.build()?;
    info!(store = store.kind(), "Using trip store");
    let trip = match TripManager::resume(store.clone()).await {
        Ok(trip) => trip,
        Err(e) => {
            warn!(error = %e, "Could not load saved trip, starting empty");
            TripManager::new(store)
        }
    };

    let places_client = PlacesClient::new(config.places.clone())?;
    let places = CachedPlacesClient::new(places_client, &config.places_cache);

    let state = AppState::new(trip, places, config.share_base_url.clone());
    let app = create_router(state, &config.static_dir);

    let addr = config.bind_addr;
    info!("Trip Planner listening on http://{addr}");
    info!("API Endpoints:");
    info!("  GET    /api/trip                    - Current trip");
    info!("  POST   /api/trip/stops              - Add a place");
    info!("  DELETE /api/trip/stops/:place_id    - Remove a place");
    info!("  POST   /api/trip/reorder            - Move a place");
    info!("  POST   /api/trip/save               - Save the trip");
    info!("  GET    /api/trip/share              - Share link");
    info!("  GET    /api/places/nearby           - Search nearby places");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
