//! HTTP route handlers.

use std::path::Path;

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path as UrlPath, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post, put},
};
use futures::future::join_all;
use tower_http::services::ServeDir;
use tracing::{error, warn};

use crate::domain::{
    DuplicateStop, IndexOutOfRange, Location, Place, StopNotFound, TripError,
};
use crate::persist::PersistenceError;
use crate::places::{NearbyQuery, PlacesError};
use crate::trip::{
    ShareLinkError, TripSnapshot, build_external_route_link, build_share_link, parse_share_link,
};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(trip_page))
        .route("/health", get(health))
        .route("/api/trip", get(get_trip))
        .route("/api/trip/stops", post(add_stop))
        .route("/api/trip/stops/:place_id", delete(remove_stop))
        .route("/api/trip/reorder", post(reorder))
        .route("/api/trip/active", put(set_active_info))
        .route("/api/trip/save", post(save_trip))
        .route("/api/trip/share", get(share_link))
        .route("/api/trip/route-link", get(route_link))
        .route("/api/trip/hydrate", post(hydrate))
        .route("/api/places/nearby", get(nearby_places))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Build the view of a snapshot, links included.
///
/// Links come from the snapshot rather than the live trip so the page is
/// consistent even if another command lands while rendering.
fn trip_view(state: &AppState, snapshot: &TripSnapshot) -> TripView {
    TripView::new(
        snapshot,
        build_share_link(&state.share_base_url, &snapshot.stops),
        build_external_route_link(&snapshot.stops),
    )
}

fn render(template: &impl Template) -> Result<Html<String>, AppError> {
    template.render().map(Html).map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })
}

/// Trip planner page.
async fn trip_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let snapshot = state.trip.snapshot();
    render(&TripPageTemplate {
        trip: trip_view(&state, &snapshot),
    })
}

/// Current trip, as JSON or as the panel fragment.
async fn get_trip(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    let snapshot = state.trip.snapshot();

    if accepts_html(&headers) {
        let html = render(&TripPanelTemplate {
            trip: trip_view(&state, &snapshot),
        })?;
        Ok(html.into_response())
    } else {
        Ok(Json(snapshot).into_response())
    }
}

/// Append a place to the trip.
async fn add_stop(
    State(state): State<AppState>,
    Json(place): Json<Place>,
) -> Result<Json<TripSnapshot>, AppError> {
    let snapshot = state.trip.add_stop(place)?;
    Ok(Json(snapshot))
}

/// Remove a place from the trip.
async fn remove_stop(
    State(state): State<AppState>,
    UrlPath(raw_id): UrlPath<String>,
) -> Result<Json<TripSnapshot>, AppError> {
    let place_id = path_place_id(&raw_id).map_err(|message| AppError::BadRequest { message })?;
    let snapshot = state.trip.remove_stop(&place_id)?;
    Ok(Json(snapshot))
}

/// Move a stop to a new position.
async fn reorder(
    State(state): State<AppState>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<TripSnapshot>, AppError> {
    let snapshot = state.trip.reorder(req.from, req.to)?;
    Ok(Json(snapshot))
}

/// Open or close a stop's detail popup.
async fn set_active_info(
    State(state): State<AppState>,
    Json(req): Json<ActiveInfoRequest>,
) -> Result<Json<TripSnapshot>, AppError> {
    let snapshot = state.trip.set_active_info(req.index)?;
    Ok(Json(snapshot))
}

/// Persist the trip.
async fn save_trip(State(state): State<AppState>) -> Result<Json<SaveResponse>, AppError> {
    let report = state.trip.save().await?;
    Ok(Json(SaveResponse {
        outcome: report.outcome.into(),
        trip: report.trip,
    }))
}

/// Share link for the current trip.
async fn share_link(
    State(state): State<AppState>,
    Query(query): Query<ShareQuery>,
) -> Json<LinkResponse> {
    let base_url = query
        .base_url
        .as_deref()
        .filter(|b| !b.trim().is_empty())
        .unwrap_or(&*state.share_base_url);

    Json(LinkResponse {
        url: state.trip.build_share_link(base_url),
    })
}

/// Provider directions link for the current trip.
async fn route_link(State(state): State<AppState>) -> Json<LinkResponse> {
    Json(LinkResponse {
        url: state.trip.build_external_route_link(),
    })
}

/// Replace the trip with the places in a share link.
///
/// IDs already in the trip are taken from it; the rest are resolved through
/// the Places API concurrently. IDs that cannot be resolved are skipped and
/// reported back. If none resolve the trip is left alone.
async fn hydrate(
    State(state): State<AppState>,
    Json(req): Json<HydrateRequest>,
) -> Result<Json<HydrateResponse>, AppError> {
    let ids = parse_share_link(&req.link)?;
    if ids.is_empty() {
        return Err(AppError::BadRequest {
            message: "share link contains no places".to_string(),
        });
    }

    let current = state.trip.snapshot();
    let places_client = &state.places;

    let lookups = ids.iter().map(|id| {
        let known = current.stops.iter().find(|p| &p.place_id == id).cloned();
        async move {
            match known {
                Some(place) => Ok(place),
                None => places_client
                    .place_details(id)
                    .await
                    .map(|place| (*place).clone()),
            }
        }
    });
    let results = join_all(lookups).await;

    let mut places = Vec::with_capacity(ids.len());
    let mut skipped = Vec::new();
    let mut provider_failures = 0;
    for (id, result) in ids.iter().zip(results) {
        match result {
            Ok(place) => places.push(place),
            Err(e) => {
                warn!(place_id = %id, error = %e, "Skipping unresolvable place in share link");
                if !matches!(
                    e,
                    PlacesError::NotFound { .. } | PlacesError::InvalidRequest { .. }
                ) {
                    provider_failures += 1;
                }
                skipped.push(id.to_string());
            }
        }
    }

    if places.is_empty() {
        let message = format!(
            "none of the places in the share link could be resolved: {}",
            skipped.join(", ")
        );
        return Err(if provider_failures == skipped.len() {
            AppError::BadGateway { message }
        } else {
            AppError::BadRequest { message }
        });
    }

    let trip = state.trip.hydrate(places);

    Ok(Json(HydrateResponse { trip, skipped }))
}

/// Search for places near a point.
async fn nearby_places(
    State(state): State<AppState>,
    Query(req): Query<NearbyRequest>,
) -> Result<Json<NearbyResponse>, AppError> {
    let location = Location::new(req.lat, req.lng).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    let mut query = NearbyQuery::new(location);
    if let Some(radius) = req.radius {
        query = query.with_radius(radius);
    }
    if let Some(keyword) = req.keyword {
        query = query.with_keyword(keyword);
    }
    if let Some(category) = req.category {
        query = query.with_category(category);
    }

    let results = state.places.nearby_search(&query).await?;

    let trip = state.trip.snapshot();
    let places = results
        .iter()
        .map(|place| SearchResult::new(place.clone(), &trip))
        .collect();

    Ok(Json(NearbyResponse { places }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl From<DuplicateStop> for AppError {
    fn from(e: DuplicateStop) -> Self {
        AppError::Conflict {
            message: e.to_string(),
        }
    }
}

impl From<StopNotFound> for AppError {
    fn from(e: StopNotFound) -> Self {
        AppError::NotFound {
            message: e.to_string(),
        }
    }
}

impl From<IndexOutOfRange> for AppError {
    fn from(e: IndexOutOfRange) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<TripError> for AppError {
    fn from(e: TripError) -> Self {
        match e {
            TripError::Duplicate(e) => e.into(),
            TripError::NotFound(e) => e.into(),
            TripError::OutOfRange(e) => e.into(),
        }
    }
}

impl From<PersistenceError> for AppError {
    fn from(e: PersistenceError) -> Self {
        AppError::BadGateway {
            message: format!("Save failed: {}", e),
        }
    }
}

impl From<PlacesError> for AppError {
    fn from(e: PlacesError) -> Self {
        match e {
            PlacesError::NotFound { .. } => AppError::NotFound {
                message: e.to_string(),
            },
            PlacesError::InvalidRequest { .. } => AppError::BadRequest {
                message: e.to_string(),
            },
            _ => AppError::BadGateway {
                message: e.to_string(),
            },
        }
    }
}

impl From<ShareLinkError> for AppError {
    fn from(e: ShareLinkError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), %message, "Request failed");
        } else {
            warn!(status = status.as_u16(), %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
