//! Places API client.
//!
//! Nearby search and place-ID resolution against the hosted Places web
//! service, with conversion to domain [`Place`](crate::domain::Place)s and
//! an optional caching layer.

mod cache;
mod client;
mod convert;
mod error;
mod types;

pub use cache::{CachedPlacesClient, PlacesCacheConfig};
pub use client::{DEFAULT_RADIUS_M, MAX_RADIUS_M, NearbyQuery, PlacesClient, PlacesConfig};
pub use convert::{ConversionError, convert_place, convert_results};
pub use error::PlacesError;
pub use types::{Geometry, LatLng, NearbySearchResponse, PlaceDetailsResponse, PlaceResult};
