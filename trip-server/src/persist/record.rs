//! Persisted trip record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Place;

/// What a store writes for a saved trip.
///
/// Stops are stored as full place records in trip order, so a trip can be
/// restored without going back to the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    /// When the trip was saved.
    pub saved_at: DateTime<Utc>,

    /// The stops, in order.
    pub places: Vec<Place>,
}

impl TripRecord {
    /// Stamp the given stops with the current time.
    pub fn now(places: &[Place]) -> Self {
        Self {
            saved_at: Utc::now(),
            places: places.to_vec(),
        }
    }
}
