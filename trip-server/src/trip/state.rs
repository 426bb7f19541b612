//! Trip state and its structural operations.
//!
//! [`Trip`] is plain data with validated mutations. It knows nothing about
//! locking, notification or persistence; [`super::TripManager`] wraps it
//! with those.

use serde::Serialize;

use crate::domain::{DuplicateStop, IndexOutOfRange, Place, PlaceId, StopNotFound};

use super::links;

/// An ordered, deduplicated collection of stops plus its save state.
///
/// `has_changes` is derived from two revision counters: `revision` moves on
/// every mutation of the stops, `persisted_revision` records the revision of
/// the last successful save. The trip is dirty whenever they differ.
#[derive(Debug, Clone, Default)]
pub struct Trip {
    stops: Vec<Place>,
    active_info: Option<usize>,
    is_saving: bool,
    revision: u64,
    persisted_revision: u64,
}

/// Work captured when a save starts.
#[derive(Debug, Clone)]
pub struct SaveTicket {
    /// Stops to hand to the persistence collaborator.
    pub stops: Vec<Place>,

    /// Revision those stops correspond to.
    pub revision: u64,
}

/// Read-only copy of a trip for renderers and subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripSnapshot {
    pub stops: Vec<Place>,
    pub has_changes: bool,
    pub is_saving: bool,
    pub active_info: Option<usize>,
    pub revision: u64,
}

impl Trip {
    /// Create an empty trip with nothing to save.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clean trip from previously persisted stops.
    ///
    /// Later duplicates of a place ID are dropped.
    pub fn from_persisted(stops: Vec<Place>) -> Self {
        Self {
            stops: dedup_by_id(stops),
            ..Self::default()
        }
    }

    pub fn stops(&self) -> &[Place] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Whether the stops differ from the last successfully persisted state.
    pub fn has_changes(&self) -> bool {
        self.revision != self.persisted_revision
    }

    /// Whether a persistence call is in flight.
    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    /// Index of the stop whose detail popup is open.
    pub fn active_info(&self) -> Option<usize> {
        self.active_info
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Position of a place in the trip.
    pub fn position(&self, place_id: &PlaceId) -> Option<usize> {
        self.stops.iter().position(|p| &p.place_id == place_id)
    }

    pub fn contains(&self, place_id: &PlaceId) -> bool {
        self.position(place_id).is_some()
    }

    /// Append a place to the end of the trip.
    pub fn add_stop(&mut self, place: Place) -> Result<(), DuplicateStop> {
        if self.contains(&place.place_id) {
            return Err(DuplicateStop {
                place_id: place.place_id,
            });
        }
        self.stops.push(place);
        self.touch();
        Ok(())
    }

    /// Remove a place from the trip, returning it.
    ///
    /// The open detail popup keeps pointing at the same logical stop, or is
    /// closed if that stop was the one removed.
    pub fn remove_stop(&mut self, place_id: &PlaceId) -> Result<Place, StopNotFound> {
        let index = self.position(place_id).ok_or_else(|| StopNotFound {
            place_id: place_id.clone(),
        })?;
        let removed = self.stops.remove(index);

        self.active_info = match self.active_info {
            Some(active) if active == index => None,
            Some(active) if active > index => Some(active - 1),
            other => other.filter(|&active| active < self.stops.len()),
        };

        self.touch();
        Ok(removed)
    }

    /// Move the stop at `from` to `to`, shifting the stops in between.
    ///
    /// This is a list move, not a swap: `[A, B, C, D]` with `reorder(0, 2)`
    /// becomes `[B, C, A, D]`.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), IndexOutOfRange> {
        let len = self.stops.len();
        for index in [from, to] {
            if index >= len {
                return Err(IndexOutOfRange { index, len });
            }
        }

        let active_id = self
            .active_info
            .map(|active| self.stops[active].place_id.clone());

        let moved = self.stops.remove(from);
        self.stops.insert(to, moved);

        if let Some(id) = active_id {
            self.active_info = self.position(&id);
        }

        self.touch();
        Ok(())
    }

    /// Open the detail popup for a stop, or close it with `None`.
    pub fn set_active_info(&mut self, index: Option<usize>) -> Result<(), IndexOutOfRange> {
        let len = self.stops.len();
        if let Some(index) = index.filter(|&i| i >= len) {
            return Err(IndexOutOfRange { index, len });
        }
        self.active_info = index;
        Ok(())
    }

    /// Replace the stops wholesale, e.g. from a share link.
    ///
    /// Later duplicates are dropped and the popup is closed. Counts as a
    /// mutation only if the sequence of place IDs actually changes.
    pub fn hydrate(&mut self, places: Vec<Place>) {
        let places = dedup_by_id(places);
        let same_order = places.len() == self.stops.len()
            && places
                .iter()
                .zip(&self.stops)
                .all(|(a, b)| a.place_id == b.place_id);

        self.stops = places;
        self.active_info = None;
        if !same_order {
            self.touch();
        }
    }

    /// Start a save, unless one is already in flight.
    pub fn begin_save(&mut self) -> Option<SaveTicket> {
        if self.is_saving {
            return None;
        }
        self.is_saving = true;
        Some(SaveTicket {
            stops: self.stops.clone(),
            revision: self.revision,
        })
    }

    /// Finish the in-flight save started at `revision`.
    ///
    /// Stops edited after the save started stay dirty even on success.
    pub fn finish_save(&mut self, revision: u64, succeeded: bool) {
        self.is_saving = false;
        if succeeded {
            self.persisted_revision = revision;
        }
    }

    /// Share link for this trip; see [`links::build_share_link`].
    pub fn share_link(&self, base_url: &str) -> String {
        links::build_share_link(base_url, &self.stops)
    }

    /// Navigation link for this trip; see [`links::build_external_route_link`].
    pub fn external_route_link(&self) -> String {
        links::build_external_route_link(&self.stops)
    }

    pub fn snapshot(&self) -> TripSnapshot {
        TripSnapshot {
            stops: self.stops.clone(),
            has_changes: self.has_changes(),
            is_saving: self.is_saving,
            active_info: self.active_info,
            revision: self.revision,
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

impl TripSnapshot {
    /// Whether the snapshot contains a place.
    pub fn contains(&self, place_id: &PlaceId) -> bool {
        self.stops.iter().any(|p| &p.place_id == place_id)
    }
}

fn dedup_by_id(places: Vec<Place>) -> Vec<Place> {
    let mut seen = std::collections::HashSet::new();
    places
        .into_iter()
        .filter(|p| seen.insert(p.place_id.clone()))
        .collect()
}
