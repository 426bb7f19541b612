//! Shared trip manager.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::{DuplicateStop, IndexOutOfRange, Place, PlaceId, StopNotFound};
use crate::persist::{PersistenceError, TripStore};

use super::state::{Trip, TripSnapshot};

/// What a call to [`TripManager::save`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The stops were handed to the store and it accepted them.
    Saved,
    /// Another save was already in flight; nothing was sent.
    AlreadySaving,
}

/// Result of a call to [`TripManager::save`].
#[derive(Debug, Clone, PartialEq)]
pub struct SaveReport {
    pub outcome: SaveOutcome,
    /// Snapshot published when the save settled.
    pub trip: TripSnapshot,
}

/// Owner of the trip.
///
/// Every mutation goes through here. Mutations take a short lock, apply a
/// validated change to the [`Trip`] and publish a fresh snapshot before the
/// lock is released, so subscribers see changes in the order they were
/// made. The lock is never held across the persistence call.
pub struct TripManager<S> {
    trip: Mutex<Trip>,
    store: S,
    changes: watch::Sender<TripSnapshot>,
}

impl<S: TripStore> TripManager<S> {
    /// Create a manager with an empty trip.
    pub fn new(store: S) -> Self {
        Self::with_trip(store, Trip::new())
    }

    /// Create a manager around an existing trip.
    pub fn with_trip(store: S, trip: Trip) -> Self {
        let (changes, _) = watch::channel(trip.snapshot());
        Self {
            trip: Mutex::new(trip),
            store,
            changes,
        }
    }

    /// Create a manager holding the store's last saved trip.
    pub async fn resume(store: S) -> Result<Self, PersistenceError> {
        let stops = store.load().await?;
        info!(stops = stops.len(), "Resumed saved trip");
        Ok(Self::with_trip(store, Trip::from_persisted(stops)))
    }

    /// Current state of the trip.
    pub fn snapshot(&self) -> TripSnapshot {
        self.lock().snapshot()
    }

    /// Receive a snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<TripSnapshot> {
        self.changes.subscribe()
    }

    // Each mutator returns the snapshot it published, taken under the same
    // lock as the change itself.

    /// Append a place to the trip.
    pub fn add_stop(&self, place: Place) -> Result<TripSnapshot, DuplicateStop> {
        let mut trip = self.lock();
        let place_id = place.place_id.clone();
        trip.add_stop(place)?;
        debug!(place_id = %place_id, stops = trip.len(), "Stop added");
        Ok(self.publish(&trip))
    }

    /// Remove a place from the trip.
    pub fn remove_stop(&self, place_id: &PlaceId) -> Result<TripSnapshot, StopNotFound> {
        let mut trip = self.lock();
        trip.remove_stop(place_id)?;
        debug!(place_id = %place_id, stops = trip.len(), "Stop removed");
        Ok(self.publish(&trip))
    }

    /// Move the stop at `from` to `to`.
    pub fn reorder(&self, from: usize, to: usize) -> Result<TripSnapshot, IndexOutOfRange> {
        let mut trip = self.lock();
        trip.reorder(from, to)?;
        debug!(from, to, "Stops reordered");
        Ok(self.publish(&trip))
    }

    /// Open a stop's detail popup, or close it with `None`.
    pub fn set_active_info(&self, index: Option<usize>) -> Result<TripSnapshot, IndexOutOfRange> {
        let mut trip = self.lock();
        trip.set_active_info(index)?;
        Ok(self.publish(&trip))
    }

    /// Replace the trip with the given places.
    pub fn hydrate(&self, places: Vec<Place>) -> TripSnapshot {
        let mut trip = self.lock();
        trip.hydrate(places);
        info!(stops = trip.len(), "Trip hydrated");
        self.publish(&trip)
    }

    /// Share link for the current trip.
    pub fn build_share_link(&self, base_url: &str) -> String {
        self.lock().share_link(base_url)
    }

    /// Provider navigation link for the current trip.
    pub fn build_external_route_link(&self) -> String {
        self.lock().external_route_link()
    }

    /// Persist the current stops.
    ///
    /// Returns immediately with [`SaveOutcome::AlreadySaving`] if a save is
    /// in flight. On failure the trip stays dirty; there is no automatic
    /// retry.
    pub async fn save(&self) -> Result<SaveReport, PersistenceError> {
        let ticket = {
            let mut trip = self.lock();
            match trip.begin_save() {
                Some(ticket) => {
                    self.publish(&trip);
                    ticket
                }
                None => {
                    debug!("Save already in flight, skipping");
                    return Ok(SaveReport {
                        outcome: SaveOutcome::AlreadySaving,
                        trip: trip.snapshot(),
                    });
                }
            }
        };

        let in_flight = InFlightSave {
            manager: self,
            revision: ticket.revision,
            finished: false,
        };

        let result = self.store.save(&ticket.stops).await;
        let trip = in_flight.finish(result.is_ok());

        match result {
            Ok(()) => {
                info!(
                    stops = ticket.stops.len(),
                    revision = ticket.revision,
                    "Trip saved"
                );
                Ok(SaveReport {
                    outcome: SaveOutcome::Saved,
                    trip,
                })
            }
            Err(e) => {
                warn!(error = %e, "Trip save failed");
                Err(e)
            }
        }
    }
}

impl<S> TripManager<S> {
    fn lock(&self) -> MutexGuard<'_, Trip> {
        // Trip mutations validate before touching state, so a poisoned
        // lock still guards a consistent trip.
        self.trip.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, trip: &Trip) -> TripSnapshot {
        let snapshot = trip.snapshot();
        self.changes.send_replace(snapshot.clone());
        snapshot
    }
}

/// Clears the saving flag when the store call settles, or when dropped if
/// the save future is cancelled mid-flight.
struct InFlightSave<'a, S> {
    manager: &'a TripManager<S>,
    revision: u64,
    finished: bool,
}

impl<S> InFlightSave<'_, S> {
    fn finish(mut self, succeeded: bool) -> TripSnapshot {
        self.finished = true;
        self.settle(succeeded)
    }

    fn settle(&self, succeeded: bool) -> TripSnapshot {
        let mut trip = self.manager.lock();
        trip.finish_save(self.revision, succeeded);
        self.manager.publish(&trip)
    }
}

impl<S> Drop for InFlightSave<'_, S> {
    fn drop(&mut self) {
        if !self.finished {
            self.settle(false);
        }
    }
}
