//! In-memory trip store.
//!
//! Keeps the last saved trip in process memory. Useful for development
//! without a save endpoint, and for tests that need to observe or fail
//! saves.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;

use crate::domain::Place;

use super::TripStore;
use super::error::PersistenceError;

/// In-memory trip store with a failure switch.
///
/// Clones share the same underlying storage, so a test can keep a handle
/// while a [`crate::trip::TripManager`] owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryTripStore {
    saved: Arc<RwLock<Vec<Place>>>,
    saves: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
    delay: Option<Duration>,
}

impl MemoryTripStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a saved trip.
    pub fn with_saved(places: Vec<Place>) -> Self {
        Self {
            saved: Arc::new(RwLock::new(places)),
            ..Self::default()
        }
    }

    /// Make every save wait before completing.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of save calls received, including failed ones.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The last successfully saved stops.
    pub async fn saved(&self) -> Vec<Place> {
        self.saved.read().await.clone()
    }
}

impl TripStore for MemoryTripStore {
    async fn save(&self, stops: &[Place]) -> Result<(), PersistenceError> {
        self.saves.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(PersistenceError::Rejected(
                "memory store is set to fail".to_string(),
            ));
        }

        let mut saved = self.saved.write().await;
        *saved = stops.to_vec();
        Ok(())
    }

    async fn load(&self) -> Result<Vec<Place>, PersistenceError> {
        Ok(self.saved().await)
    }
}
