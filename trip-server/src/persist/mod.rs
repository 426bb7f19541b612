//! Trip persistence collaborators.
//!
//! The trip manager hands its stops to a [`TripStore`] and only cares
//! whether the save succeeded. Stores decide the transport: a remote HTTP
//! endpoint, a local JSON file, or process memory.

mod error;
mod file;
mod http;
mod memory;
mod record;

use std::future::Future;

use crate::domain::Place;

pub use error::PersistenceError;
pub use file::{FileStoreConfig, FileTripStore};
pub use http::{HttpStoreConfig, HttpTripStore};
pub use memory::MemoryTripStore;
pub use record::TripRecord;

/// Something that can durably store a trip.
pub trait TripStore: Send + Sync {
    /// Persist the stops, in order, replacing any previously saved trip.
    fn save(&self, stops: &[Place]) -> impl Future<Output = Result<(), PersistenceError>> + Send;

    /// Fetch the last saved stops. Empty if nothing has been saved.
    fn load(&self) -> impl Future<Output = Result<Vec<Place>, PersistenceError>> + Send;
}

/// The store selected by configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredStore {
    Http(HttpTripStore),
    File(FileTripStore),
    Memory(MemoryTripStore),
}

impl ConfiguredStore {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ConfiguredStore::Http(_) => "http",
            ConfiguredStore::File(_) => "file",
            ConfiguredStore::Memory(_) => "memory",
        }
    }
}

impl TripStore for ConfiguredStore {
    async fn save(&self, stops: &[Place]) -> Result<(), PersistenceError> {
        match self {
            ConfiguredStore::Http(store) => store.save(stops).await,
            ConfiguredStore::File(store) => store.save(stops).await,
            ConfiguredStore::Memory(store) => store.save(stops).await,
        }
    }

    async fn load(&self) -> Result<Vec<Place>, PersistenceError> {
        match self {
            ConfiguredStore::Http(store) => store.load().await,
            ConfiguredStore::File(store) => store.load().await,
            ConfiguredStore::Memory(store) => store.load().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Location, PlaceId};

    #[tokio::test]
    async fn configured_store_dispatches() {
        let memory = MemoryTripStore::new();
        let store = ConfiguredStore::Memory(memory.clone());
        assert_eq!(store.kind(), "memory");

        let place = Place::new(
            PlaceId::new("p1").unwrap(),
            "One",
            "",
            Location::new(1.0, 2.0).unwrap(),
        );
        store.save(std::slice::from_ref(&place)).await.unwrap();

        assert_eq!(memory.save_count(), 1);
        assert_eq!(store.load().await.unwrap(), vec![place]);
    }
}
