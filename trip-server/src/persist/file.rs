//! Disk-based trip store.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::Place;

use super::TripStore;
use super::error::PersistenceError;
use super::record::TripRecord;

/// Configuration for the file trip store.
#[derive(Debug, Clone)]
pub struct FileStoreConfig {
    /// Path to the trip file.
    pub path: PathBuf,
}

impl FileStoreConfig {
    /// Create a new config writing to the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        // Default to a trip file in the current directory
        Self::new("trip.json")
    }
}

/// Trip store that keeps the last saved trip in a JSON file.
#[derive(Debug, Clone)]
pub struct FileTripStore {
    config: FileStoreConfig,
}

impl FileTripStore {
    /// Create a new file store with the given config.
    pub fn new(config: FileStoreConfig) -> Self {
        Self { config }
    }

    /// Get the trip file path.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Read the full record, including when it was saved.
    ///
    /// Returns `Ok(None)` if nothing has been saved yet.
    pub async fn load_record(&self) -> Result<Option<TripRecord>, PersistenceError> {
        let contents = match tokio::fs::read_to_string(&self.config.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PersistenceError::Io {
                    message: format!("failed to read trip file: {}", e),
                });
            }
        };

        let record = serde_json::from_str(&contents).map_err(|e| PersistenceError::Json {
            message: format!("failed to parse trip file: {}", e),
        })?;

        Ok(Some(record))
    }
}

impl Default for FileTripStore {
    fn default() -> Self {
        Self::new(FileStoreConfig::default())
    }
}

impl TripStore for FileTripStore {
    /// Write the stops, creating parent directories if they don't exist.
    async fn save(&self, stops: &[Place]) -> Result<(), PersistenceError> {
        let record = TripRecord::now(stops);

        if let Some(parent) = self
            .config
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PersistenceError::Io {
                    message: format!("failed to create trip directory: {}", e),
                })?;
        }

        let json = serde_json::to_string_pretty(&record).map_err(|e| PersistenceError::Json {
            message: format!("failed to serialize trip: {}", e),
        })?;

        tokio::fs::write(&self.config.path, json)
            .await
            .map_err(|e| PersistenceError::Io {
                message: format!("failed to write trip file: {}", e),
            })?;

        debug!(path = %self.config.path.display(), stops = stops.len(), "Trip saved to file");
        Ok(())
    }

    async fn load(&self) -> Result<Vec<Place>, PersistenceError> {
        Ok(self
            .load_record()
            .await?
            .map(|record| record.places)
            .unwrap_or_default())
    }
}
