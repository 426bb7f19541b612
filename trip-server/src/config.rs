//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

use crate::persist::{
    ConfiguredStore, FileStoreConfig, FileTripStore, HttpStoreConfig, HttpTripStore,
    MemoryTripStore, PersistenceError,
};
use crate::places::{PlacesCacheConfig, PlacesConfig};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_STATIC_DIR: &str = "static";

/// Error returned when the environment holds an unusable value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}={value:?}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("TRIP_STORE=http requires TRIP_SAVE_URL")]
    MissingSaveUrl,
}

/// Where saved trips go.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Http(HttpStoreConfig),
    File(FileStoreConfig),
    Memory,
}

impl StoreConfig {
    /// Construct the store this config describes.
    pub fn build(&self) -> Result<ConfiguredStore, PersistenceError> {
        Ok(match self {
            StoreConfig::Http(config) => ConfiguredStore::Http(HttpTripStore::new(config.clone())?),
            StoreConfig::File(config) => ConfiguredStore::File(FileTripStore::new(config.clone())),
            StoreConfig::Memory => ConfiguredStore::Memory(MemoryTripStore::new()),
        })
    }
}

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
    /// Base URL share links point at
    pub share_base_url: String,
    pub places: PlacesConfig,
    pub places_cache: PlacesCacheConfig,
    pub store: StoreConfig,
}

impl ServerConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to read variables. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr: SocketAddr = parse_or(&var, "TRIP_BIND_ADDR", DEFAULT_BIND_ADDR)?;
        let static_dir = PathBuf::from(var("TRIP_STATIC_DIR").unwrap_or_else(|| {
            info!("TRIP_STATIC_DIR not set, using default: {DEFAULT_STATIC_DIR}");
            DEFAULT_STATIC_DIR.to_string()
        }));
        let share_base_url = var("TRIP_SHARE_BASE_URL")
            .unwrap_or_else(|| format!("http://{bind_addr}/"));

        let api_key = var("MAPS_API_KEY").unwrap_or_else(|| {
            warn!("MAPS_API_KEY not set. Place searches will fail.");
            String::new()
        });
        let places = PlacesConfig::new(api_key);

        let ttl_secs: u64 = parse_or(&var, "TRIP_PLACES_CACHE_TTL_SECS", "300")?;
        let places_cache = PlacesCacheConfig::default().with_ttl(Duration::from_secs(ttl_secs));

        let store = store_config(&var)?;

        Ok(Self {
            bind_addr,
            static_dir,
            share_base_url,
            places,
            places_cache,
            store,
        })
    }
}

fn store_config(var: &impl Fn(&str) -> Option<String>) -> Result<StoreConfig, ConfigError> {
    let url = var("TRIP_SAVE_URL");
    let http = |url: String| {
        let config = HttpStoreConfig::new(url);
        match var("TRIP_SAVE_TOKEN") {
            Some(token) => config.with_token(token),
            None => config,
        }
    };
    let file = || match var("TRIP_SAVE_PATH") {
        Some(path) => FileStoreConfig::new(path),
        None => FileStoreConfig::default(),
    };

    match var("TRIP_STORE").map(|s| s.to_ascii_lowercase()).as_deref() {
        None => Ok(match url {
            Some(url) => StoreConfig::Http(http(url)),
            None => StoreConfig::File(file()),
        }),
        Some("http") => url.map(|u| StoreConfig::Http(http(u))).ok_or(ConfigError::MissingSaveUrl),
        Some("file") => Ok(StoreConfig::File(file())),
        Some("memory") => Ok(StoreConfig::Memory),
        Some(other) => Err(ConfigError::InvalidValue {
            key: "TRIP_STORE",
            value: other.to_string(),
            reason: "expected http, file or memory".to_string(),
        }),
    }
}

fn parse_or<T>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        value: value.clone(),
        reason: e.to_string(),
    })
}
