//! Provider place identifier type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when constructing an invalid place ID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid place ID: {reason}")]
pub struct InvalidPlaceId {
    reason: &'static str,
}

/// A place identifier assigned by the mapping provider.
///
/// Place IDs are opaque strings. They are the sole identity key for a stop
/// in a trip: two places with the same ID are the same place, regardless
/// of their display fields. The only validation is that they are non-empty
/// and free of surrounding whitespace.
///
/// # Examples
///
/// ```
/// use trip_server::domain::PlaceId;
///
/// let id = PlaceId::new("ChIJN1t_tDeuEmsRUsoyG83frY4").unwrap();
/// assert_eq!(id.as_str(), "ChIJN1t_tDeuEmsRUsoyG83frY4");
///
/// // Empty strings are rejected
/// assert!(PlaceId::new("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlaceId(String);

impl PlaceId {
    /// Create a new place ID.
    ///
    /// Returns an error if the string is empty or has leading/trailing
    /// whitespace.
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidPlaceId> {
        let s = s.into();
        if s.is_empty() {
            return Err(InvalidPlaceId {
                reason: "place ID cannot be empty",
            });
        }
        if s.trim() != s {
            return Err(InvalidPlaceId {
                reason: "place ID cannot have surrounding whitespace",
            });
        }
        Ok(PlaceId(s))
    }

    /// Returns the place ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlaceId {
    type Error = InvalidPlaceId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        PlaceId::new(s)
    }
}

impl From<PlaceId> for String {
    fn from(id: PlaceId) -> Self {
        id.0
    }
}

impl fmt::Debug for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlaceId({})", self.0)
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
