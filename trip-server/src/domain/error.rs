//! Trip error types.
//!
//! These errors represent rejected trip operations. A failed operation
//! never changes the trip. They are distinct from persistence and provider
//! errors, which live next to their clients.

use super::PlaceId;

/// A place was added to a trip that already contains it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("place {place_id} is already in the trip")]
pub struct DuplicateStop {
    pub place_id: PlaceId,
}

/// A place was removed from a trip that does not contain it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("place {place_id} is not in the trip")]
pub struct StopNotFound {
    pub place_id: PlaceId,
}

/// An index argument fell outside the trip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("index {index} is out of range for a trip of {len} stops")]
pub struct IndexOutOfRange {
    pub index: usize,
    pub len: usize,
}

/// Any rejected trip operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TripError {
    #[error(transparent)]
    Duplicate(#[from] DuplicateStop),

    #[error(transparent)]
    NotFound(#[from] StopNotFound),

    #[error(transparent)]
    OutOfRange(#[from] IndexOutOfRange),
}
