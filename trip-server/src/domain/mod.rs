//! Domain types for the trip planner.
//!
//! This module contains the validated place types the trip is built from
//! and the errors trip operations can fail with. All types enforce their
//! invariants at construction time, so code that receives these types can
//! trust their validity.

mod error;
mod location;
mod place;
mod place_id;

pub use error::{DuplicateStop, IndexOutOfRange, StopNotFound, TripError};
pub use location::{InvalidLocation, Location};
pub use place::Place;
pub use place_id::{InvalidPlaceId, PlaceId};
