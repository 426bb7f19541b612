//! Trip management.
//!
//! A trip is an ordered, deduplicated list of places the user wants to
//! visit. Order matters: it is the route order and the numbering shown on
//! the map. The manager tracks whether the trip has unsaved changes and
//! makes sure only one save is in flight at a time.

pub mod links;
mod manager;
mod state;

pub use links::{ShareLinkError, build_external_route_link, build_share_link, parse_share_link};
pub use manager::{SaveOutcome, SaveReport, TripManager};
pub use state::{SaveTicket, Trip, TripSnapshot};

#[cfg(test)]
mod manager_tests;
