//! Web layer for the trip planner.
//!
//! Every user gesture maps to one HTTP command on the shared trip. The page
//! is rendered server-side; commands answer with a fresh snapshot.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
