//! Trip planner server.
//!
//! A web application for collecting places into an ordered trip, saving it,
//! sharing it as a link and opening it as a route in the maps provider.

pub mod config;
pub mod domain;
pub mod persist;
pub mod places;
pub mod trip;
pub mod web;
