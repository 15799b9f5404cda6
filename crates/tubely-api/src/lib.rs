//! Tubely API
//!
//! HTTP surface of the ingestion service: bearer authentication, the two upload
//! endpoints, the local assets directory and the server bootstrap.

pub mod auth;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;
pub mod utils;
