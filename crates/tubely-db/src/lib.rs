//! Tubely Database Layer
//!
//! This crate provides the video metadata repository used by the ingestion pipelines.

pub mod db;

pub use db::{PgVideoRepository, VideoRepository};
