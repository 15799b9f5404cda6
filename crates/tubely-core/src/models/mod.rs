//! Data models for the ingestion service
//!
//! Each sub-module represents a specific feature area.

mod media;
mod orientation;
mod video;

pub use media::MediaKind;
pub use orientation::Orientation;
pub use video::VideoRecord;
