//! Validation modules

pub mod media_type;

pub use media_type::parse_media_type;
