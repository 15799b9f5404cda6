//! Database repositories for data access layer
//
// Video records (ownership check + locator updates)
pub mod video;

pub use video::{PgVideoRepository, VideoRepository};
