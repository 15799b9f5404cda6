//! Tubely Media Processing Library
//!
//! Ingestion pipelines for videos and thumbnails: staging of the uploaded body, geometry
//! probing and aspect classification, faststart remuxing, and publishing to storage.

pub mod error;
pub mod staging;
mod tool;
pub mod upload;
pub mod video;

// Re-export commonly used types
pub use error::{ProcessingError, ToolStage};
pub use staging::{stage, StagedFile};
pub use upload::{AuthorizedUpload, IngestService, IngestSettings, Publisher};
pub use video::{
    parse_probe_output, AspectRatio, FfmpegRemuxer, FfprobeProber, Geometry, GeometryProber,
    OptimizedFile, Remuxer,
};
