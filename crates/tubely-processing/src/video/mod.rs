//! Video inspection and optimization: geometry probe, aspect classification, faststart remux.

pub mod aspect;
pub mod probe;
pub mod remux;

pub use aspect::AspectRatio;
pub use probe::{parse_probe_output, FfprobeProber, Geometry, GeometryProber};
pub use remux::{FfmpegRemuxer, OptimizedFile, Remuxer};
