//! Geometry probe - width/height of the first stream via ffprobe

use crate::error::{ProcessingError, ToolStage};
use crate::tool::{run_tool, validate_tool_path};
use async_trait::async_trait;
use serde::Deserialize;
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

/// Width and height of one media stream, both positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
}

/// Reports the geometry of a local media file.
#[async_trait]
pub trait GeometryProber: Send + Sync {
    async fn probe_geometry(&self, path: &Path) -> Result<Geometry, ProcessingError>;
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
}

/// Decode ffprobe's `-print_format json -show_streams` output.
///
/// Only the first stream is consulted; it must carry a non-zero width and height.
pub fn parse_probe_output(stdout: &[u8]) -> Result<Geometry, ProcessingError> {
    let output: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| ProcessingError::MalformedProbeOutput(e.to_string()))?;

    let stream = output
        .streams
        .first()
        .ok_or_else(|| ProcessingError::MalformedProbeOutput("no streams found".to_string()))?;

    match (stream.width, stream.height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => Ok(Geometry { width, height }),
        (width, height) => Err(ProcessingError::MalformedProbeOutput(format!(
            "first stream has no usable geometry (width: {:?}, height: {:?})",
            width, height
        ))),
    }
}

/// `GeometryProber` backed by the ffprobe binary.
pub struct FfprobeProber {
    ffprobe_path: String,
    timeout: Duration,
}

impl FfprobeProber {
    pub fn new(ffprobe_path: String, timeout: Duration) -> Result<Self, ProcessingError> {
        validate_tool_path(&ffprobe_path)?;
        Ok(Self {
            ffprobe_path,
            timeout,
        })
    }
}

#[async_trait]
impl GeometryProber for FfprobeProber {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn probe_geometry(&self, path: &Path) -> Result<Geometry, ProcessingError> {
        let start = std::time::Instant::now();

        let args = [
            OsStr::new("-v"),
            OsStr::new("error"),
            OsStr::new("-print_format"),
            OsStr::new("json"),
            OsStr::new("-show_streams"),
            path.as_os_str(),
        ];
        let output = run_tool(ToolStage::Probe, &self.ffprobe_path, args, self.timeout).await?;
        let geometry = parse_probe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            width = geometry.width,
            height = geometry.height,
            "Video probe completed"
        );

        Ok(geometry)
    }
}
