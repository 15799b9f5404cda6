//! Faststart remux - moves the moov atom to the front without re-encoding

use crate::error::{ProcessingError, ToolStage};
use crate::tool::{run_tool, validate_tool_path};
use async_trait::async_trait;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempPath;

/// Remuxed copy of a staged upload. Deleted when dropped.
#[derive(Debug)]
pub struct OptimizedFile {
    path: TempPath,
}

impl OptimizedFile {
    /// Take ownership of `path`; whatever is there gets removed on drop.
    pub fn new(path: PathBuf) -> Result<Self, ProcessingError> {
        let path = TempPath::try_from_path(path).map_err(ProcessingError::ScratchFile)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `{input}.processing`
pub fn optimized_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".processing");
    PathBuf::from(name)
}

/// Rewrites a local media file for progressive playback.
#[async_trait]
pub trait Remuxer: Send + Sync {
    async fn remux(&self, input: &Path) -> Result<OptimizedFile, ProcessingError>;
}

/// `Remuxer` backed by the ffmpeg binary.
pub struct FfmpegRemuxer {
    ffmpeg_path: String,
    timeout: Duration,
}

impl FfmpegRemuxer {
    pub fn new(ffmpeg_path: String, timeout: Duration) -> Result<Self, ProcessingError> {
        validate_tool_path(&ffmpeg_path)?;
        Ok(Self {
            ffmpeg_path,
            timeout,
        })
    }
}

#[async_trait]
impl Remuxer for FfmpegRemuxer {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    async fn remux(&self, input: &Path) -> Result<OptimizedFile, ProcessingError> {
        let start = std::time::Instant::now();
        // Owned before ffmpeg starts so a partial output is removed on every failure.
        let output = OptimizedFile::new(optimized_path(input))?;

        let args = [
            OsStr::new("-y"),
            OsStr::new("-i"),
            input.as_os_str(),
            OsStr::new("-c"),
            OsStr::new("copy"),
            OsStr::new("-movflags"),
            OsStr::new("faststart"),
            OsStr::new("-f"),
            OsStr::new("mp4"),
            output.path().as_os_str(),
        ];
        run_tool(ToolStage::Remux, &self.ffmpeg_path, args, self.timeout).await?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            output = %output.path().display(),
            "Faststart remux completed"
        );

        Ok(output)
    }
}
