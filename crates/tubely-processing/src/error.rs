use std::fmt::{Display, Formatter, Result as FmtResult};
use thiserror::Error;
use tubely_core::AppError;

/// Which external tool invocation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStage {
    Probe,
    Remux,
}

impl Display for ToolStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ToolStage::Probe => write!(f, "probe"),
            ToolStage::Remux => write!(f, "remux"),
        }
    }
}

/// Errors from the external media tools
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("{stage} failed: {message}")]
    ToolFailed { stage: ToolStage, message: String },

    #[error("{stage} timed out after {seconds}s")]
    Timeout { stage: ToolStage, seconds: u64 },

    #[error("Malformed probe output: {0}")]
    MalformedProbeOutput(String),

    #[error("Invalid tool path: {0}")]
    InvalidToolPath(String),

    #[error("Scratch file error: {0}")]
    ScratchFile(#[source] std::io::Error),
}

impl ProcessingError {
    fn stage(&self) -> Option<ToolStage> {
        match self {
            ProcessingError::ToolFailed { stage, .. } | ProcessingError::Timeout { stage, .. } => {
                Some(*stage)
            }
            ProcessingError::MalformedProbeOutput(_) => Some(ToolStage::Probe),
            ProcessingError::InvalidToolPath(_) | ProcessingError::ScratchFile(_) => None,
        }
    }
}

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        match err.stage() {
            Some(ToolStage::Probe) => AppError::Probe(err.to_string()),
            Some(ToolStage::Remux) => AppError::Processing(err.to_string()),
            None => AppError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubely_core::ErrorMetadata;

    #[test]
    fn test_stage_decides_error_code() {
        let probe: AppError = ProcessingError::Timeout {
            stage: ToolStage::Probe,
            seconds: 30,
        }
        .into();
        assert_eq!(probe.error_code(), "PROBE_ERROR");

        let remux: AppError = ProcessingError::ToolFailed {
            stage: ToolStage::Remux,
            message: "moov atom not found".to_string(),
        }
        .into();
        assert_eq!(remux.error_code(), "PROCESSING_ERROR");
        assert_eq!(remux.client_message(), "Error processing video for fast start");

        let malformed: AppError = ProcessingError::MalformedProbeOutput("eof".to_string()).into();
        assert_eq!(malformed.error_code(), "PROBE_ERROR");

        let path: AppError = ProcessingError::InvalidToolPath("ff;rm".to_string()).into();
        assert_eq!(path.error_code(), "INTERNAL_ERROR");

        let scratch: AppError = ProcessingError::ScratchFile(std::io::Error::other("cwd gone")).into();
        assert_eq!(scratch.error_code(), "INTERNAL_ERROR");
    }
}
