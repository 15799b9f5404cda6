//! Running ffprobe / ffmpeg as child processes.

use crate::error::{ProcessingError, ToolStage};
use std::ffi::OsStr;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

/// Validate that a tool path doesn't contain shell metacharacters or dangerous sequences
pub(crate) fn validate_tool_path(path: &str) -> Result<(), ProcessingError> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.is_empty() || path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(ProcessingError::InvalidToolPath(path.to_string()));
    }

    if path.contains("..") {
        return Err(ProcessingError::InvalidToolPath(path.to_string()));
    }

    if !path
        .chars()
        .all(|c| c.is_alphanumeric() || c == '/' || c == '-' || c == '_' || c == '.' || c == '\\')
    {
        return Err(ProcessingError::InvalidToolPath(path.to_string()));
    }

    Ok(())
}

/// Run `program` to completion, capturing stdout and stderr.
///
/// The child is killed when the timeout fires or the calling future is dropped.
/// A non-zero exit is returned as `ToolFailed` with stderr in the message.
pub(crate) async fn run_tool<I, S>(
    stage: ToolStage,
    program: &str,
    args: I,
    timeout: Duration,
) -> Result<Output, ProcessingError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| ProcessingError::ToolFailed {
            stage,
            message: format!("Failed to execute {}: {}", program, e),
        })?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| ProcessingError::ToolFailed {
            stage,
            message: format!("Failed to wait for {}: {}", program, e),
        })?,
        Err(_) => {
            tracing::warn!(
                process.executable.name = %program,
                timeout_secs = timeout.as_secs(),
                "External tool timed out, killing"
            );
            return Err(ProcessingError::Timeout {
                stage,
                seconds: timeout.as_secs(),
            });
        }
    };

    if !output.status.success() {
        return Err(ProcessingError::ToolFailed {
            stage,
            message: format!(
                "{} exited with {}: {}",
                program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    Ok(output)
}

/// Write an executable `/bin/sh` script named `name` into `dir` and return its path.
#[cfg(all(test, unix))]
pub(crate) fn write_stub_tool(dir: &std::path::Path, name: &str, body: &str) -> String {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.to_string_lossy().into_owned()
}

/// Lines of the `argv` file a stub tool wrote next to itself.
#[cfg(all(test, unix))]
pub(crate) fn recorded_argv(dir: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(dir.join("argv"))
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

/// Shell line that records every argument, one per line, into `argv` beside the script.
#[cfg(all(test, unix))]
pub(crate) const RECORD_ARGV: &str = r#"printf '%s\n' "$@" > "$(dirname "$0")/argv""#;
