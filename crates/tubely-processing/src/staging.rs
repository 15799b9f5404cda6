//! Staging of an uploaded body into a local scratch file.

use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use std::io;
use std::path::Path;
use tempfile::TempPath;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio_util::io::StreamReader;
use tubely_core::constants::SCRATCH_FILE_PREFIX;
use tubely_core::AppError;

/// Raw uploaded bytes on local disk, owned by exactly one pipeline run.
///
/// The file is deleted when this value is dropped.
#[derive(Debug)]
pub struct StagedFile {
    path: TempPath,
    size: u64,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

fn into_app_error(err: io::Error, context: &str) -> AppError {
    // Errors raised by the body stream itself travel through the reader wrapped in io::Error.
    if err
        .get_ref()
        .is_some_and(|inner| inner.downcast_ref::<AppError>().is_some())
    {
        if let Some(inner) = err.into_inner() {
            if let Ok(app_err) = inner.downcast::<AppError>() {
                return *app_err;
            }
        }
        return AppError::Internal(context.to_string());
    }
    AppError::Internal(format!("{}: {}", context, err))
}

/// Copy `body` into a new file `tubely-*.{extension}` under `scratch_dir`.
///
/// Fails with `PayloadTooLarge` once more than `max_bytes` arrive. Errors yielded by the
/// stream are returned unchanged. On any failure the partial file is removed.
pub async fn stage<S>(
    body: S,
    extension: &str,
    scratch_dir: &Path,
    max_bytes: u64,
) -> Result<StagedFile, AppError>
where
    S: Stream<Item = Result<Bytes, AppError>> + Send,
{
    let temp = tempfile::Builder::new()
        .prefix(SCRATCH_FILE_PREFIX)
        .suffix(&format!(".{}", extension))
        .tempfile_in(scratch_dir)
        .map_err(|e| {
            AppError::Internal(format!(
                "Failed to create scratch file in {}: {}",
                scratch_dir.display(),
                e
            ))
        })?;
    let (file, path) = temp.into_parts();

    let body_with_io_error = body.map_err(io::Error::other);
    let body_reader = StreamReader::new(body_with_io_error);
    futures::pin_mut!(body_reader);
    let mut limited = body_reader.take(max_bytes.saturating_add(1));

    let mut writer = BufWriter::new(tokio::fs::File::from_std(file));
    let size = tokio::io::copy(&mut limited, &mut writer)
        .await
        .map_err(|e| into_app_error(e, "Failed to stage upload"))?;

    if size > max_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_bytes / 1024 / 1024
        )));
    }

    writer
        .flush()
        .await
        .map_err(|e| into_app_error(e, "Failed to flush staged upload"))?;
    writer
        .into_inner()
        .sync_all()
        .await
        .map_err(|e| into_app_error(e, "Failed to sync staged upload"))?;

    tracing::debug!(
        path = %path.display(),
        size_bytes = size,
        "Upload staged"
    );

    Ok(StagedFile { path, size })
}
