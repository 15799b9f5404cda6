use std::path::Path;
use std::sync::Arc;
use tubely_core::models::{MediaKind, VideoRecord};
use tubely_core::AppError;
use tubely_db::VideoRepository;
use tubely_storage::{Storage, StorageReader};

use super::authorize::AuthorizedUpload;

/// Streams a finished local file to storage and records its URL on the video.
#[derive(Clone)]
pub struct Publisher {
    storage: Arc<dyn Storage>,
    repository: Arc<dyn VideoRepository>,
}

impl Publisher {
    pub fn new(storage: Arc<dyn Storage>, repository: Arc<dyn VideoRepository>) -> Self {
        Self {
            storage,
            repository,
        }
    }

    /// Upload `file` under `key`, then set the `kind` locator on the record.
    ///
    /// A failed upload leaves the record untouched. A failed record update after a
    /// successful upload leaves the object orphaned and returns `Persistence`.
    #[tracing::instrument(skip(self, upload, file), fields(
        video_id = %upload.video_id(),
        user_id = %upload.user_id(),
        key = %key,
        kind = %kind
    ))]
    pub async fn publish(
        &self,
        upload: &AuthorizedUpload,
        kind: MediaKind,
        key: &str,
        file: &Path,
        content_type: &str,
    ) -> Result<VideoRecord, AppError> {
        let start = std::time::Instant::now();

        let reader: StorageReader = Box::pin(tokio::fs::File::open(file).await.map_err(|e| {
            AppError::Internal(format!("Failed to open {}: {}", file.display(), e))
        })?);

        let url = self
            .storage
            .upload_stream(key, content_type, reader)
            .await?;

        let updated = match kind {
            MediaKind::Video => {
                self.repository
                    .update_video_url(upload.video_id(), upload.user_id(), &url)
                    .await
            }
            MediaKind::Thumbnail => {
                self.repository
                    .update_thumbnail_url(upload.video_id(), upload.user_id(), &url)
                    .await
            }
        };

        let record = updated.map_err(|e| {
            tracing::error!(
                error = %e,
                orphaned_key = %key,
                url = %url,
                "Stored object is not referenced by any record"
            );
            match e {
                AppError::Persistence(_) => e,
                other => AppError::Persistence(other.to_string()),
            }
        })?;

        tracing::info!(
            url = %url,
            storage_backend = %self.storage.backend_type(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Published"
        );

        Ok(record)
    }
}
