use bytes::Bytes;
use futures::Stream;
use std::path::PathBuf;
use std::sync::Arc;
use tubely_core::models::VideoRecord;
use tubely_core::{AppError, Config};
use tubely_db::VideoRepository;
use tubely_storage::Storage;
use uuid::Uuid;

use super::authorize::AuthorizedUpload;
use super::publish::Publisher;
use super::thumbnail_pipeline::ThumbnailPipeline;
use super::video_pipeline::VideoPipeline;
use crate::video::{GeometryProber, Remuxer};

/// Limits and scratch location shared by both pipelines.
#[derive(Debug, Clone)]
pub struct IngestSettings {
    pub scratch_dir: PathBuf,
    pub max_video_bytes: u64,
    pub max_thumbnail_bytes: u64,
}

impl IngestSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            scratch_dir: config.scratch_dir(),
            max_video_bytes: config.media.max_video_size_bytes,
            max_thumbnail_bytes: config.media.max_thumbnail_size_bytes,
        }
    }
}

/// Entry point for video and thumbnail uploads.
///
/// Callers first obtain an [`AuthorizedUpload`] with [`IngestService::authorize`] and
/// only then start reading the request body.
pub struct IngestService {
    repository: Arc<dyn VideoRepository>,
    video: VideoPipeline,
    thumbnail: ThumbnailPipeline,
}

impl IngestService {
    pub fn new(
        repository: Arc<dyn VideoRepository>,
        video_storage: Arc<dyn Storage>,
        thumbnail_storage: Arc<dyn Storage>,
        prober: Arc<dyn GeometryProber>,
        remuxer: Arc<dyn Remuxer>,
        settings: IngestSettings,
    ) -> Self {
        Self {
            video: VideoPipeline {
                prober,
                remuxer,
                publisher: Publisher::new(video_storage, repository.clone()),
                scratch_dir: settings.scratch_dir.clone(),
                max_bytes: settings.max_video_bytes,
            },
            thumbnail: ThumbnailPipeline {
                publisher: Publisher::new(thumbnail_storage, repository.clone()),
                scratch_dir: settings.scratch_dir,
                max_bytes: settings.max_thumbnail_bytes,
            },
            repository,
        }
    }

    /// Check that `user_id` owns `video_id`.
    pub async fn authorize(
        &self,
        video_id: Uuid,
        user_id: Uuid,
    ) -> Result<AuthorizedUpload, AppError> {
        AuthorizedUpload::check(self.repository.as_ref(), video_id, user_id).await
    }

    #[tracing::instrument(skip(self, upload, body), fields(
        video_id = %upload.video_id(),
        user_id = %upload.user_id()
    ))]
    pub async fn ingest_video<S>(
        &self,
        upload: AuthorizedUpload,
        content_type: &str,
        body: S,
    ) -> Result<VideoRecord, AppError>
    where
        S: Stream<Item = Result<Bytes, AppError>> + Send,
    {
        self.video.run(upload, content_type, body).await
    }

    #[tracing::instrument(skip(self, upload, body), fields(
        video_id = %upload.video_id(),
        user_id = %upload.user_id()
    ))]
    pub async fn ingest_thumbnail<S>(
        &self,
        upload: AuthorizedUpload,
        content_type: &str,
        body: S,
    ) -> Result<VideoRecord, AppError>
    where
        S: Stream<Item = Result<Bytes, AppError>> + Send,
    {
        self.thumbnail.run(upload, content_type, body).await
    }
}
