use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use tubely_core::models::VideoRecord;
use tubely_core::AppError;
use uuid::Uuid;

/// Metadata store operations used by the upload pipelines.
///
/// Records are created elsewhere; this layer only reads them and sets locators. Both
/// updates carry the owner as a precondition, so a record that changed hands between
/// the ownership check and the update is left alone.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Get a video record by ID
    async fn get_video(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError>;

    /// Set `video_url` on a record owned by `user_id`.
    ///
    /// Returns `AppError::Persistence` when no row matched.
    async fn update_video_url(
        &self,
        id: Uuid,
        user_id: Uuid,
        video_url: &str,
    ) -> Result<VideoRecord, AppError>;

    /// Set `thumbnail_url` on a record owned by `user_id`.
    ///
    /// Returns `AppError::Persistence` when no row matched.
    async fn update_thumbnail_url(
        &self,
        id: Uuid,
        user_id: Uuid,
        thumbnail_url: &str,
    ) -> Result<VideoRecord, AppError>;
}

const VIDEO_COLUMNS: &str =
    "id, user_id, title, description, thumbnail_url, video_url, created_at, updated_at";

/// Postgres-backed video repository
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn update_column(
        &self,
        column: &'static str,
        id: Uuid,
        user_id: Uuid,
        value: &str,
    ) -> Result<VideoRecord, AppError> {
        let query = format!(
            "UPDATE videos SET {} = $1, updated_at = NOW() WHERE id = $2 AND user_id = $3 RETURNING {}",
            column, VIDEO_COLUMNS
        );

        let updated = sqlx::query_as::<Postgres, VideoRecord>(&query)
            .bind(value)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Persistence(format!("Failed to update {}: {}", column, e)))?;

        updated.ok_or_else(|| {
            AppError::Persistence(format!(
                "Video {} owned by {} was not updated",
                id, user_id
            ))
        })
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %id))]
    async fn get_video(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError> {
        let query = format!("SELECT {} FROM videos WHERE id = $1", VIDEO_COLUMNS);
        let video = sqlx::query_as::<Postgres, VideoRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(video)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "update", db.record_id = %id))]
    async fn update_video_url(
        &self,
        id: Uuid,
        user_id: Uuid,
        video_url: &str,
    ) -> Result<VideoRecord, AppError> {
        self.update_column("video_url", id, user_id, video_url).await
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "update", db.record_id = %id))]
    async fn update_thumbnail_url(
        &self,
        id: Uuid,
        user_id: Uuid,
        thumbnail_url: &str,
    ) -> Result<VideoRecord, AppError> {
        self.update_column("thumbnail_url", id, user_id, thumbnail_url)
            .await
    }
}
