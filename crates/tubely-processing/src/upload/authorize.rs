use tubely_core::AppError;
use tubely_db::VideoRepository;
use uuid::Uuid;

/// Proof that `user_id` owns the video at the time the upload started.
///
/// Only [`AuthorizedUpload::check`] builds one, and both pipelines take it by value, so
/// no body byte is staged before ownership has been verified.
#[derive(Debug)]
pub struct AuthorizedUpload {
    video_id: Uuid,
    user_id: Uuid,
}

impl AuthorizedUpload {
    pub(crate) async fn check(
        repository: &dyn VideoRepository,
        video_id: Uuid,
        user_id: Uuid,
    ) -> Result<Self, AppError> {
        let video = repository
            .get_video(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

        if !video.is_owned_by(user_id) {
            tracing::warn!(
                video_id = %video_id,
                user_id = %user_id,
                "Upload rejected: caller is not the video owner"
            );
            return Err(AppError::Forbidden(
                "Not authorized to update this video".to_string(),
            ));
        }

        Ok(Self { video_id, user_id })
    }

    pub fn video_id(&self) -> Uuid {
        self.video_id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }
}
