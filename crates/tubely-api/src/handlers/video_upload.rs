use crate::auth::CallerIdentity;
use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::{field_body, field_content_type, missing_part, parse_video_id};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    Json,
};
use std::sync::Arc;
use tubely_core::models::{MediaKind, VideoRecord};

/// `POST /api/videos/{video_id}/video`
///
/// Ownership is checked before the first byte of the form is read. The `video` part is
/// streamed to scratch, probed, remuxed for fast start and published under its
/// orientation prefix.
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
    Path(video_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<VideoRecord>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let upload = state.ingest.authorize(video_id, caller.user_id).await?;
    tracing::info!(video_id = %video_id, user_id = %caller.user_id, "Uploading video");

    let part_name = MediaKind::Video.part_name();
    let mut multipart = multipart?;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(part_name) {
            continue;
        }
        let content_type = field_content_type(&field);
        let video = state
            .ingest
            .ingest_video(upload, &content_type, field_body(field))
            .await?;
        return Ok(Json(video));
    }

    Err(missing_part(part_name).into())
}
