//! Multipart helpers shared by the upload handlers.

use crate::error::multipart_error;
use axum::extract::multipart::Field;
use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use tubely_core::AppError;
use uuid::Uuid;

pub fn parse_video_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidInput("Invalid ID".to_string()))
}

/// Declared content type of a file part; an absent header parses as invalid later on.
pub fn field_content_type(field: &Field<'_>) -> String {
    field.content_type().unwrap_or_default().to_string()
}

/// Body of a file part as a byte stream for staging.
pub fn field_body<'a>(
    field: Field<'a>,
) -> impl Stream<Item = Result<Bytes, AppError>> + Send + 'a {
    field.map_err(multipart_error)
}

pub fn missing_part(part_name: &str) -> AppError {
    AppError::InvalidInput(format!("Unable to parse form file: missing part {:?}", part_name))
}
