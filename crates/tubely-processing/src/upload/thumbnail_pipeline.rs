use bytes::Bytes;
use futures::Stream;
use std::path::PathBuf;
use tubely_core::models::{MediaKind, VideoRecord};
use tubely_core::validation::parse_media_type;
use tubely_core::AppError;
use tubely_storage::keys::thumbnail_key;

use super::authorize::AuthorizedUpload;
use super::publish::Publisher;
use crate::staging::stage;

pub(crate) struct ThumbnailPipeline {
    pub(crate) publisher: Publisher,
    pub(crate) scratch_dir: PathBuf,
    pub(crate) max_bytes: u64,
}

impl ThumbnailPipeline {
    pub(crate) async fn run<S>(
        &self,
        upload: AuthorizedUpload,
        content_type: &str,
        body: S,
    ) -> Result<VideoRecord, AppError>
    where
        S: Stream<Item = Result<Bytes, AppError>> + Send,
    {
        let media_type = parse_media_type(content_type)?;
        let extension = MediaKind::Thumbnail.extension_for(&media_type)?;

        let staged = stage(body, extension, &self.scratch_dir, self.max_bytes).await?;
        let key = thumbnail_key(extension);

        self.publisher
            .publish(&upload, MediaKind::Thumbnail, &key, staged.path(), &media_type)
            .await
    }
}
