use bytes::Bytes;
use futures::Stream;
use std::path::PathBuf;
use std::sync::Arc;
use tubely_core::models::{MediaKind, VideoRecord};
use tubely_core::validation::parse_media_type;
use tubely_core::AppError;
use tubely_storage::keys::video_key;

use super::authorize::AuthorizedUpload;
use super::publish::Publisher;
use crate::staging::stage;
use crate::video::{AspectRatio, GeometryProber, Remuxer};

pub(crate) struct VideoPipeline {
    pub(crate) prober: Arc<dyn GeometryProber>,
    pub(crate) remuxer: Arc<dyn Remuxer>,
    pub(crate) publisher: Publisher,
    pub(crate) scratch_dir: PathBuf,
    pub(crate) max_bytes: u64,
}

impl VideoPipeline {
    /// Stage, probe, classify, remux and publish one video.
    ///
    /// The staged and optimized files are owned by this call and removed on return,
    /// whatever the outcome.
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
        let extension = MediaKind::Video.extension_for(&media_type)?;

        let staged = stage(body, extension, &self.scratch_dir, self.max_bytes).await?;

        let geometry = self.prober.probe_geometry(staged.path()).await?;
        let aspect = AspectRatio::from_geometry(geometry);
        let orientation = aspect.orientation();

        tracing::info!(
            video_id = %upload.video_id(),
            width = geometry.width,
            height = geometry.height,
            aspect_ratio = %aspect,
            orientation = %orientation,
            size_bytes = staged.size(),
            "Video classified"
        );

        let optimized = self.remuxer.remux(staged.path()).await?;
        let key = video_key(orientation, extension);

        self.publisher
            .publish(&upload, MediaKind::Video, &key, optimized.path(), &media_type)
            .await
    }
}
