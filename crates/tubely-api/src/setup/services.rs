//! Service and repository wiring

use crate::auth::{Authenticator, JwtAuthenticator};
use crate::state::AppState;
use anyhow::{Context, Result};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tubely_core::Config;
use tubely_db::{PgVideoRepository, VideoRepository};
use tubely_processing::{
    FfmpegRemuxer, FfprobeProber, GeometryProber, IngestService, IngestSettings, Remuxer,
};
use tubely_storage::{create_storage, create_thumbnail_storage};

/// Build the storage backends, external tools and ingest service.
pub async fn initialize_services(config: &Config, pool: PgPool) -> Result<Arc<AppState>> {
    let repository: Arc<dyn VideoRepository> = Arc::new(PgVideoRepository::new(pool));

    let video_storage = create_storage(config)
        .await
        .context("Failed to initialize video storage")?;
    let thumbnail_storage = create_thumbnail_storage(config)
        .await
        .context("Failed to initialize thumbnail storage")?;
    tracing::info!(
        video_backend = %video_storage.backend_type(),
        thumbnail_backend = %thumbnail_storage.backend_type(),
        "Storage initialized"
    );

    let prober: Arc<dyn GeometryProber> = Arc::new(
        FfprobeProber::new(
            config.media.ffprobe_path.clone(),
            Duration::from_secs(config.media.probe_timeout_secs),
        )
        .context("Invalid FFPROBE_PATH")?,
    );
    let remuxer: Arc<dyn Remuxer> = Arc::new(
        FfmpegRemuxer::new(
            config.media.ffmpeg_path.clone(),
            Duration::from_secs(config.media.remux_timeout_secs),
        )
        .context("Invalid FFMPEG_PATH")?,
    );

    let settings = IngestSettings::from_config(config);
    tokio::fs::create_dir_all(&settings.scratch_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create scratch directory {}",
                settings.scratch_dir.display()
            )
        })?;

    let ingest = IngestService::new(
        repository,
        video_storage,
        thumbnail_storage,
        prober,
        remuxer,
        settings,
    );
    let authenticator: Arc<dyn Authenticator> = Arc::new(JwtAuthenticator::new(config.jwt_secret()));

    Ok(Arc::new(AppState {
        ingest: Arc::new(ingest),
        authenticator,
    }))
}
