//! In-memory stand-ins for Postgres and the ffprobe/ffmpeg binaries.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tubely_core::models::VideoRecord;
use tubely_core::AppError;
use tubely_db::VideoRepository;
use tubely_processing::video::remux::optimized_path;
use tubely_processing::{
    Geometry, GeometryProber, OptimizedFile, ProcessingError, Remuxer, ToolStage,
};
use uuid::Uuid;

pub fn video_record(owner: Uuid) -> VideoRecord {
    let now = Utc::now();
    VideoRecord {
        id: Uuid::new_v4(),
        user_id: owner,
        title: "Boots".to_string(),
        description: "A pair of boots".to_string(),
        thumbnail_url: None,
        video_url: None,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Default)]
pub struct InMemoryVideoRepository {
    videos: Mutex<HashMap<Uuid, VideoRecord>>,
}

impl InMemoryVideoRepository {
    pub fn insert(&self, video: VideoRecord) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    pub fn get(&self, id: Uuid) -> Option<VideoRecord> {
        self.videos.lock().unwrap().get(&id).cloned()
    }

    fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        apply: impl FnOnce(&mut VideoRecord),
    ) -> Result<VideoRecord, AppError> {
        let mut videos = self.videos.lock().unwrap();
        match videos.get_mut(&id) {
            Some(video) if video.user_id == user_id => {
                apply(video);
                video.updated_at = Utc::now();
                Ok(video.clone())
            }
            _ => Err(AppError::Persistence(format!("Video {} was not updated", id))),
        }
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn get_video(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError> {
        Ok(self.get(id))
    }

    async fn update_video_url(
        &self,
        id: Uuid,
        user_id: Uuid,
        video_url: &str,
    ) -> Result<VideoRecord, AppError> {
        self.update(id, user_id, |v| v.video_url = Some(video_url.to_string()))
    }

    async fn update_thumbnail_url(
        &self,
        id: Uuid,
        user_id: Uuid,
        thumbnail_url: &str,
    ) -> Result<VideoRecord, AppError> {
        self.update(id, user_id, |v| {
            v.thumbnail_url = Some(thumbnail_url.to_string())
        })
    }
}

/// Reports the same geometry for every file.
pub struct FixedProber(pub Geometry);

#[async_trait]
impl GeometryProber for FixedProber {
    async fn probe_geometry(&self, path: &Path) -> Result<Geometry, ProcessingError> {
        if !path.exists() {
            return Err(ProcessingError::ToolFailed {
                stage: ToolStage::Probe,
                message: format!("{}: No such file or directory", path.display()),
            });
        }
        Ok(self.0)
    }
}

/// Copies the input behind a `faststart:` marker.
pub struct CopyRemuxer;

#[async_trait]
impl Remuxer for CopyRemuxer {
    async fn remux(&self, input: &Path) -> Result<OptimizedFile, ProcessingError> {
        let output = OptimizedFile::new(optimized_path(input))?;
        let mut data = b"faststart:".to_vec();
        data.extend(tokio::fs::read(input).await.map_err(|e| {
            ProcessingError::ToolFailed {
                stage: ToolStage::Remux,
                message: e.to_string(),
            }
        })?);
        tokio::fs::write(output.path(), data)
            .await
            .map_err(|e| ProcessingError::ToolFailed {
                stage: ToolStage::Remux,
                message: e.to_string(),
            })?;
        Ok(output)
    }
}
