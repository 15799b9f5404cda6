//! In-memory fakes for pipeline tests.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use futures::Stream;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tubely_core::models::VideoRecord;
use tubely_core::{AppError, StorageBackend};
use tubely_db::VideoRepository;
use tubely_storage::{Storage, StorageError, StorageReader, StorageResult};
use uuid::Uuid;

use crate::error::{ProcessingError, ToolStage};
use crate::video::remux::optimized_path;
use crate::video::{Geometry, GeometryProber, OptimizedFile, Remuxer};

pub fn record(owner: Uuid) -> VideoRecord {
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

pub fn body(data: &'static [u8]) -> impl Stream<Item = Result<Bytes, AppError>> + Send {
    futures::stream::iter(vec![Ok(Bytes::from_static(data))])
}

#[derive(Default)]
pub struct InMemoryVideoRepository {
    videos: Mutex<HashMap<Uuid, VideoRecord>>,
    fail_updates: Mutex<bool>,
}

impl InMemoryVideoRepository {
    pub fn insert(&self, video: VideoRecord) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    pub fn get(&self, id: Uuid) -> Option<VideoRecord> {
        self.videos.lock().unwrap().get(&id).cloned()
    }

    pub fn fail_updates(&self) {
        *self.fail_updates.lock().unwrap() = true;
    }

    fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        apply: impl FnOnce(&mut VideoRecord),
    ) -> Result<VideoRecord, AppError> {
        if *self.fail_updates.lock().unwrap() {
            return Err(AppError::Persistence("connection closed".to_string()));
        }
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

/// Returns a fixed geometry (or failure) and remembers what it was asked to probe.
pub struct FakeProber {
    geometry: Option<Geometry>,
    pub probed: Mutex<Vec<PathBuf>>,
}

impl FakeProber {
    pub fn returning(width: u32, height: u32) -> Self {
        Self {
            geometry: Some(Geometry { width, height }),
            probed: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            geometry: None,
            probed: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl GeometryProber for FakeProber {
    async fn probe_geometry(&self, path: &Path) -> Result<Geometry, ProcessingError> {
        assert!(path.exists(), "probed file must exist");
        self.probed.lock().unwrap().push(path.to_path_buf());
        self.geometry.ok_or_else(|| ProcessingError::ToolFailed {
            stage: ToolStage::Probe,
            message: "Invalid data found when processing input".to_string(),
        })
    }
}

/// Writes `faststart:` + input bytes to the optimized path.
#[derive(Default)]
pub struct FakeRemuxer {
    fail: bool,
}

impl FakeRemuxer {
    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[async_trait]
impl Remuxer for FakeRemuxer {
    async fn remux(&self, input: &Path) -> Result<OptimizedFile, ProcessingError> {
        let output = OptimizedFile::new(optimized_path(input))?;
        let mut data = b"faststart:".to_vec();
        data.extend(std::fs::read(input).map_err(|e| ProcessingError::ToolFailed {
            stage: ToolStage::Remux,
            message: e.to_string(),
        })?);
        std::fs::write(output.path(), data).map_err(|e| ProcessingError::ToolFailed {
            stage: ToolStage::Remux,
            message: e.to_string(),
        })?;
        if self.fail {
            return Err(ProcessingError::ToolFailed {
                stage: ToolStage::Remux,
                message: "moov atom not found".to_string(),
            });
        }
        Ok(output)
    }
}

/// Storage that rejects every upload.
pub struct FailingStorage;

#[async_trait]
impl Storage for FailingStorage {
    async fn upload_stream(
        &self,
        _storage_key: &str,
        _content_type: &str,
        _reader: StorageReader,
    ) -> StorageResult<String> {
        Err(StorageError::UploadFailed("503 Slow Down".to_string()))
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("https://unreachable.example.com/{}", storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
