//! Test helpers: build the real router over in-memory fakes.
//!
//! No database or network is needed; published files land in a temporary assets
//! directory served by the router itself.

pub mod fakes;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use chrono::Duration;
use fakes::{video_record, CopyRemuxer, FixedProber, InMemoryVideoRepository};
use std::sync::Arc;
use tempfile::TempDir;
use tubely_api::auth::{Authenticator, JwtAuthenticator};
use tubely_api::constants::API_PREFIX;
use tubely_api::setup::routes;
use tubely_api::state::AppState;
use tubely_core::Config;
use tubely_processing::{Geometry, IngestService, IngestSettings};
use tubely_storage::{LocalStorage, Storage};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "tubely-test-secret";
pub const ASSETS_BASE_URL: &str = "http://localhost:8091/assets";

pub struct TestApp {
    pub server: TestServer,
    pub repository: Arc<InMemoryVideoRepository>,
    pub authenticator: Arc<JwtAuthenticator>,
    pub user_id: Uuid,
    pub token: String,
    pub assets: TempDir,
    pub scratch: TempDir,
}

impl TestApp {
    /// Store a record owned by `owner` and return its id.
    pub fn insert_video(&self, owner: Uuid) -> Uuid {
        let video = video_record(owner);
        let id = video.id;
        self.repository.insert(video);
        id
    }

    pub fn token_for(&self, user_id: Uuid) -> String {
        self.authenticator
            .issue_token(user_id, Duration::hours(1))
            .unwrap()
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    pub fn scratch_entries(&self) -> usize {
        std::fs::read_dir(self.scratch.path()).unwrap().count()
    }

    /// Bytes of a published file, looked up through its public URL.
    pub fn published(&self, url: &str) -> Vec<u8> {
        let key = url
            .strip_prefix(&format!("{}/", ASSETS_BASE_URL))
            .expect("url under the assets base url");
        std::fs::read(self.assets.path().join(key)).unwrap()
    }
}

pub fn api_path(path: &str) -> String {
    format!("{}{}", API_PREFIX, path)
}

pub fn file_form(part_name: &str, data: &[u8], file_name: &str, mime_type: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        part_name.to_string(),
        Part::bytes(data.to_vec())
            .file_name(file_name.to_string())
            .mime_type(mime_type.to_string()),
    )
}

fn test_config(assets: &TempDir, scratch: &TempDir, max_thumbnail_mb: u64) -> Config {
    let assets_root = assets.path().display().to_string();
    let scratch_dir = scratch.path().display().to_string();
    let max_thumbnail_mb = max_thumbnail_mb.to_string();
    Config::from_lookup(|key| {
        let value = match key {
            "JWT_SECRET" => TEST_JWT_SECRET,
            "DATABASE_URL" => "postgres://localhost/tubely_test",
            "STORAGE_BACKEND" => "local",
            "THUMBNAIL_STORAGE" => "local",
            "ASSETS_ROOT" => assets_root.as_str(),
            "ASSETS_BASE_URL" => ASSETS_BASE_URL,
            "SCRATCH_DIR" => scratch_dir.as_str(),
            "MAX_THUMBNAIL_SIZE_MB" => max_thumbnail_mb.as_str(),
            _ => return None,
        };
        Some(value.to_string())
    })
    .unwrap()
}

/// App whose prober reports a 1280x720 video.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(1280, 720, 10).await
}

pub async fn setup_test_app_with(width: u32, height: u32, max_thumbnail_mb: u64) -> TestApp {
    let assets = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let config = test_config(&assets, &scratch, max_thumbnail_mb);
    config.validate().unwrap();

    let repository = Arc::new(InMemoryVideoRepository::default());
    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(assets.path().to_path_buf(), ASSETS_BASE_URL.to_string())
            .await
            .unwrap(),
    );
    let ingest = IngestService::new(
        repository.clone(),
        storage.clone(),
        storage,
        Arc::new(FixedProber(Geometry { width, height })),
        Arc::new(CopyRemuxer),
        IngestSettings::from_config(&config),
    );

    let authenticator = Arc::new(JwtAuthenticator::new(TEST_JWT_SECRET));
    let state = Arc::new(AppState {
        ingest: Arc::new(ingest),
        authenticator: authenticator.clone() as Arc<dyn Authenticator>,
    });
    let router = routes::setup_routes(&config, state).unwrap();
    let server = TestServer::new(router).expect("Failed to create test server");

    let user_id = Uuid::new_v4();
    let token = authenticator
        .issue_token(user_id, Duration::hours(1))
        .unwrap();

    TestApp {
        server,
        repository,
        authenticator,
        user_id,
        token,
        assets,
        scratch,
    }
}
