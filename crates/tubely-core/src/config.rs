//! Configuration module
//!
//! Configuration is read once at startup from the environment (and an optional `.env`
//! file). `Config::from_lookup` takes any key lookup so parsing can be exercised without
//! touching the process environment.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{DEFAULT_MAX_THUMBNAIL_SIZE_BYTES, DEFAULT_MAX_VIDEO_SIZE_BYTES};
use crate::storage_types::StorageBackend;

const DEFAULT_PORT: u16 = 8091;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const PROBE_TIMEOUT_SECS: u64 = 30;
const REMUX_TIMEOUT_SECS: u64 = 600;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Server, auth and database settings.
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    /// Maximum number of requests handled at once.
    pub http_concurrency_limit: usize,
    /// `LOG_FORMAT=json` switches the console output to JSON lines.
    pub log_json: bool,
}

/// Where published files go.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Backend for videos.
    pub storage_backend: StorageBackend,
    /// Backend for thumbnails. `Local` publishes into `assets_root`.
    pub thumbnail_storage: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO etc.)
    pub assets_root: PathBuf,
    pub assets_base_url: String,
}

/// Upload limits and external tool settings.
#[derive(Clone, Debug)]
pub struct MediaConfig {
    /// Directory for staged and optimized scratch files. `None` means the system temp dir.
    pub scratch_dir: Option<PathBuf>,
    pub max_video_size_bytes: u64,
    pub max_thumbnail_size_bytes: u64,
    pub ffprobe_path: String,
    pub ffmpeg_path: String,
    pub probe_timeout_secs: u64,
    pub remux_timeout_secs: u64,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub storage: StorageConfig,
    pub media: MediaConfig,
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, anyhow::Error>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid value, got {:?}", key, raw)),
        _ => Ok(default),
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = non_empty(&lookup, "ENVIRONMENT")
            .or_else(|| non_empty(&lookup, "APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins: Vec<String> = non_empty(&lookup, "CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port: u16 = parse_or(&lookup, "PORT", DEFAULT_PORT)?;

        let base = BaseConfig {
            server_port,
            environment,
            cors_origins,
            jwt_secret: non_empty(&lookup, "JWT_SECRET")
                .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            database_url: non_empty(&lookup, "DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", MAX_CONNECTIONS)?,
            db_timeout_seconds: parse_or(&lookup, "DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS)?,
            http_concurrency_limit: parse_or(
                &lookup,
                "HTTP_CONCURRENCY_LIMIT",
                HTTP_CONCURRENCY_LIMIT,
            )?
            .max(1),
            log_json: non_empty(&lookup, "LOG_FORMAT")
                .map(|format| format.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        };

        let storage = StorageConfig {
            storage_backend: parse_or(&lookup, "STORAGE_BACKEND", StorageBackend::S3)?,
            thumbnail_storage: parse_or(&lookup, "THUMBNAIL_STORAGE", StorageBackend::Local)?,
            s3_bucket: non_empty(&lookup, "S3_BUCKET"),
            s3_region: non_empty(&lookup, "S3_REGION").or_else(|| non_empty(&lookup, "AWS_REGION")),
            s3_endpoint: non_empty(&lookup, "S3_ENDPOINT"),
            assets_root: non_empty(&lookup, "ASSETS_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./assets")),
            assets_base_url: non_empty(&lookup, "ASSETS_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{}/assets", server_port)),
        };

        let media = MediaConfig {
            scratch_dir: non_empty(&lookup, "SCRATCH_DIR").map(PathBuf::from),
            max_video_size_bytes: parse_or(
                &lookup,
                "MAX_VIDEO_SIZE_MB",
                DEFAULT_MAX_VIDEO_SIZE_BYTES >> 20,
            )? << 20,
            max_thumbnail_size_bytes: parse_or(
                &lookup,
                "MAX_THUMBNAIL_SIZE_MB",
                DEFAULT_MAX_THUMBNAIL_SIZE_BYTES >> 20,
            )? << 20,
            ffprobe_path: non_empty(&lookup, "FFPROBE_PATH").unwrap_or_else(|| "ffprobe".to_string()),
            ffmpeg_path: non_empty(&lookup, "FFMPEG_PATH").unwrap_or_else(|| "ffmpeg".to_string()),
            probe_timeout_secs: parse_or(&lookup, "PROBE_TIMEOUT_SECS", PROBE_TIMEOUT_SECS)?,
            remux_timeout_secs: parse_or(&lookup, "REMUX_TIMEOUT_SECS", REMUX_TIMEOUT_SECS)?,
        };

        let config = Config {
            base,
            storage,
            media,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let uses_s3 = self.storage.storage_backend == StorageBackend::S3
            || self.storage.thumbnail_storage == StorageBackend::S3;
        if uses_s3 {
            if self.storage.s3_bucket.is_none() {
                return Err(anyhow::anyhow!("S3_BUCKET must be set for the s3 storage backend"));
            }
            if self.storage.s3_region.is_none() {
                return Err(anyhow::anyhow!(
                    "S3_REGION or AWS_REGION must be set for the s3 storage backend"
                ));
            }
        }

        if self.media.max_video_size_bytes == 0 || self.media.max_thumbnail_size_bytes == 0 {
            return Err(anyhow::anyhow!("Upload size limits must be greater than zero"));
        }

        Ok(())
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn jwt_secret(&self) -> &str {
        &self.base.jwt_secret
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.media
            .scratch_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}
