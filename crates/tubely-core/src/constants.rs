//! Application-wide constants.

/// Request body cap for video uploads (1 GiB).
pub const DEFAULT_MAX_VIDEO_SIZE_BYTES: u64 = 1 << 30;

/// Request body cap for thumbnail uploads (10 MiB).
pub const DEFAULT_MAX_THUMBNAIL_SIZE_BYTES: u64 = 10 << 20;

/// Multipart part names.
pub const VIDEO_PART_NAME: &str = "video";
pub const THUMBNAIL_PART_NAME: &str = "thumbnail";

/// Number of random bytes behind every storage basename.
pub const STORAGE_KEY_RANDOM_BYTES: usize = 32;

/// Prefix for scratch files created while staging uploads.
pub const SCRATCH_FILE_PREFIX: &str = "tubely-";
