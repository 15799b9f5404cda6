//! Shared key generation for storage backends.

use base64::Engine;
use tubely_core::constants::STORAGE_KEY_RANDOM_BYTES;
use tubely_core::models::Orientation;

/// 32 random bytes, URL-safe base64 without padding (43 characters).
pub fn random_basename() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let random_bytes: Vec<u8> = (0..STORAGE_KEY_RANDOM_BYTES).map(|_| rng.random()).collect();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
}

/// Key for a published video: `{orientation}/{random}.{ext}`.
pub fn video_key(orientation: Orientation, extension: &str) -> String {
    format!("{}/{}.{}", orientation, random_basename(), extension)
}

/// Key for a published thumbnail: `{random}.{ext}`.
pub fn thumbnail_key(extension: &str) -> String {
    format!("{}.{}", random_basename(), extension)
}
