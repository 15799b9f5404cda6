//! Tubely Storage Library
//!
//! This crate provides the storage abstraction used to publish videos and thumbnails,
//! with implementations for S3 (through `object_store`) and the local assets directory.
//!
//! # Storage key format
//!
//! - **Videos**: `{orientation}/{random}.{ext}`
//! - **Thumbnails**: `{random}.{ext}`
//!
//! `{random}` is 32 bytes from a CSPRNG, URL-safe base64 without padding. Keys must not
//! contain `..` or a leading `/`. Key generation is centralized in the `keys` module.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::{create_storage, create_thumbnail_storage};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageReader, StorageResult};
pub use tubely_core::StorageBackend;
