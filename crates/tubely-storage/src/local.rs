use crate::traits::{validate_key, Storage, StorageError, StorageReader, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// Files land under `base_path` and are served by the HTTP layer under `base_url`.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "./assets")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:8091/assets")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path with security validation
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        validate_key(storage_key)?;

        let path = self.base_path.join(storage_key);
        if !path.starts_with(&self.base_path) {
            return Err(StorageError::InvalidKey(
                "Storage key resolves outside storage directory".to_string(),
            ));
        }

        Ok(path)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn write_part(&self, part_path: &Path, reader: &mut StorageReader) -> StorageResult<u64> {
        let mut file = fs::File::create(part_path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", part_path.display(), e))
        })?;

        let bytes_copied = tokio::io::copy(reader, &mut file).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to write stream to file {}: {}",
                part_path.display(),
                e
            ))
        })?;

        file.flush().await?;
        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", part_path.display(), e))
        })?;

        Ok(bytes_copied)
    }
}

/// `{path}.part`, where a file is written before being renamed into place.
fn part_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload_stream(
        &self,
        storage_key: &str,
        _content_type: &str,
        mut reader: StorageReader,
    ) -> StorageResult<String> {
        let path = self.key_to_path(storage_key)?;
        let part_path = part_path(&path);
        let start = std::time::Instant::now();

        self.ensure_parent_dir(&path).await?;

        let bytes_copied = match self.write_part(&part_path, &mut reader).await {
            Ok(n) => n,
            Err(e) => {
                let _ = fs::remove_file(&part_path).await;
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&part_path, &path).await {
            let _ = fs::remove_file(&part_path).await;
            return Err(StorageError::UploadFailed(format!(
                "Failed to move file into place {}: {}",
                path.display(),
                e
            )));
        }

        let url = self.public_url(storage_key);

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage stream upload successful"
        );

        Ok(url)
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tempfile::tempdir;
    use tokio::io::{AsyncRead, ReadBuf};

    fn reader(data: &[u8]) -> StorageReader {
        Box::pin(io::Cursor::new(data.to_vec()))
    }

    /// Yields a few bytes, then fails.
    struct BrokenReader {
        sent: bool,
    }

    impl AsyncRead for BrokenReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            if self.sent {
                return Poll::Ready(Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")));
            }
            self.sent = true;
            buf.put_slice(b"partial");
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_local_storage_upload_stream() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:8091/assets/".to_string())
            .await
            .unwrap();

        let url = storage
            .upload_stream("abc.png", "image/png", reader(b"png bytes"))
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:8091/assets/abc.png");
        assert_eq!(url, storage.public_url("abc.png"));
        assert_eq!(std::fs::read(dir.path().join("abc.png")).unwrap(), b"png bytes");
        assert!(!dir.path().join("abc.png.part").exists());
    }

    #[tokio::test]
    async fn test_nested_key_creates_directories() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:8091/assets".to_string())
            .await
            .unwrap();

        storage
            .upload_stream("landscape/abc.mp4", "video/mp4", reader(b"mp4"))
            .await
            .unwrap();
        assert!(dir.path().join("landscape").join("abc.mp4").exists());
    }

    #[tokio::test]
    async fn test_failed_stream_leaves_nothing_behind() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:8091/assets".to_string())
            .await
            .unwrap();

        let result = storage
            .upload_stream("abc.jpg", "image/jpeg", Box::pin(BrokenReader { sent: false }))
            .await;

        assert!(matches!(result, Err(StorageError::UploadFailed(_))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:8091/assets".to_string())
            .await
            .unwrap();

        let result = storage
            .upload_stream("../../../etc/passwd", "image/png", reader(b"x"))
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.upload_stream("/etc/passwd", "image/png", reader(b"x")).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn test_part_path_appends_suffix() {
        assert_eq!(
            part_path(Path::new("/srv/assets/landscape/abc.mp4")),
            PathBuf::from("/srv/assets/landscape/abc.mp4.part")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_part_path_keeps_non_utf8_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"/srv/assets-\xff/abc.png"));
        let part = part_path(path);
        assert_eq!(part.as_os_str().as_bytes(), b"/srv/assets-\xff/abc.png.part");
    }
}
