//! Atomic file writes shared by the local stores.
//!
//! Content goes to a uniquely named temp file in the target directory, is
//! synced, then renamed over the final path. Readers see either the old or
//! the new content, never a partial file.

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::ports::StorageError;

/// Creates `dir` and its parents. Succeeds if another task created it first.
pub async fn ensure_dir(dir: &Path) -> Result<(), StorageError> {
    fs::create_dir_all(dir).await.map_err(|e| {
        StorageError::io(format!("Failed to create directory {}: {}", dir.display(), e))
    })
}

fn temp_path_for(final_path: &Path) -> PathBuf {
    let name = final_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    final_path.with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4().simple()))
}

/// Writes `content` to `final_path` atomically, overwriting any existing file.
pub async fn write_atomic(final_path: &Path, content: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = final_path.parent() {
        ensure_dir(parent).await?;
    }

    let temp_path = temp_path_for(final_path);

    let result = async {
        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            StorageError::io(format!(
                "Failed to create temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.write_all(content).await.map_err(|e| {
            StorageError::io(format!(
                "Failed to write temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::io(format!(
                "Failed to sync temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        fs::rename(&temp_path, final_path).await.map_err(|e| {
            StorageError::io(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                final_path.display(),
                e
            ))
        })
    }
    .await;

    if result.is_err() {
        let _ = fs::remove_file(&temp_path).await;
    }
    result
}

/// True for the temp files produced by `write_atomic`.
pub fn is_temp_file(file_name: &str) -> bool {
    file_name.starts_with('.') && file_name.ends_with(".tmp")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn write_creates_missing_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("file.bin");

        write_atomic(&path, b"data").await.unwrap();

        assert_eq!(fs::read(&path).await.unwrap(), b"data");
    }

    #[tokio::test]
    async fn write_overwrites_existing_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("file.bin");

        write_atomic(&path, b"first").await.unwrap();
        write_atomic(&path, b"second").await.unwrap();

        assert_eq!(fs::read(&path).await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn write_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("file.bin");

        write_atomic(&path, b"data").await.unwrap();

        let mut entries = fs::read_dir(temp.path()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            let name = entry.file_name().to_string_lossy().to_string();
            assert!(!is_temp_file(&name), "leftover temp file {}", name);
        }
    }

    #[tokio::test]
    async fn concurrent_directory_creation_succeeds() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("shared");

        let (a, b) = tokio::join!(ensure_dir(&dir), ensure_dir(&dir));

        assert!(a.is_ok());
        assert!(b.is_ok());
    }

    #[test]
    fn temp_names_are_recognised() {
        let temp = temp_path_for(Path::new("/x/company_1_v1.pdf"));
        let name = temp.file_name().unwrap().to_string_lossy().to_string();
        assert!(is_temp_file(&name));
        assert!(!is_temp_file("company_1_v1.pdf"));
    }
}
