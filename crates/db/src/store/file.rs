use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{Collection, CollectionBackend, StoreError};

/// One pretty-printed JSON array per collection at `<data_dir>/<name>.json`.
#[derive(Clone, Debug)]
pub struct FileBackend {
    data_dir: PathBuf,
}

impl FileBackend {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }

    fn temp_path_for(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(format!("{}.tmp", collection.file_name()))
    }

    async fn write_atomic(&self, collection: Collection, contents: &[u8]) -> std::io::Result<()> {
        fs::create_dir_all(&self.data_dir).await?;

        let target = self.path_for(collection);
        let temp = self.temp_path_for(collection);
        {
            let mut file = fs::File::create(&temp).await?;
            file.write_all(contents).await?;
            file.sync_all().await?;
        }
        fs::rename(&temp, &target).await?;

        // Persist the rename itself. Not every platform can open a directory.
        if let Ok(dir) = fs::File::open(&self.data_dir).await {
            if let Err(error) = dir.sync_all().await {
                tracing::debug!(
                    event_name = "store.dir_sync_failed",
                    collection = collection.as_str(),
                    data_dir = %self.data_dir.display(),
                    error = %error,
                    "directory fsync after rename failed"
                );
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CollectionBackend for FileBackend {
    fn describe(&self) -> String {
        self.data_dir.display().to_string()
    }

    async fn exists(&self, collection: Collection) -> Result<bool, StoreError> {
        fs::try_exists(self.path_for(collection))
            .await
            .map_err(|error| StoreError::Unavailable { collection, reason: error.to_string() })
    }

    async fn read(&self, collection: Collection) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(collection);
        fs::read(&path).await.map_err(|error| {
            let reason = match error.kind() {
                ErrorKind::NotFound => format!("`{}` does not exist", path.display()),
                _ => format!("`{}`: {error}", path.display()),
            };
            StoreError::Unavailable { collection, reason }
        })
    }

    async fn write(&self, collection: Collection, contents: &[u8]) -> Result<(), StoreError> {
        self.write_atomic(collection, contents)
            .await
            .map_err(|error| StoreError::Write { collection, reason: error.to_string() })
    }
}
