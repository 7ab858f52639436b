use crate::error::Res;
use crate::storage::Storage;
use crate::utils;
use std::path::{Path, PathBuf};

/// Stores each key as `<key>.json` inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a `FileStorage` rooted at `dir`. The directory is created on the first write if it
    /// does not exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait::async_trait]
impl Storage for FileStorage {
    async fn read(&self, key: &str) -> Res<Option<String>> {
        let path = self.path(key);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(utils::read(&path).await?))
    }

    async fn write(&self, key: &str, value: String) -> Res<()> {
        utils::make_dir(&self.dir).await?;
        utils::write(self.path(key), value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{get, set, EXPENSES_KEY};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_storage_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let storage_dir = dir.path().join("storage");
        let storage = FileStorage::new(&storage_dir);
        set(&storage, EXPENSES_KEY, &vec![1, 2, 3]).await;
        assert!(storage_dir.join("expenses_v1.json").is_file());

        let reopened = FileStorage::new(&storage_dir);
        assert_eq!(get::<Vec<u8>>(&reopened, EXPENSES_KEY).await, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_missing_file_reads_none() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        assert_eq!(storage.read("nothing_here").await.unwrap(), None);
    }
}
