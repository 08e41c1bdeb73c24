//! Result Shards
//!
//! One append-only file per contiguous range of `shard_size` pages, named by the shard
//! number. Content is written verbatim with no record delimiter, so readers must rely on the
//! content's own framing.

use crate::error::{CoordinatorError, Result};
use crate::types::ItemId;

use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone)]
pub struct ShardStore {
    dir: PathBuf,
    shard_size: ItemId,
}

impl ShardStore {
    pub fn new(dir: impl Into<PathBuf>, shard_size: ItemId) -> Self {
        Self {
            dir: dir.into(),
            shard_size: shard_size.max(1),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn shard_of(&self, page: ItemId) -> u64 {
        page / self.shard_size
    }

    pub fn path_for(&self, page: ItemId) -> PathBuf {
        self.dir.join(self.shard_of(page).to_string())
    }

    /// Appends `content` to the shard holding `page`, creating the file if needed.
    pub async fn append(&self, page: ItemId, content: &str) -> Result<PathBuf> {
        let path = self.path_for(page);
        let to_error = |source| CoordinatorError::ShardWrite {
            page,
            path: path.clone(),
            source,
        };

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(to_error)?;
        file.write_all(content.as_bytes()).await.map_err(to_error)?;
        file.flush().await.map_err(to_error)?;

        Ok(path)
    }
}
