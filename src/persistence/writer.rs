use crate::completion::CompletionSet;
use crate::error::{CoordinatorError, Result};

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Reads the completion record at `path`, creating an empty one if it does not exist.
pub async fn load_completion_set(path: &Path) -> Result<CompletionSet> {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let set = CompletionSet::from_bytes(&bytes);
            tracing::info!(
                "Loaded completion record {} ({} bytes, {} pages done)",
                path.display(),
                bytes.len(),
                set.len()
            );
            Ok(set)
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            create_empty(path).await?;
            tracing::info!("Created empty completion record {}", path.display());
            Ok(CompletionSet::new())
        }
        Err(source) => Err(CoordinatorError::Load {
            path: path.to_path_buf(),
            source,
        }),
    }
}

async fn create_empty(path: &Path) -> Result<()> {
    let to_error = |source| CoordinatorError::Create {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(to_error)?;
    }
    tokio::fs::File::create(path).await.map_err(to_error)?;
    Ok(())
}

/// Overwrites `path` with the current bitmap.
pub async fn write_snapshot(path: &Path, set: &CompletionSet) -> Result<()> {
    let bytes = set.to_bytes();
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| CoordinatorError::Persist {
            path: path.to_path_buf(),
            source,
        })
}

/// Background snapshot loop.
pub struct PersistenceWriter {
    completion: Arc<CompletionSet>,
    path: PathBuf,
    interval: Duration,
}

impl PersistenceWriter {
    pub fn new(completion: Arc<CompletionSet>, path: PathBuf, interval: Duration) -> Arc<Self> {
        Arc::new(Self {
            completion,
            path,
            interval,
        })
    }

    /// Writes one snapshot, logging the outcome. Failures leave in-memory state untouched and
    /// are retried on the next tick.
    pub async fn flush(&self) -> bool {
        match write_snapshot(&self.path, &self.completion).await {
            Ok(()) => {
                tracing::info!(file = %self.path.display(), "updated pages file");
                true
            }
            Err(e) => {
                tracing::error!(file = %self.path.display(), "failed to update pages file: {}", e);
                false
            }
        }
    }

    /// Snapshots every `interval` until `shutdown` fires. The final snapshot is left to the
    /// owner, which knows when the last completion has landed.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            "Persistence writer started ({} every {:?})",
            self.path.display(),
            self.interval
        );

        let start = tokio::time::Instant::now() + self.interval;
        let mut interval = tokio::time::interval_at(start, self.interval);

        while !*shutdown.borrow() {
            tokio::select! {
                _ = interval.tick() => {
                    self.flush().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Persistence writer stopped");
    }
}
