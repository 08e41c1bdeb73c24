use std::path::PathBuf;
use thiserror::Error;

use crate::types::ItemId;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// The completion record exists but could not be read. Fatal at startup.
    #[error("failed to load completion record {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The completion record was missing and could not be created. Fatal at startup.
    #[error("failed to create completion record {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write completion snapshot {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to append page {page} to shard {path}: {source}")]
    ShardWrite {
        page: ItemId,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("result sink is no longer accepting results")]
    SinkClosed,

    #[error("page {page} is outside the item space (max {max_page})")]
    PageOutOfRange { page: ItemId, max_page: ItemId },

    #[error("result belongs to project {got:?}, expected {expected:?}")]
    ProjectMismatch { expected: String, got: String },
}

impl CoordinatorError {
    /// Whether the error was caused by the submitting client rather than the coordinator.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::PageOutOfRange { .. } | Self::ProjectMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CoordinatorError>;
