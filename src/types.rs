//! Shared Data Types
//!
//! Defines the values that cross component boundaries: item identifiers, the project
//! metadata shared by tasks and results, and the task/result payloads themselves.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Identifier of a single work item (page). Dense in `[0, max_page]`.
pub type ItemId = u64;

/// Immutable metadata describing the crawl project.
///
/// Built once at startup and shared by reference between every `Task` the coordinator
/// hands out. Results carry their own copy so the coordinator can reject submissions
/// that belong to another project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectMeta {
    pub name: String,
}

impl ProjectMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A batch of pages assigned to one worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub project: Arc<ProjectMeta>,
    /// Assigned page IDs in strictly increasing order. Empty means nothing is available right now.
    pub pages: Vec<ItemId>,
}

/// The fetched content of one page, submitted by a worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    pub project: ProjectMeta,
    pub page: ItemId,
    pub content: String,
}

/// Helper to get the current system time in milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
