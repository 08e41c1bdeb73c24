//! Network Protocol Definitions
//!
//! Defines the JSON bodies exchanged between the coordinator and its workers.

use crate::types::ItemId;
use serde::{Deserialize, Serialize};

pub use crate::types::{PageResult as SubmitResultRequest, Task as TaskResponse};

pub const ENDPOINT_TASK: &str = "/task";
pub const ENDPOINT_RESULT: &str = "/result";
pub const ENDPOINT_STATUS: &str = "/status";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Process start time (ms since the Unix epoch).
    pub startup: u64,
    pub fetcher: FetcherStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherStatus {
    /// Current low-water mark.
    pub min_unfinished_page: ItemId,
    /// Completed pages per second over the last rate window.
    pub rate: f64,
    pub completed: usize,
    pub leased: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
