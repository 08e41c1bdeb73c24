//! Result Ingestion Module
//!
//! Turns worker submissions into durable, completed pages.
//!
//! ## Workflow
//! 1. **Queue**: The HTTP boundary pushes each `PageResult` onto a bounded channel and
//!    acknowledges immediately (acceptance, not durability).
//! 2. **Validate**: The single `ResultSink` consumer drops duplicates and implausibly short
//!    content. Short content keeps its lease so the page is retried once the lease expires.
//! 3. **Store**: Content is appended verbatim to the shard file for `page / shard_size`.
//! 4. **Retire**: The page is marked complete and its lease released.
//!
//! ## Submodules
//! - **`shard`**: Shard routing and append-only writes.
//! - **`throughput`**: Rolling completion-rate estimate.
//! - **`sink`**: The consumer loop.

pub mod shard;
pub mod sink;
pub mod throughput;

pub use shard::ShardStore;
pub use sink::{ResultSink, SinkOutcome};
pub use throughput::{RateMeter, ThroughputGauge};
