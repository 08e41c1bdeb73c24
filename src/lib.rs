//! Page Fetch Coordinator Library
//!
//! This library crate defines the core modules of the coordinator. It serves as the
//! foundation for the binary executable (`main.rs`) and for the reference worker.
//!
//! ## Architecture Modules
//! - **`completion`**: The completion bitmap. One bit per page, persisted verbatim, with a
//!   gap scan that finds the next incomplete page.
//! - **`lease`**: Batch assignment and lease expiry. Pages are leased to workers and reclaimed
//!   when a worker goes silent (at-least-once semantics).
//! - **`persistence`**: Startup load and periodic snapshots of the completion bitmap.
//! - **`results`**: The result sink. Validates submissions, appends them to sharded result
//!   files and retires the page.
//! - **`service`**: The `Coordinator` that owns all shared state, and its HTTP surface.

pub mod completion;
pub mod config;
pub mod error;
pub mod lease;
pub mod persistence;
pub mod results;
pub mod service;
pub mod types;
