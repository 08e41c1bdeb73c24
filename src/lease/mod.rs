//! Lease Management Module
//!
//! Hands out pages to workers and takes them back when workers go silent.
//!
//! ## Architecture Overview
//! The coordinator follows a **Pull-based** model with **Lease** management:
//! 1. **Assignment**: A worker asks for a batch. The `Assigner` scans forward from the
//!    low-water mark, skipping completed and already leased pages, and records a lease
//!    for every page it hands out.
//! 2. **Completion**: When the result sink stores a page it releases that page's lease.
//! 3. **Expiry**: The `ExpiryReaper` periodically drops leases older than the timeout and
//!    rewinds the low-water mark so the reclaimed pages are handed out again
//!    (at-least-once semantics).
//!
//! ## Locking
//! The lease map and the low-water mark share one mutex (`LeaseTable`). Completion bitmap
//! reads happen while that mutex is held; the reverse order (bitmap lock, then lease lock)
//! never occurs.
//!
//! ## Submodules
//! - **`table`**: The lease map and low-water mark.
//! - **`assigner`**: Batch allocation.
//! - **`reaper`**: Background expiry loop.

pub mod assigner;
pub mod reaper;
pub mod table;

pub use assigner::Assigner;
pub use reaper::{ExpiryReaper, ReapReport};
pub use table::LeaseTable;
