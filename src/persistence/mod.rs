//! Completion Record Persistence
//!
//! Loads the completion bitmap at startup and periodically overwrites it on disk.
//!
//! A missing record is created empty. Any other read failure aborts startup: the coordinator
//! has no safe degraded mode without a trustworthy completion record. Snapshot writes are not
//! atomic; a torn or stale snapshot can only replay pages that were already stored, and the
//! result sink discards those as duplicates.

pub mod writer;

pub use writer::{PersistenceWriter, load_completion_set, write_snapshot};

#[cfg(test)]
mod tests;
