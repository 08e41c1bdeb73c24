//! Completion Tracking Module
//!
//! Holds the record of which pages have been fetched and stored. The record is a plain
//! bitmap (one bit per page, in page order) so it can be persisted verbatim and loaded
//! back in a single read.
//!
//! ## Submodules
//! - **`bitset`**: The growable, lock-guarded `CompletionSet` and its gap scan.

pub mod bitset;

pub use bitset::CompletionSet;

#[cfg(test)]
mod tests;
