//! Batch Assignment
//!
//! Allocates runs of unclaimed pages. The whole scan-and-claim happens inside the lease
//! critical section, so two concurrent callers can never receive the same page.

use super::table::LeaseTable;
use crate::completion::CompletionSet;
use crate::types::ItemId;

use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct Assigner {
    completion: Arc<CompletionSet>,
    leases: Arc<LeaseTable>,
}

impl Assigner {
    pub fn new(completion: Arc<CompletionSet>, leases: Arc<LeaseTable>) -> Self {
        Self { completion, leases }
    }

    /// Leases up to `n` pages no greater than `max_page`.
    ///
    /// A short (or empty) batch means the item space is nearly exhausted: every remaining
    /// page is either completed or leased to someone else.
    pub fn assign(&self, n: usize, max_page: ItemId) -> Vec<ItemId> {
        self.assign_at(n, max_page, Instant::now())
    }

    /// Same as [`assign`](Self::assign) with an explicit lease start time.
    pub fn assign_at(&self, n: usize, max_page: ItemId, now: Instant) -> Vec<ItemId> {
        let mut state = self.leases.lock();
        let mut cursor = state.min_unfinished;
        let mut pages = Vec::with_capacity(n);

        for _ in 0..n {
            while self.completion.has(cursor) || state.is_leased(cursor) {
                cursor = self.completion.min_not_exists_from(cursor + 1);
            }
            if cursor > max_page {
                break;
            }
            pages.push(cursor);
            cursor += 1;
        }

        for &page in &pages {
            state.leases.insert(page, now);
        }
        state.min_unfinished = state.min_unfinished.max(cursor);

        tracing::debug!(
            assigned = pages.len(),
            min_unfinished = state.min_unfinished,
            "assigned pages"
        );

        pages
    }
}
