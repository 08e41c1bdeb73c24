use crate::types::ItemId;

use parking_lot::{Mutex, MutexGuard};
use std::collections::HashMap;
use std::time::Instant;

/// State guarded by the lease mutex.
#[derive(Debug, Default)]
pub struct LeaseState {
    /// Page -> time the lease was granted. Only pages handed out and not yet stored.
    pub(crate) leases: HashMap<ItemId, Instant>,
    /// Conservative lower bound on the smallest page that is neither completed nor leased.
    pub(crate) min_unfinished: ItemId,
}

impl LeaseState {
    pub fn is_leased(&self, page: ItemId) -> bool {
        self.leases.contains_key(&page)
    }

    pub fn min_unfinished(&self) -> ItemId {
        self.min_unfinished
    }
}

/// Outstanding leases plus the low-water mark, behind a single critical section.
#[derive(Debug, Default)]
pub struct LeaseTable {
    state: Mutex<LeaseState>,
}

impl LeaseTable {
    /// Creates an empty table whose scans start at `min_unfinished`.
    pub fn new(min_unfinished: ItemId) -> Self {
        Self {
            state: Mutex::new(LeaseState {
                leases: HashMap::with_capacity(1000),
                min_unfinished,
            }),
        }
    }

    /// Enters the critical section shared by assignment, expiry and release.
    pub(crate) fn lock(&self) -> MutexGuard<'_, LeaseState> {
        self.state.lock()
    }

    /// Drops the lease on `page`. Returns whether a lease was present.
    pub fn release(&self, page: ItemId) -> bool {
        self.lock().leases.remove(&page).is_some()
    }

    pub fn is_leased(&self, page: ItemId) -> bool {
        self.lock().is_leased(page)
    }

    /// Time the lease on `page` was granted, if it is leased.
    pub fn leased_at(&self, page: ItemId) -> Option<Instant> {
        self.lock().leases.get(&page).copied()
    }

    /// Number of outstanding leases.
    pub fn len(&self) -> usize {
        self.lock().leases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().leases.is_empty()
    }

    pub fn min_unfinished(&self) -> ItemId {
        self.lock().min_unfinished
    }
}
