//! Lease Expiry
//!
//! The only way a page claimed by a crashed or silent worker returns to the pool. Workers
//! never cancel leases explicitly.

use super::table::LeaseTable;
use crate::types::ItemId;

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Outcome of one expiry sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReapReport {
    pub expired: usize,
    pub min_unfinished: ItemId,
}

pub struct ExpiryReaper {
    leases: Arc<LeaseTable>,
    timeout: Duration,
    interval: Duration,
}

impl ExpiryReaper {
    pub fn new(leases: Arc<LeaseTable>, timeout: Duration, interval: Duration) -> Arc<Self> {
        Arc::new(Self {
            leases,
            timeout,
            interval,
        })
    }

    /// Drops every lease granted more than `timeout` before `now`.
    ///
    /// When anything expired, the low-water mark is rewound to the smallest reclaimed page
    /// (if that is below the current mark). This is cheaper than recomputing the true frontier
    /// and may make the next assignment rescan some completed pages.
    pub fn reap_expired(&self, now: Instant) -> ReapReport {
        let mut state = self.leases.lock();
        let timeout = self.timeout;
        let mut expired = 0;
        let mut min_expired: Option<ItemId> = None;

        state.leases.retain(|&page, &mut leased_at| {
            if now.saturating_duration_since(leased_at) > timeout {
                expired += 1;
                min_expired = Some(min_expired.map_or(page, |min| min.min(page)));
                false
            } else {
                true
            }
        });

        if let Some(page) = min_expired {
            if page < state.min_unfinished {
                state.min_unfinished = page;
            }
        }

        ReapReport {
            expired,
            min_unfinished: state.min_unfinished,
        }
    }

    /// Sweeps every `interval` until `shutdown` flips to `true` or its sender is dropped.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            "Lease reaper started (timeout {:?}, every {:?})",
            self.timeout,
            self.interval
        );

        let start = tokio::time::Instant::now() + self.interval;
        let mut interval = tokio::time::interval_at(start, self.interval);

        while !*shutdown.borrow() {
            tokio::select! {
                _ = interval.tick() => {
                    let report = self.reap_expired(Instant::now());
                    tracing::info!(
                        expired = report.expired,
                        min_unfinished = report.min_unfinished,
                        "checked assigned pages"
                    );
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Lease reaper stopped");
    }
}
