//! Result Sink
//!
//! The single consumer of submitted results. Processing is sequential, in receipt order.
//! Nothing that goes wrong here is reported back to the worker: it already got its
//! acknowledgment when the result was queued.

use super::shard::ShardStore;
use super::throughput::RateMeter;
use crate::completion::CompletionSet;
use crate::lease::LeaseTable;
use crate::types::{ItemId, PageResult};

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, watch};

/// What happened to one submitted result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkOutcome {
    /// Content appended to `shard`; the page is complete.
    Stored { shard: u64 },
    /// The page was already complete. Nothing written.
    Duplicate,
    /// Content too short to be a real page. The lease is kept so the page is retried on expiry.
    Implausible,
    /// The shard append failed. The lease is kept so the page is retried on expiry.
    WriteFailed,
}

pub struct ResultSink {
    completion: Arc<CompletionSet>,
    leases: Arc<LeaseTable>,
    shards: ShardStore,
    min_content_len: usize,
    meter: RateMeter,
}

impl ResultSink {
    pub fn new(
        completion: Arc<CompletionSet>,
        leases: Arc<LeaseTable>,
        shards: ShardStore,
        min_content_len: usize,
        meter: RateMeter,
    ) -> Self {
        Self {
            completion,
            leases,
            shards,
            min_content_len,
            meter,
        }
    }

    /// Validates, stores and retires a single result.
    pub async fn process(&mut self, result: PageResult) -> SinkOutcome {
        let page = result.page;

        if self.completion.has(page) {
            tracing::warn!(page, "already finished, discarding result");
            return SinkOutcome::Duplicate;
        }

        if result.content.len() < self.min_content_len {
            tracing::warn!(
                page,
                len = result.content.len(),
                "content too short, treating as failed request"
            );
            return SinkOutcome::Implausible;
        }

        let shard = self.shards.shard_of(page);
        if let Err(e) = self.shards.append(page, &result.content).await {
            tracing::error!(page, shard, "{}", e);
            return SinkOutcome::WriteFailed;
        }

        self.mark_finished(page);
        tracing::debug!(page, shard, "stored result");

        if let Some(rate) = self.meter.record(Instant::now()) {
            tracing::info!("Rate: {:.3}/s", rate);
        }

        SinkOutcome::Stored { shard }
    }

    fn mark_finished(&self, page: ItemId) {
        // Bitmap first, then lease; the two locks are taken one after the other, never nested.
        self.completion.add(page);
        self.leases.release(page);
    }

    /// Consumes results until the channel closes or `shutdown` fires. Results already queued
    /// at shutdown are still processed.
    pub async fn run(
        mut self,
        mut results: mpsc::Receiver<PageResult>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        tracing::info!("Result sink started (shards in {})", self.shards.dir().display());

        while !*shutdown.borrow() {
            tokio::select! {
                received = results.recv() => match received {
                    Some(result) => {
                        self.process(result).await;
                    }
                    None => break,
                },
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        results.close();
        let mut drained = 0usize;
        while let Some(result) = results.recv().await {
            self.process(result).await;
            drained += 1;
        }

        tracing::info!(drained, "Result sink stopped");
    }
}
