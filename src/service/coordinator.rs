//! Coordinator Service
//!
//! The one object that owns every piece of shared state: the completion bitmap, the lease
//! table, the result queue and the handles of the three background tasks. Handlers and
//! background tasks receive it (or the parts they need) by `Arc`.
//!
//! ## Lifecycle
//! 1. **`open`**: Loads (or creates) the completion record. Failure here is fatal.
//! 2. **`start`**: Spawns the persistence writer, lease reaper and result sink.
//! 3. **`stop`**: Signals shutdown and waits for the three tasks to finish. The sink drains
//!    what is already queued; once it has exited, one last snapshot is written.

use crate::completion::CompletionSet;
use crate::config::Config;
use crate::error::{CoordinatorError, Result};
use crate::lease::{Assigner, ExpiryReaper, LeaseTable};
use crate::persistence::{PersistenceWriter, load_completion_set};
use crate::results::{RateMeter, ResultSink, ShardStore, ThroughputGauge};
use crate::types::{PageResult, ProjectMeta, Task, now_ms};

use super::protocol::{FetcherStatus, StatusResponse};

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Sink and its receiving end, parked until `start` spawns them.
type PendingSink = (ResultSink, mpsc::Receiver<PageResult>);

pub struct Coordinator {
    config: Config,
    project: Arc<ProjectMeta>,
    completion: Arc<CompletionSet>,
    leases: Arc<LeaseTable>,
    writer: Arc<PersistenceWriter>,
    assigner: Assigner,
    throughput: ThroughputGauge,
    results_tx: mpsc::Sender<PageResult>,
    pending_sink: Mutex<Option<PendingSink>>,
    shutdown_tx: watch::Sender<bool>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    startup: u64,
}

impl Coordinator {
    /// Loads the completion record and builds the shared state. Does not spawn anything.
    pub async fn open(config: Config) -> Result<Arc<Self>> {
        let completion = Arc::new(load_completion_set(&config.pages_file).await?);

        tokio::fs::create_dir_all(&config.result_dir)
            .await
            .map_err(|source| CoordinatorError::Create {
                path: config.result_dir.clone(),
                source,
            })?;

        let min_unfinished = completion.min_not_exists_from(0);
        let leases = Arc::new(LeaseTable::new(min_unfinished));
        let assigner = Assigner::new(completion.clone(), leases.clone());
        let throughput = ThroughputGauge::default();

        let (results_tx, results_rx) = mpsc::channel(config.queue_capacity.max(1));
        let sink = ResultSink::new(
            completion.clone(),
            leases.clone(),
            ShardStore::new(config.result_dir.clone(), config.shard_size),
            config.min_content_len,
            RateMeter::new(config.rate_window(), throughput.clone()),
        );
        let writer = PersistenceWriter::new(
            completion.clone(),
            config.pages_file.clone(),
            config.persist_interval(),
        );
        let (shutdown_tx, _) = watch::channel(false);

        tracing::info!(
            completed = completion.len(),
            min_unfinished,
            max_page = config.max_page,
            "Coordinator opened"
        );

        Ok(Arc::new(Self {
            project: Arc::new(ProjectMeta::new(config.project_name.clone())),
            config,
            completion,
            leases,
            writer,
            assigner,
            throughput,
            results_tx,
            pending_sink: Mutex::new(Some((sink, results_rx))),
            shutdown_tx,
            handles: Mutex::new(Vec::new()),
            startup: now_ms(),
        }))
    }

    /// Spawns the background tasks. Calling it a second time does nothing.
    pub fn start(self: &Arc<Self>) {
        let Some((sink, results_rx)) = self.pending_sink.lock().take() else {
            tracing::warn!("Coordinator already started");
            return;
        };

        let reaper = ExpiryReaper::new(
            self.leases.clone(),
            self.config.lease_timeout(),
            self.config.reaper_interval(),
        );

        let mut handles = self.handles.lock();
        handles.push(tokio::spawn(
            self.writer.clone().run(self.shutdown_tx.subscribe()),
        ));
        handles.push(tokio::spawn(reaper.run(self.shutdown_tx.subscribe())));
        handles.push(tokio::spawn(
            sink.run(results_rx, self.shutdown_tx.subscribe()),
        ));

        tracing::info!("Coordinator started with {} background tasks", handles.len());
    }

    /// Signals shutdown, waits for every background task to exit, then writes a final snapshot.
    pub async fn stop(&self) {
        self.shutdown_tx.send_replace(true);

        let handles = std::mem::take(&mut *self.handles.lock());
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!("Background task ended abnormally: {}", e);
            }
        }
        self.writer.flush().await;

        tracing::info!(completed = self.completion.len(), "Coordinator stopped");
    }

    /// Leases the next batch of pages.
    pub fn assign_task(&self) -> Task {
        let pages = self
            .assigner
            .assign(self.config.batch_size, self.config.max_page);
        if pages.len() < self.config.batch_size {
            tracing::debug!(
                assigned = pages.len(),
                "item space nearly exhausted"
            );
        }

        Task {
            project: self.project.clone(),
            pages,
        }
    }

    /// Queues a result for the sink. Success means accepted, not yet stored.
    pub async fn submit(&self, result: PageResult) -> Result<()> {
        if result.project.name != self.project.name {
            return Err(CoordinatorError::ProjectMismatch {
                expected: self.project.name.clone(),
                got: result.project.name,
            });
        }
        if result.page > self.config.max_page {
            return Err(CoordinatorError::PageOutOfRange {
                page: result.page,
                max_page: self.config.max_page,
            });
        }

        self.results_tx
            .send(result)
            .await
            .map_err(|_| CoordinatorError::SinkClosed)
    }

    pub fn status(&self) -> StatusResponse {
        StatusResponse {
            startup: self.startup,
            fetcher: FetcherStatus {
                min_unfinished_page: self.leases.min_unfinished(),
                rate: self.throughput.get(),
                completed: self.completion.len(),
                leased: self.leases.len(),
            },
        }
    }

    pub fn completion(&self) -> &Arc<CompletionSet> {
        &self.completion
    }

    pub fn leases(&self) -> &Arc<LeaseTable> {
        &self.leases
    }
}
