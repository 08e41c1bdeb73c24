//! Process Configuration
//!
//! Every option can be given on the command line or through the matching
//! `PAGE_COORDINATOR_*` environment variable.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::types::ItemId;

#[derive(Parser, Debug, Clone)]
#[command(name = "page-coordinator")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Name of the crawl project, echoed in every task.
    #[arg(long, env = "PAGE_COORDINATOR_PROJECT", default_value = "PatentFetcher")]
    pub project_name: String,

    /// HTTP listen address.
    #[arg(long, env = "PAGE_COORDINATOR_ADDRESS", default_value = "0.0.0.0:6789")]
    pub address: SocketAddr,

    /// Enable debug-level logging.
    #[arg(long, env = "PAGE_COORDINATOR_DEBUG")]
    pub debug: bool,

    /// Completion record (one bit per page).
    #[arg(long, env = "PAGE_COORDINATOR_PAGES_FILE", default_value = "files/pages.bs")]
    pub pages_file: PathBuf,

    /// Directory holding the result shards.
    #[arg(long, env = "PAGE_COORDINATOR_RESULT_DIR", default_value = "files/results/")]
    pub result_dir: PathBuf,

    /// Pages handed out per task request.
    #[arg(long, env = "PAGE_COORDINATOR_BATCH_SIZE", default_value_t = 3)]
    pub batch_size: usize,

    /// Highest page ID in the item space.
    #[arg(long, env = "PAGE_COORDINATOR_MAX_PAGE", default_value_t = 10_000_000)]
    pub max_page: ItemId,

    #[arg(long, env = "PAGE_COORDINATOR_LEASE_TIMEOUT_SECS", default_value_t = 20)]
    pub lease_timeout_secs: u64,

    #[arg(long, env = "PAGE_COORDINATOR_REAPER_INTERVAL_SECS", default_value_t = 20)]
    pub reaper_interval_secs: u64,

    #[arg(long, env = "PAGE_COORDINATOR_PERSIST_INTERVAL_SECS", default_value_t = 15)]
    pub persist_interval_secs: u64,

    /// Results shorter than this are treated as failed fetches.
    #[arg(long, env = "PAGE_COORDINATOR_MIN_CONTENT_LEN", default_value_t = 10)]
    pub min_content_len: usize,

    /// Pages per result shard.
    #[arg(long, env = "PAGE_COORDINATOR_SHARD_SIZE", default_value_t = 10_000)]
    pub shard_size: ItemId,

    /// Results buffered between the HTTP boundary and the sink.
    #[arg(long, env = "PAGE_COORDINATOR_QUEUE_CAPACITY", default_value_t = 100)]
    pub queue_capacity: usize,

    /// Window over which the completion rate is averaged.
    #[arg(long, env = "PAGE_COORDINATOR_RATE_WINDOW_SECS", default_value_t = 15)]
    pub rate_window_secs: u64,
}

impl Config {
    pub fn lease_timeout(&self) -> Duration {
        Duration::from_secs(self.lease_timeout_secs)
    }

    pub fn reaper_interval(&self) -> Duration {
        Duration::from_secs(self.reaper_interval_secs.max(1))
    }

    pub fn persist_interval(&self) -> Duration {
        Duration::from_secs(self.persist_interval_secs.max(1))
    }

    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window_secs)
    }

    /// `tracing_subscriber` filter directive matching the debug flag.
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "page_coordinator=debug,info"
        } else {
            "info"
        }
    }
}
