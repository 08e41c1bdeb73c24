//! Reference Fetch Worker
//!
//! Pulls page batches from a coordinator, downloads each page from a source URL template and
//! submits the content back. Pages that fail to download are simply skipped: their lease
//! expires on the coordinator and they are handed out again.

use anyhow::Result;
use clap::Parser;
use page_coordinator::service::protocol::{
    ENDPOINT_RESULT, ENDPOINT_TASK, SubmitResultRequest, TaskResponse,
};
use page_coordinator::types::ItemId;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(name = "page-worker")]
#[command(version, about, long_about = None)]
struct Args {
    /// Coordinator base URL.
    #[arg(long, env = "PAGE_WORKER_COORDINATOR", default_value = "http://127.0.0.1:6789")]
    coordinator: String,

    /// Page source; `{page}` is replaced by the page ID.
    #[arg(long, env = "PAGE_WORKER_SOURCE_URL")]
    source_url: String,

    /// Seconds to wait when the coordinator has nothing to hand out.
    #[arg(long, env = "PAGE_WORKER_IDLE_SECS", default_value_t = 5)]
    idle_secs: u64,

    /// Independent fetch loops to run.
    #[arg(long, env = "PAGE_WORKER_CONCURRENCY", default_value_t = 1)]
    concurrency: usize,
}

#[derive(Clone)]
struct WorkerState {
    coordinator_url: String,
    source_url: String,
    idle: Duration,
    client: reqwest::Client,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let state = WorkerState {
        coordinator_url: normalize_base_url(&args.coordinator),
        source_url: args.source_url,
        idle: Duration::from_secs(args.idle_secs),
        client: reqwest::Client::new(),
    };

    tracing::info!(
        "Starting {} fetch loop(s) against {}",
        args.concurrency.max(1),
        state.coordinator_url
    );

    let mut loops = tokio::task::JoinSet::new();
    for worker_id in 0..args.concurrency.max(1) {
        let state = state.clone();
        loops.spawn(async move { fetch_loop(worker_id, state).await });
    }

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        _ = async { while loops.join_next().await.is_some() {} } => {}
    }

    Ok(())
}

async fn fetch_loop(worker_id: usize, state: WorkerState) {
    tracing::info!("Worker {} started", worker_id);

    loop {
        let task = match request_task(&state).await {
            Ok(task) => task,
            Err(e) => {
                tracing::warn!("Worker {} failed to get task: {}", worker_id, e);
                tokio::time::sleep(state.idle).await;
                continue;
            }
        };

        if task.pages.is_empty() {
            tracing::debug!("Worker {} idle, nothing to fetch", worker_id);
            tokio::time::sleep(state.idle).await;
            continue;
        }

        for page in task.pages {
            let content = match fetch_page(&state, page).await {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(page, "Worker {} fetch failed: {}", worker_id, e);
                    continue;
                }
            };

            let result = SubmitResultRequest {
                project: task.project.as_ref().clone(),
                page,
                content,
            };
            if let Err(e) = submit_result(&state, &result).await {
                tracing::error!(page, "Worker {} failed to submit result: {}", worker_id, e);
            }
        }
    }
}

async fn request_task(state: &WorkerState) -> Result<TaskResponse> {
    let response = state
        .client
        .get(format!("{}{}", state.coordinator_url, ENDPOINT_TASK))
        .timeout(Duration::from_secs(10))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(anyhow::anyhow!("GET /task failed {}", response.status()));
    }

    Ok(response.json().await?)
}

async fn fetch_page(state: &WorkerState, page: ItemId) -> Result<String> {
    let response = state
        .client
        .get(page_url(&state.source_url, page))
        .timeout(Duration::from_secs(30))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(anyhow::anyhow!("source returned {}", response.status()));
    }

    Ok(response.text().await?)
}

async fn submit_result(state: &WorkerState, result: &SubmitResultRequest) -> Result<()> {
    let response = post_with_retry(
        state,
        format!("{}{}", state.coordinator_url, ENDPOINT_RESULT),
        result,
        Duration::from_secs(10),
        3,
    )
    .await?;

    if !response.status().is_success() {
        return Err(anyhow::anyhow!("POST /result failed {}", response.status()));
    }

    Ok(())
}

async fn post_with_retry<T: serde::Serialize>(
    state: &WorkerState,
    url: String,
    payload: &T,
    timeout: Duration,
    attempts: usize,
) -> Result<reqwest::Response> {
    let mut delay_ms = 150u64;

    for attempt in 0..attempts {
        let response = state
            .client
            .post(url.clone())
            .json(payload)
            .timeout(timeout)
            .send()
            .await;

        match response {
            Ok(resp) => return Ok(resp),
            Err(e) => {
                if attempt + 1 == attempts {
                    return Err(anyhow::anyhow!(e));
                }
                let jitter = rand::random::<u64>() % 50;
                tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                delay_ms = (delay_ms * 2).min(1200);
            }
        }
    }

    Err(anyhow::anyhow!("Retry attempts exhausted"))
}

fn page_url(template: &str, page: ItemId) -> String {
    template.replace("{page}", &page.to_string())
}

fn normalize_base_url(candidate: &str) -> String {
    let trimmed = candidate.trim();
    let normalized = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    normalized.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_substitutes_every_placeholder() {
        assert_eq!(
            page_url("https://example.org/patents/{page}?id={page}", 42),
            "https://example.org/patents/42?id=42"
        );
        assert_eq!(page_url("https://example.org/static", 1), "https://example.org/static");
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("127.0.0.1:6789"), "http://127.0.0.1:6789");
        assert_eq!(normalize_base_url(" https://coord.local/ "), "https://coord.local");
        assert_eq!(normalize_base_url("http://coord.local//"), "http://coord.local");
    }

    #[test]
    fn test_args_require_source_url() {
        assert!(Args::try_parse_from(["page-worker"]).is_err());

        let args = Args::try_parse_from(["page-worker", "--source-url", "http://src/{page}"]).unwrap();
        assert_eq!(args.concurrency, 1);
        assert_eq!(args.coordinator, "http://127.0.0.1:6789");
    }
}
