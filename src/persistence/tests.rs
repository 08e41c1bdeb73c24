//! Persistence Module Tests
//!
//! ## Test Scopes
//! - **Load**: missing, empty and populated completion records.
//! - **Snapshot**: written bytes reload to the same set.
//! - **Loop**: the writer snapshots on its interval and exits on shutdown.

#[cfg(test)]
mod tests {
    use crate::completion::CompletionSet;
    use crate::error::CoordinatorError;
    use crate::persistence::{PersistenceWriter, load_completion_set, write_snapshot};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_load_missing_record_creates_it() {
        // ARRANGE
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("files").join("pages.bs");

        // ACT
        let set = load_completion_set(&path).await.unwrap();

        // ASSERT
        assert!(set.is_empty());
        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_load_existing_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pages.bs");
        std::fs::write(&path, [0b0000_0101u8, 0b1000_0000]).unwrap();

        let set = load_completion_set(&path).await.unwrap();

        assert!(set.has(0));
        assert!(!set.has(1));
        assert!(set.has(2));
        assert!(set.has(15));
        assert_eq!(set.len(), 3);
    }

    #[tokio::test]
    async fn test_load_unreadable_record_is_fatal() {
        // A directory where the record should be cannot be read as a file
        let dir = tempfile::tempdir().unwrap();

        let result = load_completion_set(dir.path()).await;

        assert!(matches!(result, Err(CoordinatorError::Load { .. })));
    }

    #[tokio::test]
    async fn test_snapshot_roundtrip() {
        // ARRANGE
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pages.bs");
        let set = CompletionSet::new();
        for page in [1, 2, 3, 77, 4096] {
            set.add(page);
        }

        // ACT
        write_snapshot(&path, &set).await.unwrap();
        let reloaded = load_completion_set(&path).await.unwrap();

        // ASSERT
        for page in 0..5000 {
            assert_eq!(reloaded.has(page), set.has(page), "page {}", page);
        }
    }

    #[tokio::test]
    async fn test_snapshot_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("pages.bs");
        let writer = PersistenceWriter::new(
            Arc::new(CompletionSet::new()),
            path,
            Duration::from_secs(15),
        );

        assert!(!writer.flush().await);
    }

    #[tokio::test]
    async fn test_flush_writes_current_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pages.bs");
        let completion = Arc::new(CompletionSet::new());
        let writer = PersistenceWriter::new(completion.clone(), path.clone(), Duration::from_secs(15));

        completion.add(10);
        assert!(writer.flush().await);

        let reloaded = load_completion_set(&path).await.unwrap();
        assert!(reloaded.has(10));
        assert_eq!(reloaded.len(), 1);
    }

    #[tokio::test]
    async fn test_writer_loop_snapshots_until_shutdown() {
        // ARRANGE
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pages.bs");
        let completion = Arc::new(CompletionSet::new());
        completion.add(3);
        let writer = PersistenceWriter::new(completion.clone(), path.clone(), Duration::from_millis(10));
        let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
        let handle = tokio::spawn(writer.run(shutdown_rx));

        // ACT
        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("writer should stop")
            .unwrap();

        // ASSERT
        let reloaded = load_completion_set(&path).await.unwrap();
        assert!(reloaded.has(3));
    }
}
