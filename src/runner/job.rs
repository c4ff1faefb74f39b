use crate::core::config::DelugeConfig;
use crate::deluge::client::DelugeClient;
use crate::models::summary::RunSummary;
use crate::models::torrent::TorrentRecord;
use crate::retention::evaluator::evaluate;
use crate::retention::executor::execute;
use crate::store::settings::SettingsStore;
use crate::utils::time::current_timestamp;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{error, info};

/// Result of asking the runner to start
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// This caller executed the run to a terminal state
    Completed,
    /// Another run was already in progress; nothing happened
    Skipped,
}

/// Serializes retention runs and holds the last completed summary.
///
/// `run` is safe to call concurrently from the timer and the web UI: the
/// `running` flag admits exactly one run at a time, and a losing caller
/// returns immediately without queueing. Every terminal state — success,
/// partial failure, or an aborted fetch — overwrites the summary slot
/// before the flag is released, so readers always see the latest outcome.
pub struct JobRunner {
    deluge: DelugeConfig,
    settings: Arc<SettingsStore>,
    running: AtomicBool,
    last_summary: RwLock<Option<RunSummary>>,
}

impl JobRunner {
    pub fn new(deluge: DelugeConfig, settings: Arc<SettingsStore>) -> Self {
        Self {
            deluge,
            settings,
            running: AtomicBool::new(false),
            last_summary: RwLock::new(None),
        }
    }

    /// Summary of the most recent completed run, if any
    pub fn last_summary(&self) -> Option<RunSummary> {
        self.last_summary
            .read()
            .expect("summary lock poisoned")
            .clone()
    }

    /// Whether a run is currently executing
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Execute one retention run, or return immediately if one is active.
    ///
    /// Never panics and never propagates an error: failures are folded into
    /// the summary. The runner does not retry; the scheduler's next tick is
    /// the retry mechanism.
    ///
    /// The RUNNING flag is released by a drop guard, so the transition back
    /// to idle happens even when the calling future is dropped mid-run (a
    /// browser disconnecting from the run-now handler cancels it at an
    /// await point). A cancelled run records a failure summary.
    pub async fn run(&self) -> RunOutcome {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            info!("Retention run already in progress, skipping");
            return RunOutcome::Skipped;
        }

        let mut guard = RunGuard {
            runner: self,
            completed: false,
        };

        info!("Starting retention run");
        let summary = self.run_once().await;

        match &summary.failure {
            Some(reason) => error!(reason = %reason, "Retention run failed"),
            None => info!(
                removed = summary.removed.len(),
                retained = summary.retained.len(),
                "Retention run completed"
            ),
        }

        *self.last_summary.write().expect("summary lock poisoned") = Some(summary);
        guard.completed = true;
        drop(guard);

        RunOutcome::Completed
    }

    fn record_cancelled(&self) {
        error!("Retention run cancelled before completion");
        *self.last_summary.write().expect("summary lock poisoned") = Some(RunSummary::failed(
            "run cancelled before completion",
            current_timestamp(),
        ));
    }

    async fn run_once(&self) -> RunSummary {
        let rule = self.settings.current();

        let client = match DelugeClient::new(&self.deluge) {
            Ok(client) => client,
            Err(e) => {
                return RunSummary::failed(
                    format!("failed to build Deluge client: {}", e),
                    current_timestamp(),
                )
            }
        };

        if let Err(e) = client.login().await {
            return RunSummary::failed(format!("login failed: {}", e), current_timestamp());
        }

        info!(
            url = %self.deluge.base_url(),
            username = %self.deluge.username,
            "Connected to Deluge Web UI"
        );

        let snapshot = match client.fetch_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                return RunSummary::failed(
                    format!("snapshot fetch failed: {}", e),
                    current_timestamp(),
                )
            }
        };

        info!(torrents = snapshot.len(), "Fetched torrent snapshot");

        // Stable iteration order for reproducible logs and summaries
        let mut records: Vec<TorrentRecord> = snapshot.into_values().collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));

        let decisions = evaluate(&records, &rule, current_timestamp());

        execute(&decisions, &client, current_timestamp()).await
    }
}

/// Returns the runner to idle whatever happens to the run future.
///
/// `completed: false` at drop time means the run was cancelled at an await
/// point; a failure summary is recorded so pollers still see a terminal
/// outcome. The summary write happens before the flag is released in both
/// paths.
struct RunGuard<'a> {
    runner: &'a JobRunner,
    completed: bool,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if !self.completed {
            self.runner.record_cancelled();
        }
        self.runner.running.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::RetentionSettings;
    use tempfile::tempdir;

    fn runner_for_port(dir: &std::path::Path, port: u16) -> JobRunner {
        let deluge = DelugeConfig {
            host: "127.0.0.1".to_string(),
            port,
            username: "localclient".to_string(),
            password: "deluge".to_string(),
            remove_data: true,
            request_timeout_secs: 30,
        };
        let settings = Arc::new(SettingsStore::load(
            dir.join("settings.json"),
            RetentionSettings::default(),
        ));
        JobRunner::new(deluge, settings)
    }

    fn test_runner(dir: &std::path::Path) -> JobRunner {
        // Loopback port 1 refuses connections immediately
        runner_for_port(dir, 1)
    }

    #[tokio::test]
    async fn test_unreachable_daemon_leaves_failure_summary_and_idles() {
        let dir = tempdir().unwrap();
        let runner = test_runner(dir.path());

        assert_eq!(runner.run().await, RunOutcome::Completed);

        let summary = runner.last_summary().expect("summary should be recorded");
        assert!(summary.is_failure());
        assert!(summary.failure.unwrap().contains("login failed"));
        assert!(!runner.is_running());

        // The runner accepts a new run after a failed one
        assert_eq!(runner.run().await, RunOutcome::Completed);
    }

    #[tokio::test]
    async fn test_run_request_while_running_is_a_noop() {
        let dir = tempdir().unwrap();
        let runner = test_runner(dir.path());

        runner.running.store(true, Ordering::SeqCst);
        assert_eq!(runner.run().await, RunOutcome::Skipped);

        // The skipped request neither cleared the flag nor wrote a summary
        assert!(runner.is_running());
        assert!(runner.last_summary().is_none());
    }

    #[tokio::test]
    async fn test_cancelled_run_returns_to_idle_with_failure_summary() {
        let dir = tempdir().unwrap();

        // Listener that accepts connections but never answers, so the run
        // parks inside the login request until it is cancelled
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let runner = Arc::new(runner_for_port(dir.path(), port));

        let handle = tokio::spawn({
            let runner = Arc::clone(&runner);
            async move { runner.run().await }
        });
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        handle.abort();
        let _ = handle.await;

        // Dropping the run future mid-flight still released the flag
        assert!(!runner.is_running());
        let summary = runner.last_summary().expect("cancelled run should leave a summary");
        assert!(summary.is_failure());
        assert!(summary.failure.unwrap().contains("cancelled"));

        // A later request wins the guard again rather than being skipped
        assert!(runner
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_run_requests_execute_exactly_one_run() {
        let dir = tempdir().unwrap();
        let runner = Arc::new(test_runner(dir.path()));

        let a = tokio::spawn({
            let runner = Arc::clone(&runner);
            async move { runner.run().await }
        });
        let b = tokio::spawn({
            let runner = Arc::clone(&runner);
            async move { runner.run().await }
        });

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        let completed = [a, b]
            .iter()
            .filter(|o| **o == RunOutcome::Completed)
            .count();

        // Both may complete if they did not overlap, but never zero
        assert!(completed >= 1);
        assert!(!runner.is_running());
        assert!(runner.last_summary().is_some());
    }
}
