use crate::core::error::DelugeError;
use crate::models::summary::RunSummary;
use crate::retention::evaluator::RemovalDecision;
use std::future::Future;
use tracing::{error, info};

/// Capability to remove a torrent from the daemon.
///
/// The executor calls this at most once per decision per run.
pub trait Remove {
    fn remove(&self, id: &str) -> impl Future<Output = Result<(), DelugeError>> + Send;
}

/// Carry out the removal decisions for one run.
///
/// Decisions are processed synchronously in input order. A failed removal
/// is logged, recorded on the retained side with the failure noted, and
/// never aborts the remaining removals.
pub async fn execute<R: Remove>(
    decisions: &[RemovalDecision<'_>],
    remover: &R,
    finished_at: i64,
) -> RunSummary {
    let mut summary = RunSummary::new(finished_at);

    for decision in decisions {
        let record = decision.record;

        let Some(reason) = decision.reason else {
            info!(torrent = %record.name, hash = %record.id, "Not removing torrent");
            summary.retained.push(record.name.clone());
            continue;
        };

        match remover.remove(&record.id).await {
            Ok(()) => {
                info!(
                    torrent = %record.name,
                    hash = %record.id,
                    reason = %reason,
                    "Removed torrent"
                );
                summary.removed.push(record.name.clone());
            }
            Err(e) => {
                error!(
                    torrent = %record.name,
                    hash = %record.id,
                    reason = %reason,
                    error = %e,
                    "Failed to remove torrent"
                );
                summary
                    .retained
                    .push(format!("{} (removal failed: {})", record.name, e));
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::torrent::TorrentRecord;
    use crate::retention::evaluator::{RemovalDecision, RemovalReason};
    use std::sync::Mutex;

    /// Remover that records calls and fails for configured ids
    struct FakeRemover {
        calls: Mutex<Vec<String>>,
        fail_ids: Vec<String>,
    }

    impl FakeRemover {
        fn new(fail_ids: &[&str]) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_ids: fail_ids.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    impl Remove for FakeRemover {
        async fn remove(&self, id: &str) -> Result<(), DelugeError> {
            self.calls.lock().unwrap().push(id.to_string());
            if self.fail_ids.iter().any(|f| f == id) {
                return Err(DelugeError::Daemon("torrent is busy".to_string()));
            }
            Ok(())
        }
    }

    fn record(id: &str, name: &str) -> TorrentRecord {
        TorrentRecord::new(id, name)
    }

    #[tokio::test]
    async fn test_partial_failure_does_not_abort_run() {
        let first = record("aa01", "First");
        let second = record("aa02", "Second");
        let decisions = vec![
            RemovalDecision {
                record: &first,
                reason: Some(RemovalReason::Age),
            },
            RemovalDecision {
                record: &second,
                reason: Some(RemovalReason::Age),
            },
        ];

        let remover = FakeRemover::new(&["aa01"]);
        let summary = execute(&decisions, &remover, 1000).await;

        assert!(!summary.is_failure());
        assert_eq!(summary.removed, vec!["Second"]);
        assert_eq!(summary.retained.len(), 1);
        assert!(summary.retained[0].starts_with("First (removal failed:"));
        // Both removals were still attempted
        assert_eq!(*remover.calls.lock().unwrap(), vec!["aa01", "aa02"]);
    }

    #[tokio::test]
    async fn test_retained_decisions_skip_the_remover() {
        let keep = record("bb01", "Keeper");
        let decisions = vec![RemovalDecision {
            record: &keep,
            reason: None,
        }];

        let remover = FakeRemover::new(&[]);
        let summary = execute(&decisions, &remover, 1000).await;

        assert!(summary.removed.is_empty());
        assert_eq!(summary.retained, vec!["Keeper"]);
        assert!(remover.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_removals_happen_in_input_order() {
        let records: Vec<TorrentRecord> = (0..4)
            .map(|i| record(&format!("cc{:02}", i), &format!("T{}", i)))
            .collect();
        let decisions: Vec<RemovalDecision<'_>> = records
            .iter()
            .map(|r| RemovalDecision {
                record: r,
                reason: Some(RemovalReason::Tracker),
            })
            .collect();

        let remover = FakeRemover::new(&[]);
        let summary = execute(&decisions, &remover, 1000).await;

        assert_eq!(summary.removed, vec!["T0", "T1", "T2", "T3"]);
        assert_eq!(
            *remover.calls.lock().unwrap(),
            vec!["cc00", "cc01", "cc02", "cc03"]
        );
    }

    #[tokio::test]
    async fn test_empty_decisions_yield_empty_summary() {
        let remover = FakeRemover::new(&[]);
        let summary = execute(&[], &remover, 1000).await;

        assert!(summary.removed.is_empty());
        assert!(summary.retained.is_empty());
        assert!(!summary.is_failure());
    }
}
