use crate::runner::job::JobRunner;
use crate::store::settings::SettingsStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, info};

/// Spawn the background task that fires scheduled retention runs.
///
/// The interval is re-read from the settings store on every pass, so a form
/// save takes effect without a restart: `changed` is signalled by the
/// settings handler and interrupts the current sleep. An interval of zero
/// installs no timer; the task parks until the settings change again.
///
/// The task itself never retries a failed run. The next tick is the retry.
pub fn spawn_schedule_task(
    runner: Arc<JobRunner>,
    settings: Arc<SettingsStore>,
    changed: Arc<Notify>,
) {
    tokio::spawn(async move {
        loop {
            let interval_secs = settings.current().schedule_interval_secs;

            if interval_secs == 0 {
                info!("Automatic retention runs disabled, waiting for settings change");
                changed.notified().await;
                continue;
            }

            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(interval_secs)) => {
                    debug!(interval_secs, "Schedule interval elapsed");
                    runner.run().await;
                }
                _ = changed.notified() => {
                    debug!("Settings changed, re-reading schedule interval");
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DelugeConfig;
    use crate::models::settings::RetentionSettings;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_zero_interval_never_fires_a_run() {
        let dir = tempdir().unwrap();
        let deluge = DelugeConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            username: "localclient".to_string(),
            password: "deluge".to_string(),
            remove_data: true,
            request_timeout_secs: 5,
        };
        let settings = Arc::new(SettingsStore::load(
            dir.path().join("settings.json"),
            RetentionSettings {
                schedule_interval_secs: 0,
                ..Default::default()
            },
        ));
        let runner = Arc::new(JobRunner::new(deluge, Arc::clone(&settings)));
        let changed = Arc::new(Notify::new());

        spawn_schedule_task(Arc::clone(&runner), settings, Arc::clone(&changed));

        // Give the task time to park; no run may have started
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(runner.last_summary().is_none());
        assert!(!runner.is_running());
    }
}
