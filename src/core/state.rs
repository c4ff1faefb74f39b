// Application state (AppState)

use crate::core::config::Config;
use crate::runner::job::JobRunner;
use crate::store::settings::SettingsStore;
use std::sync::Arc;
use tokio::sync::Notify;

/// Shared application state
///
/// Contains all shared components that are accessed by request handlers.
/// All fields are wrapped in Arc for efficient cloning across threads.
#[derive(Clone)]
pub struct AppState {
    /// Static configuration loaded at startup
    pub config: Arc<Config>,

    /// Editable retention settings with JSON persistence
    pub settings: Arc<SettingsStore>,

    /// Serialized retention runs plus the last run summary
    pub runner: Arc<JobRunner>,

    /// Signalled when the schedule interval may have changed
    pub schedule_changed: Arc<Notify>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);

        let settings = Arc::new(SettingsStore::load(
            config.server.settings_path.clone(),
            config.retention.clone(),
        ));

        let runner = Arc::new(JobRunner::new(
            config.deluge.clone(),
            Arc::clone(&settings),
        ));

        Self {
            config,
            settings,
            runner,
            schedule_changed: Arc::new(Notify::new()),
        }
    }
}
