use crate::models::settings::RetentionSettings;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::RwLock;
use tracing::{info, warn};

/// Durable store for the editable retention settings.
///
/// Values from `[retention]` in config.toml act as defaults; a JSON
/// override file written on every form save takes precedence at startup.
/// The in-memory copy is the single source of truth while running.
pub struct SettingsStore {
    path: PathBuf,
    current: RwLock<RetentionSettings>,
}

impl SettingsStore {
    /// Build the store, preferring a valid override file over the defaults.
    ///
    /// A missing file is normal (first start). A malformed or invalid file
    /// is logged and ignored so a bad edit cannot keep the service down.
    pub fn load(path: PathBuf, defaults: RetentionSettings) -> Self {
        let initial = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<RetentionSettings>(&content) {
                Ok(saved) => match saved.validate() {
                    Ok(()) => {
                        info!(path = %path.display(), "Loaded saved retention settings");
                        saved
                    }
                    Err(e) => {
                        warn!(
                            path = %path.display(),
                            error = %e,
                            "Saved retention settings are invalid, using configured defaults"
                        );
                        defaults
                    }
                },
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to parse saved retention settings, using configured defaults"
                    );
                    defaults
                }
            },
            // A missing file is a normal first start; anything else is a
            // real I/O problem worth surfacing
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => defaults,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to read saved retention settings, using configured defaults"
                );
                defaults
            }
        };

        Self {
            path,
            current: RwLock::new(initial),
        }
    }

    /// Snapshot of the current settings
    pub fn current(&self) -> RetentionSettings {
        self.current
            .read()
            .expect("settings lock poisoned")
            .clone()
    }

    /// Validate, persist, and apply new settings
    pub fn save(&self, settings: RetentionSettings) -> Result<()> {
        settings.validate()?;

        let json = serde_json::to_string_pretty(&settings)
            .context("Failed to serialize retention settings")?;
        std::fs::write(&self.path, json).context(format!(
            "Failed to write retention settings to {}",
            self.path.display()
        ))?;

        *self.current.write().expect("settings lock poisoned") = settings;

        info!(path = %self.path.display(), "Retention settings saved");
        Ok(())
    }
}
