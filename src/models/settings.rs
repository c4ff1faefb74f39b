use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Editable retention rule configuration.
///
/// Initial values come from `[retention]` in config.toml; the web form can
/// overwrite them at runtime through the settings store. The core never
/// mutates these during a run — the job runner snapshots them once at run
/// start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionSettings {
    /// Seeding time a torrent must exceed before the tracker rule applies
    #[serde(default = "default_seeding_time_limit")]
    pub seeding_time_limit_secs: u64,

    /// Age a completed torrent must reach before the age rule applies
    #[serde(default = "default_min_age")]
    pub min_age_secs: u64,

    /// Tracker URL substrings targeted by the tracker rule.
    /// Empty list means the tracker rule never matches.
    #[serde(default)]
    pub target_trackers: Vec<String>,

    /// Interval between scheduled runs. Zero disables the timer.
    #[serde(default = "default_schedule_interval")]
    pub schedule_interval_secs: u64,
}

fn default_seeding_time_limit() -> u64 {
    288_000 // 80 hours
}

fn default_min_age() -> u64 {
    1_209_600 // 14 days
}

fn default_schedule_interval() -> u64 {
    3600 // 1 hour
}

impl Default for RetentionSettings {
    fn default() -> Self {
        Self {
            seeding_time_limit_secs: default_seeding_time_limit(),
            min_age_secs: default_min_age(),
            target_trackers: Vec::new(),
            schedule_interval_secs: default_schedule_interval(),
        }
    }
}

impl RetentionSettings {
    /// Validate settings values
    ///
    /// An empty-string tracker target would turn the substring match into
    /// match-everything, so it is rejected here at the boundary instead of
    /// being special-cased in the evaluator.
    pub fn validate(&self) -> Result<()> {
        for target in &self.target_trackers {
            if target.trim().is_empty() {
                bail!("target_trackers entries must not be empty");
            }
        }
        Ok(())
    }
}
