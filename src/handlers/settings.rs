use crate::core::error::ApiError;
use crate::core::state::AppState;
use crate::models::settings::RetentionSettings;
use axum::{
    extract::{Form, State},
    response::Redirect,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Raw form fields as submitted by the settings page.
///
/// Numeric fields arrive as strings so a bad value can be rejected with a
/// message naming the field instead of a generic deserialization error.
#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    pub min_age_secs: String,
    pub seeding_time_limit_secs: String,
    pub target_trackers: String,
    pub schedule_interval_secs: String,
}

/// Save retention settings from the web form
///
/// POST /settings
///
/// A malformed submission is rejected here, before anything is persisted
/// or any run is affected.
pub async fn save_settings_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SettingsForm>,
) -> Result<Redirect, ApiError> {
    let settings = parse_form(&form).inspect_err(|e| {
        warn!(error = %e, "Rejected settings submission");
    })?;

    state
        .settings
        .save(settings)
        .map_err(|e| ApiError::InternalError(format!("failed to save settings: {}", e)))?;

    // Wake the scheduler so a changed interval applies immediately
    state.schedule_changed.notify_one();

    info!("Retention settings updated via web form");
    Ok(Redirect::to("/"))
}

fn parse_form(form: &SettingsForm) -> Result<RetentionSettings, ApiError> {
    let min_age_secs = parse_field("min_age_secs", &form.min_age_secs)?;
    let seeding_time_limit_secs =
        parse_field("seeding_time_limit_secs", &form.seeding_time_limit_secs)?;
    let schedule_interval_secs =
        parse_field("schedule_interval_secs", &form.schedule_interval_secs)?;

    // One target per line; blank lines and surrounding whitespace dropped
    let target_trackers = form
        .target_trackers
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    Ok(RetentionSettings {
        min_age_secs,
        seeding_time_limit_secs,
        target_trackers,
        schedule_interval_secs,
    })
}

fn parse_field(name: &str, value: &str) -> Result<u64, ApiError> {
    value.trim().parse::<u64>().map_err(|_| {
        ApiError::InvalidParameter(format!("{} must be a non-negative integer", name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(min_age: &str, seeding: &str, trackers: &str, interval: &str) -> SettingsForm {
        SettingsForm {
            min_age_secs: min_age.to_string(),
            seeding_time_limit_secs: seeding.to_string(),
            target_trackers: trackers.to_string(),
            schedule_interval_secs: interval.to_string(),
        }
    }

    #[test]
    fn test_parse_valid_form() {
        let parsed = parse_form(&form(
            "1209600",
            "288000",
            "trnt.tracker.com\nother.example",
            "3600",
        ))
        .unwrap();

        assert_eq!(parsed.min_age_secs, 1_209_600);
        assert_eq!(parsed.seeding_time_limit_secs, 288_000);
        assert_eq!(
            parsed.target_trackers,
            vec!["trnt.tracker.com", "other.example"]
        );
        assert_eq!(parsed.schedule_interval_secs, 3600);
    }

    #[test]
    fn test_parse_rejects_non_numeric_threshold() {
        let err = parse_form(&form("fourteen days", "288000", "", "3600")).unwrap_err();
        assert!(err.to_string().contains("min_age_secs"));
    }

    #[test]
    fn test_parse_trims_and_drops_blank_tracker_lines() {
        let parsed = parse_form(&form("0", "0", "  trnt.tracker.com  \n\n   \n", "0")).unwrap();
        assert_eq!(parsed.target_trackers, vec!["trnt.tracker.com"]);
    }

    #[test]
    fn test_parse_empty_tracker_box_means_no_targets() {
        let parsed = parse_form(&form("0", "0", "", "0")).unwrap();
        assert!(parsed.target_trackers.is_empty());
    }

    #[test]
    fn test_parse_tolerates_whitespace_around_numbers() {
        let parsed = parse_form(&form(" 600 ", "0", "", "0")).unwrap();
        assert_eq!(parsed.min_age_secs, 600);
    }
}
