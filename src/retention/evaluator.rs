use crate::models::settings::RetentionSettings;
use crate::models::torrent::TorrentRecord;
use crate::utils::time::clamped_age;
use std::fmt;

/// Which retention rule marked a torrent for removal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovalReason {
    Age,
    Tracker,
    AgeAndTracker,
}

impl fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemovalReason::Age => write!(f, "age"),
            RemovalReason::Tracker => write!(f, "tracker"),
            RemovalReason::AgeAndTracker => write!(f, "age+tracker"),
        }
    }
}

/// Per-torrent verdict produced by `evaluate`. `reason: None` means retain.
#[derive(Clone, Debug, PartialEq)]
pub struct RemovalDecision<'a> {
    pub record: &'a TorrentRecord,
    pub reason: Option<RemovalReason>,
}

impl RemovalDecision<'_> {
    pub fn should_remove(&self) -> bool {
        self.reason.is_some()
    }
}

/// Decide, for each record in a snapshot, whether it should be removed.
///
/// Pure: no I/O, no clock reads, deterministic for a given `now`. Output
/// order matches input order.
///
/// Rules:
/// - age rule: fully completed and at least `min_age_secs` old. Negative
///   ages (creation timestamp ahead of `now`) clamp to zero.
/// - tracker rule: seeding time strictly above `seeding_time_limit_secs`
///   and some tracker URL contains one of the configured substrings
///   (case-sensitive). An empty target list never matches.
pub fn evaluate<'a>(
    records: &'a [TorrentRecord],
    rule: &RetentionSettings,
    now: i64,
) -> Vec<RemovalDecision<'a>> {
    // Saturate: a threshold beyond i64 range means "never", not a wrapped
    // negative that would remove everything
    let min_age = i64::try_from(rule.min_age_secs).unwrap_or(i64::MAX);
    let seeding_limit = i64::try_from(rule.seeding_time_limit_secs).unwrap_or(i64::MAX);

    records
        .iter()
        .map(|record| {
            let age = clamped_age(record.time_added, now);

            let age_rule = record.progress >= 100.0 && age >= min_age;

            let tracker_rule = record.seeding_time > seeding_limit
                && matches_target_tracker(record, &rule.target_trackers);

            let reason = match (age_rule, tracker_rule) {
                (true, true) => Some(RemovalReason::AgeAndTracker),
                (true, false) => Some(RemovalReason::Age),
                (false, true) => Some(RemovalReason::Tracker),
                (false, false) => None,
            };

            RemovalDecision { record, reason }
        })
        .collect()
}

fn matches_target_tracker(record: &TorrentRecord, targets: &[String]) -> bool {
    record
        .trackers
        .iter()
        .any(|url| targets.iter().any(|target| url.contains(target.as_str())))
}
