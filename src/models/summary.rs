/// Outcome of one completed run.
///
/// Exactly one summary is "current" at any time — the job runner overwrites
/// its slot wholesale when a run reaches a terminal state, including total
/// failure. The presentation layer consumes `render()` verbatim.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// Names of torrents removed this run, in processing order
    pub removed: Vec<String>,
    /// Names of torrents retained this run (including failed removals), in processing order
    pub retained: Vec<String>,
    /// Set when the run aborted before removals could be attempted
    pub failure: Option<String>,
    /// Unix timestamp the run reached its terminal state
    pub finished_at: i64,
}

pub const NO_REMOVALS_SENTINEL: &str = "no torrents removed";
pub const ALL_REMOVED_SENTINEL: &str = "all torrents were removed";

impl RunSummary {
    pub fn new(finished_at: i64) -> Self {
        Self {
            removed: Vec::new(),
            retained: Vec::new(),
            failure: None,
            finished_at,
        }
    }

    /// Summary for a run that failed before any removal was attempted
    pub fn failed(reason: impl Into<String>, finished_at: i64) -> Self {
        Self {
            removed: Vec::new(),
            retained: Vec::new(),
            failure: Some(reason.into()),
            finished_at,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }

    /// Plain-text rendering consumed by the presentation layer
    pub fn render(&self) -> String {
        if let Some(reason) = &self.failure {
            return format!("Run failed: {}", reason);
        }

        let removed = if self.removed.is_empty() {
            NO_REMOVALS_SENTINEL.to_string()
        } else {
            self.removed.join("\n")
        };

        let retained = if self.retained.is_empty() {
            ALL_REMOVED_SENTINEL.to_string()
        } else {
            self.retained.join("\n")
        };

        format!(
            "Removed torrents:\n{}\n\nTorrents not removed:\n{}",
            removed, retained
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty_run() {
        let summary = RunSummary::new(1000);
        let text = summary.render();
        assert!(text.contains(NO_REMOVALS_SENTINEL));
        assert!(text.contains(ALL_REMOVED_SENTINEL));
    }

    #[test]
    fn test_render_lists_names() {
        let mut summary = RunSummary::new(1000);
        summary.removed.push("Old.Show.S01".to_string());
        summary.retained.push("Fresh.Movie".to_string());

        let text = summary.render();
        assert!(text.contains("Removed torrents:\nOld.Show.S01"));
        assert!(text.contains("Torrents not removed:\nFresh.Movie"));
        assert!(!text.contains(NO_REMOVALS_SENTINEL));
        assert!(!text.contains(ALL_REMOVED_SENTINEL));
    }

    #[test]
    fn test_render_all_removed() {
        let mut summary = RunSummary::new(1000);
        summary.removed.push("a".to_string());
        summary.removed.push("b".to_string());

        let text = summary.render();
        assert!(text.contains("a\nb"));
        assert!(text.contains(ALL_REMOVED_SENTINEL));
    }

    #[test]
    fn test_render_failure() {
        let summary = RunSummary::failed("daemon unreachable", 1000);
        assert!(summary.is_failure());
        assert_eq!(summary.render(), "Run failed: daemon unreachable");
    }
}
