use crate::core::state::AppState;
use crate::utils::html;
use axum::{extract::State, response::Html};
use std::sync::Arc;

/// Settings form and last run summary
///
/// GET /
pub async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    let settings = state.settings.current();

    let summary_text = match state.runner.last_summary() {
        Some(summary) => summary.render(),
        None => "No completed runs yet.".to_string(),
    };

    let status_note = if state.runner.is_running() {
        "<p><em>A run is currently in progress.</em></p>"
    } else {
        ""
    };

    let trackers = settings.target_trackers.join("\n");

    let page = format!(
        r#"<!DOCTYPE html>
<html>
<head><title>seedsweep</title></head>
<body>
<h1>seedsweep</h1>
{status_note}
<h2>Retention settings</h2>
<form method="post" action="/settings">
<p><label>Minimum age (seconds)<br>
<input type="text" name="min_age_secs" value="{min_age}"></label></p>
<p><label>Seeding time limit (seconds)<br>
<input type="text" name="seeding_time_limit_secs" value="{seeding_limit}"></label></p>
<p><label>Target trackers (one per line)<br>
<textarea name="target_trackers" rows="4" cols="48">{trackers}</textarea></label></p>
<p><label>Schedule interval (seconds, 0 disables)<br>
<input type="text" name="schedule_interval_secs" value="{interval}"></label></p>
<p><input type="submit" value="Save settings"></p>
</form>
<form method="post" action="/run">
<p><input type="submit" value="Run now"></p>
</form>
<h2>Last run</h2>
<pre>{summary}</pre>
</body>
</html>
"#,
        status_note = status_note,
        min_age = settings.min_age_secs,
        seeding_limit = settings.seeding_time_limit_secs,
        trackers = html::escape(&trackers),
        interval = settings.schedule_interval_secs,
        summary = html::escape(&summary_text),
    );

    Html(page)
}
