use crate::core::state::AppState;
use crate::runner::job::RunOutcome;
use axum::{extract::State, response::Redirect};
use std::sync::Arc;
use tracing::info;

/// Trigger a retention run on demand
///
/// POST /run
///
/// Blocks until the run reaches a terminal state, then redirects back to
/// the summary page. A request racing an in-progress run is a no-op and
/// redirects the same way.
pub async fn run_now_handler(State(state): State<Arc<AppState>>) -> Redirect {
    match state.runner.run().await {
        RunOutcome::Completed => info!("On-demand retention run finished"),
        RunOutcome::Skipped => info!("On-demand run skipped, another run is in progress"),
    }

    Redirect::to("/")
}
