// HTTP routes configuration

use crate::core::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Settings form + last run summary
        .route("/", get(crate::handlers::ui::index_handler))
        .route("/settings", post(crate::handlers::settings::save_settings_handler))
        .route("/run", post(crate::handlers::run::run_now_handler))
        .route("/health", get(crate::handlers::health::health_handler))
        // 404 fallback for all unmatched routes
        .fallback(crate::handlers::fallback::fallback_handler)
        .with_state(state)
}
