use anyhow::{Context, Result};
use axum::serve;
use seedsweep::core::config::Config;
use seedsweep::core::state::AppState;
use seedsweep::core::{routes, tracing_init};
use seedsweep::runner::scheduler::spawn_schedule_task;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let config_path = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        PathBuf::from("config.toml")
    };

    // Load and validate configuration
    let config = Config::from_file(&config_path)
        .context(format!(
            "Failed to load configuration from '{}'. \
            If this is your first time running seedsweep, copy config.example.toml to config.toml and adjust the values.",
            config_path.display()
        ))?;

    // Initialize tracing/logging
    tracing_init::init_tracing(&config.logging)
        .context("Failed to initialize logging")?;

    // Build Tokio runtime with configured number of threads
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.num_threads)
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    // Run the async main function
    runtime.block_on(async_main(config, config_path))
}

async fn async_main(config: Config, config_path: PathBuf) -> Result<()> {
    info!(
        config_path = %config_path.display(),
        port = config.server.port,
        deluge_url = %config.deluge.base_url(),
        num_threads = config.server.num_threads,
        log_level = %config.logging.level,
        log_format = %config.logging.format,
        "seedsweep starting"
    );

    // Create application state; loads any saved retention settings
    let state = Arc::new(AppState::new(config.clone()));

    let settings = state.settings.current();
    info!(
        min_age_secs = settings.min_age_secs,
        seeding_time_limit_secs = settings.seeding_time_limit_secs,
        target_trackers = settings.target_trackers.len(),
        schedule_interval_secs = settings.schedule_interval_secs,
        "Retention settings loaded"
    );

    // Spawn the scheduled-run task; interval 0 installs no timer
    spawn_schedule_task(
        Arc::clone(&state.runner),
        Arc::clone(&state.settings),
        Arc::clone(&state.schedule_changed),
    );

    // Build the router with middleware
    let app = routes::build_router(Arc::clone(&state))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG))
                )
        );

    // Start HTTP server
    let addr = format!("0.0.0.0:{}", config.server.port);
    info!(address = %addr, "Starting TCP listener");

    let listener = TcpListener::bind(&addr).await
        .context(format!("Failed to bind TCP listener to {}", addr))?;

    info!(address = %addr, "Web UI available");

    serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Shutting down gracefully");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
