//! Brew Timers - brew-stage and backwash-cycle timers served over HTTP
//!
//! This is the main entry point for the brew-timers application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use brew_timers::{
    api::create_router,
    config::Config,
    services::check_cue_command,
    state::AppState,
    tasks::cue_player_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("brew_timers={},tower_http=info", config.log_level()))
        .init();

    info!("Starting brew-timers server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, stage1={}s, stage2={}s, sound={}",
        config.host, config.port, config.stage1, config.stage2, !config.no_sound
    );

    // Cues are optional, so a missing player only costs the sound
    let cue_settings = config.cue_settings();
    if let Err(e) = check_cue_command(&cue_settings) {
        warn!("{}, cues will fail silently", e);
    }

    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.brew_durations(),
    ));

    tokio::spawn(cue_player_task(cue_settings, state.subscribe()));

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /brew/start              - Start or resume the brew timer");
    info!("  POST /brew/pause              - Pause the brew timer");
    info!("  POST /brew/reset              - Reset the brew timer");
    info!("  PUT  /brew/durations          - Edit brew durations (resets)");
    info!("  POST /backwash/long/start     - 10s on / 10s off x 5");
    info!("  POST /backwash/short/start    - 5s on / 5s off x 10");
    info!("  POST /backwash/stop           - Stop the backwash cycle");
    info!("  GET  /status                  - Both timers");
    info!("  GET  /events                  - Server-sent timer events");
    info!("  GET  /health                  - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.shutdown();
    info!("Server shutdown complete");
    Ok(())
}
