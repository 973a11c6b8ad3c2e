//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, warn};

use crate::{
    state::{AppState, TimerState},
    timer::{BrewInputs, CyclePreset},
};
use super::responses::{ApiResponse, HealthResponse, StatusResponse};

fn respond(
    action: &str,
    result: Result<TimerState, String>,
    message: &str,
) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok(timer) => {
            debug!("{} endpoint called - {}", action, timer.label);
            Ok(Json(ApiResponse::new(message, timer)))
        }
        Err(e) => {
            error!("{} failed: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /brew/start - Start or resume the brew timer
pub async fn brew_start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("brew-start", state.start_brew(), "Brew timer started")
}

/// Handle POST /brew/pause - Pause the brew timer
pub async fn brew_pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("brew-pause", state.pause_brew(), "Brew timer paused")
}

/// Handle POST /brew/reset - Reset the brew timer from the stored inputs
pub async fn brew_reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("brew-reset", state.reset_brew(), "Brew timer reset")
}

/// Handle PUT /brew/durations - Edit the duration inputs, resetting the timer
pub async fn brew_durations_handler(
    State(state): State<Arc<AppState>>,
    Json(inputs): Json<BrewInputs>,
) -> Result<Json<ApiResponse>, StatusCode> {
    respond(
        "brew-durations",
        state.edit_brew_durations(inputs),
        "Brew durations updated",
    )
}

/// Handle POST /backwash/:preset/start - Start a backwash preset
pub async fn backwash_start_handler(
    State(state): State<Arc<AppState>>,
    Path(preset_name): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let Some(preset) = CyclePreset::from_name(&preset_name) else {
        warn!("Unknown backwash preset: {}", preset_name);
        return Err(StatusCode::NOT_FOUND);
    };
    respond(
        "backwash-start",
        state.start_backwash(preset),
        &format!("Backwash {} started", preset_name),
    )
}

/// Handle POST /backwash/stop - Stop the backwash cycle
pub async fn backwash_stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("backwash-stop", state.stop_backwash(), "Backwash stopped")
}

/// Handle GET /status - Return both timers and server metadata
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let lookup = || -> Result<StatusResponse, String> {
        let (last_action, last_action_time) = state.get_last_action();
        Ok(StatusResponse {
            brew: state.get_brew_state()?,
            brew_inputs: state.get_brew_inputs()?,
            backwash: state.get_backwash_state()?,
            uptime: state.get_uptime(),
            port: state.port,
            host: state.host.clone(),
            last_action,
            last_action_time,
        })
    };

    lookup().map(Json).map_err(|e| {
        error!("Failed to collect status: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle GET /events - Stream timer events as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Event stream subscriber connected");
    let events_rx = state.subscribe();

    let stream = stream::unfold(events_rx, |mut events_rx| async move {
        loop {
            match events_rx.recv().await {
                Ok(event) => match Event::default().json_data(&event) {
                    Ok(sse_event) => return Some((Ok::<_, Infallible>(sse_event), events_rx)),
                    Err(e) => warn!("Failed to encode timer event: {}", e),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream subscriber lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
