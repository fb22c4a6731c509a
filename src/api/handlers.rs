//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::state::{AppState, CommandOutcome};
use super::responses::{ApiResponse, CounterSnapshot, HealthResponse, StatusResponse};

/// Handle POST /play - Start the counter
pub async fn play_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.play() {
        Ok(CommandOutcome::Applied(counter)) => {
            info!("Play endpoint called - counter started");
            Ok(Json(ApiResponse::new("Counter started".to_string(), &counter)))
        }
        Ok(CommandOutcome::NoOp(counter)) => {
            info!("Play endpoint called - counter already running");
            Ok(Json(ApiResponse::new("Counter already running".to_string(), &counter)))
        }
        Err(e) => {
            error!("Failed to start counter: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /pause - Stop the counter, keeping the elapsed count
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.pause() {
        Ok(CommandOutcome::Applied(counter)) => {
            info!("Pause endpoint called - counter paused");
            Ok(Json(ApiResponse::new("Counter paused".to_string(), &counter)))
        }
        Ok(CommandOutcome::NoOp(counter)) => {
            info!("Pause endpoint called - counter already stopped");
            Ok(Json(ApiResponse::new("Counter already stopped".to_string(), &counter)))
        }
        Err(e) => {
            error!("Failed to pause counter: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /reset - Stop the counter and clear the elapsed count
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.reset() {
        Ok(outcome) => {
            info!("Reset endpoint called - counter reset");
            Ok(Json(ApiResponse::new("Counter reset".to_string(), outcome.state())))
        }
        Err(e) => {
            error!("Failed to reset counter: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return the counter snapshot and server metadata
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let counter = match state.get_counter() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to get counter state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        counter: CounterSnapshot::from(&counter),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
