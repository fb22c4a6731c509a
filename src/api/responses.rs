//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::CounterState;

/// Counter snapshot as rendered to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub elapsed_ticks: u64,
    pub running: bool,
    /// Whole seconds, zero-padded to at least two digits
    pub seconds: String,
    /// Centisecond remainder, always two digits
    pub centiseconds: String,
    /// "running" or "stopped"
    pub status: String,
}

impl From<&CounterState> for CounterSnapshot {
    fn from(state: &CounterState) -> Self {
        Self {
            elapsed_ticks: state.elapsed_ticks,
            running: state.is_running,
            seconds: state.display_seconds(),
            centiseconds: state.display_centiseconds(),
            status: state.status_label().to_string(),
        }
    }
}

/// API response structure for command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub counter: CounterSnapshot,
}

impl ApiResponse {
    /// Create a new API response from the post-command counter state
    pub fn new(message: String, state: &CounterState) -> Self {
        Self {
            status: state.status_label().to_string(),
            message,
            timestamp: Utc::now(),
            counter: CounterSnapshot::from(state),
        }
    }
}

/// Enhanced status response with server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub counter: CounterSnapshot,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: "1.2.0".to_string(),
        }
    }
}
