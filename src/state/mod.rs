//! State management module
//!
//! This module contains all state-related structures and their management logic.

pub mod counter_state;
pub mod app_state;

// Re-export main types
pub use counter_state::CounterState;
pub use app_state::{AppState, CommandOutcome};
