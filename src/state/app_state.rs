//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::store::KvStore;
use super::CounterState;

/// Outcome of a counter command
#[derive(Debug, Clone)]
pub enum CommandOutcome {
    /// The command changed the counter state
    Applied(CounterState),
    /// The command left the counter state unchanged
    NoOp(CounterState),
}

impl CommandOutcome {
    /// The counter state after the command
    pub fn state(&self) -> &CounterState {
        match self {
            Self::Applied(state) | Self::NoOp(state) => state,
        }
    }
}

/// Main application state that owns the counter and its ticker control
#[derive(Debug)]
pub struct AppState {
    /// Current counter state
    pub counter: Arc<Mutex<CounterState>>,
    /// Persistent store the counter is saved to
    pub store: Arc<dyn KvStore>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel carrying the running flag to the ticker task
    pub run_tx: watch::Sender<bool>,
    /// Keep the receiver alive to prevent channel closure
    pub _run_rx: watch::Receiver<bool>,
}

impl AppState {
    /// Create a new AppState, restoring the persisted counter state.
    ///
    /// The store is read exactly once, here; the ticker channel starts with
    /// the loaded running flag so a persisted running counter resumes.
    pub fn new(store: Arc<dyn KvStore>, port: u16, host: String) -> Self {
        let counter = CounterState::load(store.as_ref());
        let (run_tx, run_rx) = watch::channel(counter.is_running);

        Self {
            counter: Arc::new(Mutex::new(counter)),
            store,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            run_tx,
            _run_rx: run_rx,
        }
    }

    /// Persist the counter, record the action, and update the ticker flag
    fn commit(&self, action: &str, counter: &CounterState) {
        counter.save(self.store.as_ref());

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        if let Err(e) = self.run_tx.send(counter.is_running) {
            warn!("Failed to send ticker update: {}", e);
        }
    }

    /// Start the counter. No-op if it is already running.
    pub fn play(&self) -> Result<CommandOutcome, String> {
        let mut counter = self.counter.lock()
            .map_err(|e| format!("Failed to lock counter state: {}", e))?;

        if counter.is_running {
            return Ok(CommandOutcome::NoOp(counter.clone()));
        }

        counter.is_running = true;
        let new_state = counter.clone();
        drop(counter); // Release the lock early

        info!("Counter started at {} ticks", new_state.elapsed_ticks);
        self.commit("play", &new_state);
        Ok(CommandOutcome::Applied(new_state))
    }

    /// Stop the counter. No-op if it is already stopped.
    pub fn pause(&self) -> Result<CommandOutcome, String> {
        let mut counter = self.counter.lock()
            .map_err(|e| format!("Failed to lock counter state: {}", e))?;

        if !counter.is_running {
            return Ok(CommandOutcome::NoOp(counter.clone()));
        }

        counter.is_running = false;
        let new_state = counter.clone();
        drop(counter);

        info!("Counter paused at {} ticks", new_state.elapsed_ticks);
        self.commit("pause", &new_state);
        Ok(CommandOutcome::Applied(new_state))
    }

    /// Stop the counter and clear the elapsed count. Always applies.
    pub fn reset(&self) -> Result<CommandOutcome, String> {
        let mut counter = self.counter.lock()
            .map_err(|e| format!("Failed to lock counter state: {}", e))?;

        counter.is_running = false;
        counter.elapsed_ticks = 0;
        let new_state = counter.clone();
        drop(counter);

        info!("Counter reset");
        self.commit("reset", &new_state);
        Ok(CommandOutcome::Applied(new_state))
    }

    /// Advance the counter by one tick and persist it.
    ///
    /// Does nothing when the counter is stopped; the ticker task is the
    /// only caller.
    pub fn tick(&self) -> Result<(), String> {
        let mut counter = self.counter.lock()
            .map_err(|e| format!("Failed to lock counter state: {}", e))?;

        if !counter.is_running {
            return Ok(());
        }

        counter.elapsed_ticks += 1;
        let new_state = counter.clone();
        drop(counter);

        new_state.save(self.store.as_ref());
        Ok(())
    }

    /// Get a copy of the current counter state
    pub fn get_counter(&self) -> Result<CounterState, String> {
        self.counter.lock()
            .map(|counter| counter.clone())
            .map_err(|e| format!("Failed to lock counter state: {}", e))
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, COUNT_KEY, RUNNING_KEY};

    fn test_state() -> AppState {
        AppState::new(Arc::new(MemoryStore::new()), 0, "localhost".to_string())
    }

    #[test]
    fn play_starts_a_stopped_counter() {
        let state = test_state();

        let outcome = state.play().unwrap();
        assert!(matches!(outcome, CommandOutcome::Applied(_)));
        assert!(outcome.state().is_running);
        assert!(*state.run_tx.borrow());
    }

    #[test]
    fn play_while_running_is_a_noop() {
        let state = test_state();
        state.play().unwrap();

        let outcome = state.play().unwrap();
        assert!(matches!(outcome, CommandOutcome::NoOp(_)));
        assert!(outcome.state().is_running);
    }

    #[test]
    fn pause_while_stopped_is_a_noop() {
        let state = test_state();

        let outcome = state.pause().unwrap();
        assert!(matches!(outcome, CommandOutcome::NoOp(_)));
        assert!(!outcome.state().is_running);
    }

    #[test]
    fn pause_keeps_the_elapsed_count() {
        let state = test_state();
        state.play().unwrap();
        state.tick().unwrap();
        state.tick().unwrap();

        let outcome = state.pause().unwrap();
        assert!(matches!(outcome, CommandOutcome::Applied(_)));
        assert_eq!(outcome.state().elapsed_ticks, 2);
        assert!(!*state.run_tx.borrow());
    }

    #[test]
    fn reset_always_yields_zero_and_stopped() {
        let state = test_state();
        state.play().unwrap();
        state.tick().unwrap();

        let outcome = state.reset().unwrap();
        assert!(matches!(outcome, CommandOutcome::Applied(_)));
        assert_eq!(outcome.state().elapsed_ticks, 0);
        assert!(!outcome.state().is_running);

        // Reset applies from the stopped state too
        let outcome = state.reset().unwrap();
        assert!(matches!(outcome, CommandOutcome::Applied(_)));
    }

    #[test]
    fn tick_is_ignored_while_stopped() {
        let state = test_state();

        state.tick().unwrap();
        assert_eq!(state.get_counter().unwrap().elapsed_ticks, 0);
    }

    #[test]
    fn commands_persist_to_the_store() {
        let store = Arc::new(MemoryStore::new());
        let state =
            AppState::new(Arc::clone(&store) as Arc<dyn KvStore>, 0, "localhost".to_string());

        state.play().unwrap();
        state.tick().unwrap();
        state.pause().unwrap();

        assert_eq!(store.get(COUNT_KEY).unwrap(), Some("1".to_string()));
        assert_eq!(store.get(RUNNING_KEY).unwrap(), Some("false".to_string()));
    }

    #[test]
    fn state_survives_a_restart_through_the_store() {
        let store = Arc::new(MemoryStore::new());

        {
            let state =
                AppState::new(Arc::clone(&store) as Arc<dyn KvStore>, 0, "localhost".to_string());
            state.play().unwrap();
            for _ in 0..5 {
                state.tick().unwrap();
            }
            state.pause().unwrap();
        }

        let state = AppState::new(store, 0, "localhost".to_string());
        let counter = state.get_counter().unwrap();
        assert_eq!(counter.elapsed_ticks, 5);
        assert!(!counter.is_running);
    }

    #[test]
    fn loaded_running_flag_seeds_the_ticker_channel() {
        let store = Arc::new(MemoryStore::new());
        store.set(RUNNING_KEY, "true").unwrap();

        let state = AppState::new(store, 0, "localhost".to_string());
        assert!(*state.run_tx.borrow());
    }

    #[test]
    fn last_action_tracks_the_latest_command() {
        let state = test_state();
        state.play().unwrap();
        state.reset().unwrap();

        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("reset"));
        assert!(time.is_some());
    }
}
