//! Counter state structure, display formatting, and persistence

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::store::{KvStore, COUNT_KEY, RUNNING_KEY};

/// Counter state - the elapsed tick count and running flag
///
/// One tick is 1/100 of a second.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterState {
    /// Ticks accumulated while running, never negative
    pub elapsed_ticks: u64,
    /// Whether the ticker is currently advancing the count
    pub is_running: bool,
}

impl CounterState {
    /// Create a fresh counter state (zero ticks, stopped)
    pub fn new() -> Self {
        Self {
            elapsed_ticks: 0,
            is_running: false,
        }
    }

    /// Load the persisted counter state from the store.
    ///
    /// Missing or unparsable values fall back to the fresh defaults. Read
    /// failures are logged and never propagated.
    pub fn load(store: &dyn KvStore) -> Self {
        let elapsed_ticks = match store.get(COUNT_KEY) {
            Ok(Some(value)) => match value.parse() {
                Ok(ticks) => ticks,
                Err(_) => {
                    warn!("Persisted count {:?} is not a valid tick count, using 0", value);
                    0
                }
            },
            Ok(None) => 0,
            Err(e) => {
                warn!("Failed to read persisted count: {}, using 0", e);
                0
            }
        };

        // Only the literal string "true" means running
        let is_running = match store.get(RUNNING_KEY) {
            Ok(Some(value)) => value == "true",
            Ok(None) => false,
            Err(e) => {
                warn!("Failed to read persisted running flag: {}, using false", e);
                false
            }
        };

        debug!("Loaded counter state: ticks={}, running={}", elapsed_ticks, is_running);
        Self {
            elapsed_ticks,
            is_running,
        }
    }

    /// Persist both values to the store.
    ///
    /// Write failures are logged and never propagated; the in-memory state
    /// is already current when this is called.
    pub fn save(&self, store: &dyn KvStore) {
        if let Err(e) = store.set(COUNT_KEY, &self.elapsed_ticks.to_string()) {
            warn!("Failed to persist count: {}", e);
        }

        let running = if self.is_running { "true" } else { "false" };
        if let Err(e) = store.set(RUNNING_KEY, running) {
            warn!("Failed to persist running flag: {}", e);
        }
    }

    /// Whole seconds, zero-padded to at least two digits
    pub fn display_seconds(&self) -> String {
        format!("{:02}", self.elapsed_ticks / 100)
    }

    /// Centisecond remainder, always two digits
    pub fn display_centiseconds(&self) -> String {
        format!("{:02}", self.elapsed_ticks % 100)
    }

    /// Binary status label derived from the running flag
    pub fn status_label(&self) -> &'static str {
        if self.is_running {
            "running"
        } else {
            "stopped"
        }
    }
}

impl Default for CounterState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[derive(Debug)]
    struct FailingStore;

    impl KvStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, String> {
            Err("store offline".to_string())
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), String> {
            Err("store offline".to_string())
        }
    }

    fn state_with(ticks: u64, running: bool) -> CounterState {
        CounterState {
            elapsed_ticks: ticks,
            is_running: running,
        }
    }

    #[test]
    fn display_splits_ticks_into_seconds_and_centiseconds() {
        let cases = [
            (0, "00", "00"),
            (59, "00", "59"),
            (75, "00", "75"),
            (100, "01", "00"),
            (305, "03", "05"),
            (5999, "59", "99"),
            (12345, "123", "45"),
        ];

        for (ticks, seconds, centiseconds) in cases {
            let state = state_with(ticks, false);
            assert_eq!(state.display_seconds(), seconds, "seconds for {} ticks", ticks);
            assert_eq!(
                state.display_centiseconds(),
                centiseconds,
                "centiseconds for {} ticks",
                ticks
            );
        }
    }

    #[test]
    fn status_label_follows_running_flag() {
        assert_eq!(state_with(0, true).status_label(), "running");
        assert_eq!(state_with(0, false).status_label(), "stopped");
    }

    #[test]
    fn load_from_empty_store_uses_defaults() {
        let store = MemoryStore::new();
        let state = CounterState::load(&store);

        assert_eq!(state.elapsed_ticks, 0);
        assert!(!state.is_running);
    }

    #[test]
    fn load_with_unparsable_count_uses_zero() {
        let store = MemoryStore::new();
        store.set(COUNT_KEY, "not-a-number").unwrap();
        store.set(RUNNING_KEY, "true").unwrap();

        let state = CounterState::load(&store);
        assert_eq!(state.elapsed_ticks, 0);
        assert!(state.is_running);
    }

    #[test]
    fn load_rejects_negative_counts() {
        let store = MemoryStore::new();
        store.set(COUNT_KEY, "-17").unwrap();

        let state = CounterState::load(&store);
        assert_eq!(state.elapsed_ticks, 0);
    }

    #[test]
    fn only_literal_true_means_running() {
        for value in ["true"] {
            let store = MemoryStore::new();
            store.set(RUNNING_KEY, value).unwrap();
            assert!(CounterState::load(&store).is_running);
        }

        for value in ["TRUE", "True", "1", "yes", "false", ""] {
            let store = MemoryStore::new();
            store.set(RUNNING_KEY, value).unwrap();
            assert!(!CounterState::load(&store).is_running, "value {:?}", value);
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = MemoryStore::new();
        state_with(12345, true).save(&store);

        let loaded = CounterState::load(&store);
        assert_eq!(loaded.elapsed_ticks, 12345);
        assert!(loaded.is_running);
    }

    #[test]
    fn load_from_failing_store_uses_defaults() {
        let state = CounterState::load(&FailingStore);

        assert_eq!(state.elapsed_ticks, 0);
        assert!(!state.is_running);
    }

    #[test]
    fn save_to_failing_store_does_not_panic() {
        state_with(42, true).save(&FailingStore);
    }
}
