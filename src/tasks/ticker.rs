//! Counter ticker background task

use std::{sync::Arc, time::Duration};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::AppState;

/// Nominal period between tick firings
pub const TICK_PERIOD: Duration = Duration::from_millis(10);

/// Background task that advances the counter while it is running.
///
/// The task watches the running flag and owns the repeating interval: an
/// interval exists only between a flag transition to true and the next
/// transition to false, so at most one is ever active. Each firing adds
/// exactly one tick; late firings are not compensated for.
pub async fn ticker_task(state: Arc<AppState>) {
    info!("Starting ticker task");

    let mut run_rx = state.run_tx.subscribe();

    loop {
        // Wait for the running flag to turn on
        while !*run_rx.borrow() {
            if run_rx.changed().await.is_err() {
                debug!("Ticker channel closed, stopping ticker task");
                return;
            }
        }

        info!("Ticker activated");
        let mut interval = time::interval_at(time::Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                // Flag changes win over a pending firing
                biased;

                changed = run_rx.changed() => {
                    match changed {
                        Ok(()) => {
                            if !*run_rx.borrow() {
                                info!("Ticker deactivated");
                                break;
                            }
                        }
                        Err(_) => {
                            debug!("Ticker channel closed, stopping ticker task");
                            return;
                        }
                    }
                }

                _ = interval.tick() => {
                    if let Err(e) = state.tick() {
                        error!("Failed to advance counter: {}", e);
                    }
                }
            }
        }
    }
}
