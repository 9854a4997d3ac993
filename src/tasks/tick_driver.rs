//! Tick source background task

use std::sync::Arc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::AppState;

/// Background task that produces ticks while a subscription is live.
///
/// Each subscription gets its own interval. Any change on the control
/// channel tears the interval down before the next tick, and every tick is
/// tagged with the subscription it was created for.
pub async fn tick_driver_task(state: Arc<AppState>) {
    info!("Starting tick driver task ({:?} period)", state.tick_period);

    let mut control_rx = state.tick_control_tx.subscribe();

    loop {
        let control = *control_rx.borrow_and_update();

        if !control.active {
            if control_rx.changed().await.is_err() {
                debug!("Tick control channel closed");
                return;
            }
            continue;
        }

        debug!("Tick subscription #{} active", control.subscription);
        let period = state.tick_period;
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = state.on_tick(control.subscription) {
                        error!("Failed to apply tick: {}", e);
                    }
                }

                changed = control_rx.changed() => {
                    if changed.is_err() {
                        debug!("Tick control channel closed");
                        return;
                    }
                    debug!("Tick subscription #{} ended", control.subscription);
                    break;
                }
            }
        }
    }
}
