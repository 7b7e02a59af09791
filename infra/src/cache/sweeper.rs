//! Background sweep of expired OTP records

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use pv_core::services::otp::{Clock, OtpStore};

/// Spawn a task that drops expired records every `interval`
///
/// Without it, codes that are never verified would stay in memory until
/// overwritten. The task runs until the returned handle is aborted.
pub fn spawn_expiry_sweeper(
    store: Arc<dyn OtpStore>,
    clock: Arc<dyn Clock>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match store.purge_expired(clock.now()).await {
                Ok(0) => {}
                Ok(purged) => debug!(purged, event = "otp_sweep", "Purged expired OTP records"),
                Err(e) => error!(error = %e, event = "otp_sweep_failed", "Expiry sweep failed"),
            }
        }
    })
}
