//! Background ticker driving time-based session behaviour

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::services::SessionEngine;

/// Calls [`SessionEngine::tick`] on a fixed period until shut down
pub struct SessionScheduler {
    engine: Arc<SessionEngine>,
    interval: Duration,
}

impl SessionScheduler {
    pub fn new(engine: Arc<SessionEngine>, interval: Duration) -> Self {
        Self { engine, interval }
    }

    /// Run until `shutdown` flips to true or its sender is dropped
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(interval_ms = self.interval.as_millis() as u64, "Session scheduler started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.engine.tick(Utc::now()).await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Session scheduler stopped");
    }
}
