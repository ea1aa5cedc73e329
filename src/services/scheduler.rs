use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::services::runner::MatchRunner;

/// Spawn the periodic matching job.
///
/// Fires every `interval_secs`, starting one interval after startup. A
/// failed run is logged and the schedule keeps going; ticks that would
/// pile up behind a long run are delayed, not burst.
pub fn spawn(runner: Arc<MatchRunner>, interval_secs: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // The first tick completes immediately; skip it so startup
        // doesn't trigger a run.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            tracing::info!("Running scheduled matching job");

            match runner.run().await {
                Ok(summary) => tracing::info!(
                    "Scheduled matching job completed. Found {} matches.",
                    summary.match_count
                ),
                Err(e) => tracing::error!("Scheduled matching job failed: {}", e),
            }
        }
    })
}
