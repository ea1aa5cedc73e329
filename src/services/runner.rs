use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::core::Matcher;
use crate::services::postgres::{PostgresError, ProfileRepository};
use crate::services::report::ReportDispatcher;

/// Errors that abort a matching run
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to load profiles: {0}")]
    Repository(#[from] PostgresError),
}

/// Summary of one completed matching run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub match_count: usize,
    pub profile_count: usize,
    pub pairs_evaluated: usize,
}

/// Coordinates a full matching run: fetch profiles, score all pairs,
/// dispatch the report.
///
/// The HTTP trigger and the scheduler share one runner. Overlapping
/// triggers are serialized through the run lock (queued single-flight):
/// a second trigger waits for the current run and then performs its own
/// full pass rather than interleaving with it.
pub struct MatchRunner {
    repository: Arc<ProfileRepository>,
    dispatcher: ReportDispatcher,
    matcher: Matcher,
    run_lock: tokio::sync::Mutex<()>,
}

impl MatchRunner {
    pub fn new(
        repository: Arc<ProfileRepository>,
        dispatcher: ReportDispatcher,
        matcher: Matcher,
    ) -> Self {
        Self {
            repository,
            dispatcher,
            matcher,
            run_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Run matching to completion and dispatch the report.
    ///
    /// Only the profile fetch can fail the run; a report delivery
    /// problem is absorbed by the dispatcher.
    pub async fn run(&self) -> Result<RunSummary, RunError> {
        let _guard = self.run_lock.lock().await;

        let run_id = Uuid::new_v4();
        tracing::info!("Starting matching run {}", run_id);

        let profiles = self.repository.fetch_all_profiles().await?;
        let today = Utc::now().date_naive();

        let run = self.matcher.collect_matches(&profiles, today);

        tracing::info!(
            "Run {}: {} matches from {} profiles ({} pairs evaluated)",
            run_id,
            run.matches.len(),
            run.profile_count,
            run.pairs_evaluated
        );

        self.dispatcher.dispatch(&run.matches, today).await;

        Ok(RunSummary {
            run_id,
            match_count: run.matches.len(),
            profile_count: run.profile_count,
            pairs_evaluated: run.pairs_evaluated,
        })
    }
}
