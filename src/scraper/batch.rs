use super::extractor;
use super::fetcher::Fetcher;
use crate::error::FetchError;
use crate::ui::GracefulShutdown;
use futures::{stream, StreamExt};
use serde::Serialize;
use std::pin::pin;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// What happened to one URL of a batch.
#[derive(Debug, Clone, Serialize)]
pub struct SourceOutcome {
    pub index: usize,
    pub url: String,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Ok { matches: Vec<String> },
    Failed { cause: String },
}

impl SourceOutcome {
    pub fn matches(&self) -> &[String] {
        match &self.status {
            OutcomeStatus::Ok { matches } => matches,
            OutcomeStatus::Failed { .. } => &[],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed { .. })
    }
}

#[derive(Debug, Clone)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
    pub failed: usize,
    pub matches_found: usize,
    pub current_url: Option<String>,
    pub start_time: Instant,
}

impl BatchProgress {
    pub fn new(total: usize) -> Self {
        Self {
            completed: 0,
            total,
            failed: 0,
            matches_found: 0,
            current_url: None,
            start_time: Instant::now(),
        }
    }

    fn record(&mut self, outcome: &SourceOutcome) {
        self.completed += 1;
        if outcome.is_failed() {
            self.failed += 1;
        }
        self.matches_found += outcome.matches().len();
        self.current_url = Some(outcome.url.clone());
    }

    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.completed as f64 / self.total as f64) * 100.0
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn estimated_remaining(&self) -> Duration {
        if self.completed == 0 {
            return Duration::from_secs(0);
        }

        let rate = self.completed as f64 / self.elapsed().as_secs_f64();
        let remaining = self.total.saturating_sub(self.completed);

        if rate > 0.0 {
            Duration::from_secs_f64(remaining as f64 / rate)
        } else {
            Duration::from_secs(0)
        }
    }
}

/// Everything a batch produced, in input order.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub outcomes: Vec<SourceOutcome>,
    pub cancelled: bool,
    pub duration: Duration,
}

impl BatchOutcome {
    /// Matches of every successful URL, flattened in URL order.
    pub fn emails(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .flat_map(|o| o.matches().iter().cloned())
            .collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = &SourceOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }
}

/// Fetches and scans a list of URLs. A failing URL contributes nothing and
/// never stops the batch.
pub struct BatchRunner<'a> {
    fetcher: &'a dyn Fetcher,
    concurrency: usize,
    shutdown: Option<&'a GracefulShutdown>,
}

impl<'a> BatchRunner<'a> {
    pub fn new(fetcher: &'a dyn Fetcher) -> Self {
        Self {
            fetcher,
            concurrency: 1,
            shutdown: None,
        }
    }

    /// Fetches in flight at once. Results are still merged in input order.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_shutdown(mut self, shutdown: &'a GracefulShutdown) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Aggregate matches of all URLs.
    pub async fn run_batch<S: AsRef<str>>(&self, urls: &[S]) -> Vec<String> {
        self.run_batch_detailed(urls, None).await.emails()
    }

    pub async fn run_batch_detailed<S: AsRef<str>>(
        &self,
        urls: &[S],
        progress_callback: Option<&(dyn Fn(&BatchProgress) + Sync)>,
    ) -> BatchOutcome {
        let started = Instant::now();
        let mut progress = BatchProgress::new(urls.len());
        let mut outcomes = Vec::with_capacity(urls.len());
        let mut cancelled = false;

        info!(
            urls = urls.len(),
            concurrency = self.concurrency,
            "Starting batch"
        );

        // `buffered` yields in submission order, so the merge below sees URLs by index
        let results = stream::iter(urls.iter().enumerate())
            .map(|(index, url)| {
                let url = url.as_ref();
                async move { (index, url, self.fetcher.fetch(url).await) }
            })
            .buffered(self.concurrency);
        let mut results = pin!(results);

        loop {
            if self.is_cancelled() {
                cancelled = true;
                break;
            }

            let Some((index, url, result)) = results.next().await else {
                break;
            };

            let outcome = Self::to_outcome(index, url, result);
            progress.record(&outcome);
            if let Some(callback) = progress_callback {
                callback(&progress);
            }
            outcomes.push(outcome);
        }

        let duration = started.elapsed();
        info!(
            completed = progress.completed,
            failed = progress.failed,
            matches = progress.matches_found,
            cancelled,
            "Batch finished in {:?}",
            duration
        );

        BatchOutcome {
            outcomes,
            cancelled,
            duration,
        }
    }

    fn to_outcome(index: usize, url: &str, result: Result<String, FetchError>) -> SourceOutcome {
        let status = match result {
            Ok(body) => OutcomeStatus::Ok {
                matches: extractor::extract(&body),
            },
            Err(error) => {
                warn!(url = %url, error = %error, "Fetch failed, skipping");
                OutcomeStatus::Failed {
                    cause: error.to_string(),
                }
            }
        };

        SourceOutcome {
            index,
            url: url.to_string(),
            status,
        }
    }

    fn is_cancelled(&self) -> bool {
        self.shutdown.is_some_and(|s| !s.is_running())
    }
}
