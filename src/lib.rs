pub mod cli;
pub mod config;
pub mod error;
pub mod exporter;
pub mod scraper;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, ExportConfig, FetchConfig, SourceConfig};
pub use error::{ExportError, FetchError, MailScrapeError, Result, UserFriendlyError};

// Core functionality re-exports
pub use exporter::{ExportFormat, ExportSummary};
pub use scraper::{
    BatchProgress, BatchRunner, Fetcher, HttpFetcher, OutcomeStatus, ScrapePlan, ScrapeReport,
    ScrapeRequest, SourceOutcome, SourceSpec,
};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressManager};

use chrono::Utc;
use std::path::Path;
use tracing::{debug, info};

/// Main library interface: scrape a source, then export what was found.
pub struct MailScrape {
    config: Config,
    fetcher: Box<dyn Fetcher>,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl MailScrape {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        // Progress bars would interleave with the machine-readable modes
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);
        let shutdown = GracefulShutdown::new()?;

        Ok(Self {
            config,
            fetcher: Box::new(fetcher),
            output_formatter,
            progress_manager,
            shutdown,
        })
    }

    /// Instance without a signal handler and with progress bars off.
    pub fn new_for_test(config: Config, output_mode: OutputMode) -> Result<Self> {
        Ok(Self {
            fetcher: Box::new(HttpFetcher::new(&config.fetch)?),
            output_formatter: OutputFormatter::new(output_mode, 0, true),
            progress_manager: ProgressManager::new(false),
            shutdown: GracefulShutdown::new_for_test(),
            config,
        })
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            crate::cli::OutputFormat::Human => OutputMode::Human,
            crate::cli::OutputFormat::Json => OutputMode::Json,
            crate::cli::OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(config, output_mode, cli_args.verbose, cli_args.quiet)
    }

    /// Replace the HTTP fetcher, e.g. with a canned one in tests.
    pub fn with_fetcher<F: Fetcher + 'static>(mut self, fetcher: F) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    /// Run a scrape request to completion.
    ///
    /// URLs that fail to fetch are recorded in the report and skipped. An
    /// unreadable list file is an error. On Ctrl+C the report holds what was
    /// collected so far and is marked cancelled.
    pub async fn scrape(&self, request: ScrapeRequest) -> Result<ScrapeReport> {
        self.shutdown.check_shutdown()?;

        let started_at = Utc::now();
        let urls = self.resolve_source(&request.source)?;

        self.output_formatter
            .start_operation(&format!("Scraping {}", request.source));

        let pb = if urls.len() > 1 {
            self.progress_manager.create_batch_progress(urls.len() as u64)
        } else {
            self.progress_manager.create_spinner("Fetching page...")
        };
        let progress_callback = |progress: &BatchProgress| {
            ui::progress::update_batch_progress(&pb, progress);
        };

        let runner = BatchRunner::new(self.fetcher.as_ref())
            .with_concurrency(self.config.fetch.concurrency)
            .with_shutdown(&self.shutdown);
        let batch = runner
            .run_batch_detailed(&urls, Some(&progress_callback))
            .await;

        ui::progress::finish_progress_with_summary(
            &pb,
            &format!("Fetched {} of {} pages", batch.outcomes.len(), urls.len()),
            batch.duration,
        );
        self.progress_manager.clear();

        let mut report = ScrapeReport::from_batch(request.source, started_at, batch);
        if self.config.export.unique {
            let before = report.emails.len();
            report.emails = scraper::unique(&report.emails);
            debug!(before, after = report.emails.len(), "Removed repeated addresses");
        }

        info!(
            emails = report.emails.len(),
            failed = report.failed_count(),
            cancelled = report.cancelled,
            "Scrape finished"
        );

        Ok(report)
    }

    /// Fetch one page and return its matches, surfacing the fetch error
    /// instead of recording it.
    pub async fn scrape_url(&self, url: &str) -> Result<Vec<String>> {
        self.shutdown.check_shutdown()?;
        let body = self.fetcher.fetch(url).await?;
        Ok(scraper::extract(&body))
    }

    /// Expand the source without fetching anything.
    pub fn resolve_source(&self, source: &SourceSpec) -> Result<Vec<String>> {
        let urls = source.resolve(&self.config.source)?;
        self.output_formatter
            .debug(&format!("{} URL(s) to fetch from {}", urls.len(), source));
        Ok(urls)
    }

    pub fn export<S: AsRef<str>>(
        &self,
        emails: &[S],
        format: ExportFormat,
        destination: &Path,
    ) -> Result<ExportSummary> {
        self.shutdown.check_shutdown()?;
        self.output_formatter
            .start_operation(&format!("Exporting to {}", destination.display()));

        Ok(exporter::export(emails, format, destination)?)
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    pub fn handle_error(&self, error: &MailScrapeError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}
