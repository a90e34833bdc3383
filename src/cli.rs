use crate::config::{CliOverrides, Config};
use crate::error::{MailScrapeError, Result};
use crate::exporter::ExportFormat;
use crate::scraper::ScrapeRequest;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "mailscrape")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scrape email addresses from web pages")]
#[command(
    long_about = "MailScrape downloads one web page, or every page listed in a CSV file, \
                  collects the email addresses found in the raw responses and optionally \
                  exports them as CSV, JSON, XLS or XML."
)]
#[command(before_help = "📧 MailScrape - Email Address Scraper")]
#[command(after_help = "EXAMPLES:\n  \
    mailscrape https://example.com/contact\n  \
    mailscrape --list urls.csv --export emails.json\n  \
    mailscrape --list urls.csv --concurrency 4 --unique --export out/emails.xlsx\n  \
    mailscrape https://example.com --output-format plain | sort -u\n  \
    mailscrape --generate-config --config mailscrape.toml")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Web page to scrape
    #[arg(conflicts_with = "list", required_unless_present_any = ["list", "generate_config"])]
    pub url: Option<String>,

    /// Delimited file whose first column lists the URLs to scrape
    #[arg(short, long, value_name = "FILE")]
    pub list: Option<PathBuf>,

    /// Write the collected addresses to this file
    #[arg(short, long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Export format (inferred from the --export extension when omitted)
    #[arg(short, long, value_enum)]
    pub format: Option<ExportFormat>,

    /// Per-request timeout in seconds, 0 disables it
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Number of pages fetched at the same time
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// User-Agent header sent with every request
    #[arg(long, env = "MAILSCRAPE_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Keep blank rows of the URL list as empty URLs
    #[arg(long)]
    pub keep_blank_rows: bool,

    /// Skip the first row of the URL list
    #[arg(long)]
    pub has_headers: bool,

    /// Field delimiter of the URL list
    #[arg(long, value_name = "CHAR")]
    pub delimiter: Option<String>,

    /// Drop repeated addresses, keeping the first occurrence
    #[arg(short, long)]
    pub unique: bool,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Resolve the source and show the plan without fetching anything
    #[arg(long)]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// One address per line, for piping
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_timeout(self.timeout)
            .with_concurrency(self.concurrency)
            .with_user_agent(self.user_agent.clone())
            .with_keep_blank_rows(self.keep_blank_rows)
            .with_has_headers(self.has_headers)
            .with_delimiter(self.delimiter.clone())
            .with_format(self.format)
            .with_unique(self.unique)
    }

    pub fn scrape_request(&self) -> Result<ScrapeRequest> {
        match (&self.url, &self.list) {
            (Some(url), None) => Ok(ScrapeRequest::url(url.clone())),
            (None, Some(path)) => Ok(ScrapeRequest::list_file(path.clone())),
            (Some(_), Some(_)) => Err(MailScrapeError::InvalidSource {
                message: "give either a URL or --list, not both".to_string(),
            }),
            (None, None) => Err(MailScrapeError::InvalidSource {
                message: "no URL or URL list given".to_string(),
            }),
        }
    }

    /// Format for `--export`: the explicit flag, then the file extension,
    /// then the configured default.
    pub fn export_format(&self, config: &Config) -> ExportFormat {
        if let Some(format) = self.format {
            return format;
        }

        self.export
            .as_deref()
            .and_then(ExportFormat::from_extension)
            .unwrap_or(config.export.default_format)
    }
}

/// Check that a string is an absolute http(s) URL.
///
/// Only used to warn during dry runs; the scraper itself passes any string
/// to the fetcher and records the failure.
pub fn validate_url(s: &str) -> std::result::Result<Url, String> {
    let url = Url::parse(s).map_err(|e| format!("Invalid URL format: {}", e))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("Unsupported scheme '{}', use http or https", other)),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err("URL must include a host name".to_string()),
    }

    Ok(url)
}
