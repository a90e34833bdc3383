use crate::error::{MailScrapeError, Result};
use crate::exporter::ExportFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const MAX_REDIRECT_LIMIT: usize = 50;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds, 0 disables it
    pub timeout_secs: u64,
    pub user_agent: String,
    pub max_redirects: usize,
    /// Number of URLs fetched at the same time in batch mode
    pub concurrency: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    pub keep_blank_rows: bool,
    pub has_headers: bool,
    pub delimiter: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
    pub default_format: ExportFormat,
    pub unique: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: format!("mailscrape/{}", env!("CARGO_PKG_VERSION")),
            max_redirects: 10,
            concurrency: 1, // Sequential, one page at a time
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            keep_blank_rows: false,
            has_headers: false,
            delimiter: ",".to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_format: ExportFormat::Csv,
            unique: false,
        }
    }
}

impl SourceConfig {
    /// Delimiter as the single byte the row reader expects.
    pub fn delimiter_byte(&self) -> Result<u8> {
        let bytes = self.delimiter.as_bytes();
        match bytes {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(MailScrapeError::Config {
                message: format!(
                    "Delimiter must be a single ASCII character, got {:?}",
                    self.delimiter
                ),
            }),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(MailScrapeError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| MailScrapeError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| MailScrapeError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["mailscrape.toml", ".mailscrape.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(timeout) = cli_args.timeout {
            self.fetch.timeout_secs = timeout;
        }

        if let Some(concurrency) = cli_args.concurrency {
            self.fetch.concurrency = concurrency;
        }

        if let Some(ref user_agent) = cli_args.user_agent {
            self.fetch.user_agent = user_agent.clone();
        }

        if cli_args.keep_blank_rows {
            self.source.keep_blank_rows = true;
        }

        if cli_args.has_headers {
            self.source.has_headers = true;
        }

        if let Some(ref delimiter) = cli_args.delimiter {
            self.source.delimiter = delimiter.clone();
        }

        if let Some(format) = cli_args.format {
            self.export.default_format = format;
        }

        if cli_args.unique {
            self.export.unique = true;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| MailScrapeError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| MailScrapeError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.fetch.concurrency == 0 {
            return Err(MailScrapeError::Config {
                message: "Concurrency must be at least 1".to_string(),
            });
        }

        if self.fetch.max_redirects > MAX_REDIRECT_LIMIT {
            return Err(MailScrapeError::Config {
                message: format!(
                    "Redirect limit must be {} or less, got {}",
                    MAX_REDIRECT_LIMIT, self.fetch.max_redirects
                ),
            });
        }

        if self.fetch.user_agent.trim().is_empty() {
            return Err(MailScrapeError::Config {
                message: "User agent cannot be empty".to_string(),
            });
        }

        self.source.delimiter_byte()?;

        Ok(())
    }

    /// `None` when the timeout is disabled.
    pub fn fetch_timeout(&self) -> Option<Duration> {
        match self.fetch.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub timeout: Option<u64>,
    pub concurrency: Option<usize>,
    pub user_agent: Option<String>,
    pub keep_blank_rows: bool,
    pub has_headers: bool,
    pub delimiter: Option<String>,
    pub format: Option<ExportFormat>,
    pub unique: bool,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Option<u64>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: Option<usize>) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn with_keep_blank_rows(mut self, keep: bool) -> Self {
        self.keep_blank_rows = keep;
        self
    }

    pub fn with_has_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn with_delimiter(mut self, delimiter: Option<String>) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_format(mut self, format: Option<ExportFormat>) -> Self {
        self.format = format;
        self
    }

    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }
}
