use std::path::PathBuf;
use thiserror::Error;

/// Failure while fetching a single URL. Recovered by the batch runner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request could not be built for {url}: {message}")]
    Request { url: String, message: String },

    #[error("Connection to {url} failed: {message}")]
    Connect { url: String, message: String },

    #[error("Too many redirects from {url}: {message}")]
    Redirect { url: String, message: String },

    #[error("Request to {url} timed out after {seconds} seconds")]
    Timeout { url: String, seconds: u64 },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to read response body from {url}: {message}")]
    Body { url: String, message: String },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Request { url, .. }
            | FetchError::Connect { url, .. }
            | FetchError::Redirect { url, .. }
            | FetchError::Timeout { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Body { url, .. } => url,
        }
    }

    /// Classify a reqwest error into the fetch taxonomy.
    pub fn from_reqwest(url: &str, error: reqwest::Error, timeout_secs: u64) -> Self {
        let url = url.to_string();

        if error.is_timeout() {
            FetchError::Timeout {
                url,
                seconds: timeout_secs,
            }
        } else if error.is_redirect() {
            FetchError::Redirect {
                url,
                message: error.to_string(),
            }
        } else if let Some(status) = error.status() {
            FetchError::Status {
                url,
                status: status.as_u16(),
            }
        } else if error.is_builder() {
            FetchError::Request {
                url,
                message: error.to_string(),
            }
        } else if error.is_body() || error.is_decode() {
            FetchError::Body {
                url,
                message: error.to_string(),
            }
        } else {
            FetchError::Connect {
                url,
                message: error.to_string(),
            }
        }
    }
}

/// Failure while writing matches to disk.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("There are no email addresses to export")]
    NothingToExport,

    #[error("Failed to write {}: {cause}", path.display())]
    WriteFailed { path: PathBuf, cause: String },
}

impl ExportError {
    pub fn write_failed<E: std::fmt::Display>(path: &std::path::Path, cause: E) -> Self {
        ExportError::WriteFailed {
            path: path.to_path_buf(),
            cause: cause.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum MailScrapeError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Could not read URL list {}: {message}", path.display())]
    SourceFile { path: PathBuf, message: String },

    #[error("Invalid source: {message}")]
    InvalidSource { message: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Operation was cancelled by user")]
    Cancelled,
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for MailScrapeError {
    fn user_message(&self) -> String {
        match self {
            MailScrapeError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            MailScrapeError::SourceFile { path, message } => {
                format!("Could not read URL list {}: {}", path.display(), message)
            }
            MailScrapeError::InvalidSource { message } => {
                format!("Invalid source: {}", message)
            }
            MailScrapeError::Fetch(error) => match error {
                FetchError::Status { url, status } => {
                    format!("{} answered with HTTP status {}", url, status)
                }
                other => other.to_string(),
            },
            MailScrapeError::Export(ExportError::NothingToExport) => {
                "No emails to export".to_string()
            }
            MailScrapeError::Export(ExportError::WriteFailed { path, cause }) => {
                format!("Export to {} failed: {}", path.display(), cause)
            }
            MailScrapeError::Cancelled => "Operation was cancelled by user".to_string(),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            MailScrapeError::Config { .. } => Some(
                "Check your configuration file syntax, or regenerate one with --generate-config.".to_string()
            ),
            MailScrapeError::SourceFile { .. } => Some(
                "Make sure the file exists and lists one URL per row in its first column.".to_string()
            ),
            MailScrapeError::InvalidSource { .. } => Some(
                "Pass a single URL (e.g., https://example.com/contact) or a URL list with --list urls.csv".to_string()
            ),
            MailScrapeError::Fetch(FetchError::Timeout { .. }) => Some(
                "The server took too long to answer. Try again or raise the limit with --timeout.".to_string()
            ),
            MailScrapeError::Fetch(FetchError::Connect { .. }) => Some(
                "Check your internet connection and that the host name is spelled correctly.".to_string()
            ),
            MailScrapeError::Fetch(FetchError::Redirect { .. }) => Some(
                "The page keeps redirecting. Raise fetch.max_redirects or check the URL in a browser.".to_string()
            ),
            MailScrapeError::Fetch(FetchError::Request { .. }) => Some(
                "URLs must include a scheme, for example https://example.com".to_string()
            ),
            MailScrapeError::Export(ExportError::NothingToExport) => Some(
                "Scrape a page that contains email addresses before exporting.".to_string()
            ),
            MailScrapeError::Export(ExportError::WriteFailed { .. }) => Some(
                "Ensure the destination directory is writable and the disk is not full.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for MailScrapeError {
    fn from(error: toml::de::Error) -> Self {
        MailScrapeError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MailScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        let error = MailScrapeError::Export(ExportError::NothingToExport);
        assert_eq!(error.user_message(), "No emails to export");
        assert!(error.suggestion().is_some());

        let error = MailScrapeError::InvalidSource {
            message: "no URL given".to_string(),
        };
        assert!(error.user_message().contains("no URL given"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_fetch_error_url() {
        let error = FetchError::Status {
            url: "https://example.com".to_string(),
            status: 404,
        };
        assert_eq!(error.url(), "https://example.com");
        assert_eq!(error.to_string(), "https://example.com returned HTTP 404");
    }

    #[test]
    fn test_redirect_error_has_url_and_suggestion() {
        let error = FetchError::Redirect {
            url: "https://loop.example".to_string(),
            message: "too many redirects".to_string(),
        };
        assert_eq!(error.url(), "https://loop.example");

        let error = MailScrapeError::Fetch(error);
        assert!(error.user_message().contains("Too many redirects"));
        assert!(error.suggestion().unwrap().contains("max_redirects"));
    }

    #[test]
    fn test_write_failed_display() {
        let error = ExportError::write_failed(std::path::Path::new("/nope/out.csv"), "denied");
        assert_eq!(error.to_string(), "Failed to write /nope/out.csv: denied");
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_error = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let error = MailScrapeError::from(toml_error);
        assert!(matches!(error, MailScrapeError::Config { .. }));
    }
}
