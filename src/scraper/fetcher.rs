use crate::config::FetchConfig;
use crate::error::{FetchError, MailScrapeError, Result};
use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Retrieves the text body behind a URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError>;
}

/// Single-attempt HTTP GET. Non-2xx answers count as failures.
pub struct HttpFetcher {
    client: Client,
    timeout_secs: u64,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let redirect_policy = match config.max_redirects {
            0 => Policy::none(),
            n => Policy::limited(n),
        };

        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(redirect_policy);

        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }

        let client = builder.build().map_err(|e| MailScrapeError::Config {
            message: format!("Failed to create HTTP client: {}", e),
        })?;

        Ok(Self {
            client,
            timeout_secs: config.timeout_secs,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        debug!(url = %url, "Fetching");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e, self.timeout_secs))?;

        debug!(url = %url, bytes = body.len(), "Fetched");
        Ok(body)
    }
}
