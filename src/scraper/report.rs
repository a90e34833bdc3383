use super::batch::{BatchOutcome, SourceOutcome};
use super::source::SourceSpec;
use crate::config::{Config, SourceConfig};
use crate::exporter::ExportFormat;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Result of one scrape request, handed back to the front end.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeReport {
    pub source: SourceSpec,
    /// Aggregated matches in URL order, then match order
    pub emails: Vec<String>,
    pub outcomes: Vec<SourceOutcome>,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub cancelled: bool,
}

impl ScrapeReport {
    pub fn from_batch(source: SourceSpec, started_at: DateTime<Utc>, batch: BatchOutcome) -> Self {
        Self {
            source,
            emails: batch.emails(),
            outcomes: batch.outcomes,
            started_at,
            duration: batch.duration,
            cancelled: batch.cancelled,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &SourceOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    pub fn urls_processed(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

/// What a scrape would do, resolved without fetching anything.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename = "plan")]
pub struct ScrapePlan {
    pub source: SourceSpec,
    pub urls: Vec<String>,
    /// `None` when requests never time out
    pub timeout_secs: Option<u64>,
    pub concurrency: usize,
    pub max_redirects: usize,
    pub user_agent: String,
    /// Row options, only meaningful for a URL list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_options: Option<SourceConfig>,
    pub unique: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<PlannedExport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedExport {
    pub path: PathBuf,
    pub format: ExportFormat,
}

impl ScrapePlan {
    pub fn new(source: SourceSpec, urls: Vec<String>, config: &Config) -> Self {
        let list_options = match source {
            SourceSpec::ListFile(_) => Some(config.source.clone()),
            SourceSpec::Url(_) => None,
        };

        Self {
            source,
            urls,
            timeout_secs: config.fetch_timeout().map(|t| t.as_secs()),
            concurrency: config.fetch.concurrency,
            max_redirects: config.fetch.max_redirects,
            user_agent: config.fetch.user_agent.clone(),
            list_options,
            unique: config.export.unique,
            export: None,
        }
    }

    pub fn with_export(mut self, path: PathBuf, format: ExportFormat) -> Self {
        self.export = Some(PlannedExport { path, format });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::OutcomeStatus;

    #[test]
    fn test_report_from_batch() {
        let batch = BatchOutcome {
            outcomes: vec![
                SourceOutcome {
                    index: 0,
                    url: "https://a".to_string(),
                    status: OutcomeStatus::Failed {
                        cause: "timeout".to_string(),
                    },
                },
                SourceOutcome {
                    index: 1,
                    url: "https://b".to_string(),
                    status: OutcomeStatus::Ok {
                        matches: vec!["p@q.com".to_string(), "r@s.org".to_string()],
                    },
                },
            ],
            cancelled: false,
            duration: Duration::from_millis(12),
        };

        let report = ScrapeReport::from_batch(
            SourceSpec::ListFile("urls.csv".into()),
            Utc::now(),
            batch,
        );

        assert_eq!(report.emails, vec!["p@q.com", "r@s.org"]);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.urls_processed(), 2);
        assert!(!report.is_empty());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["source"]["kind"], "list_file");
        assert_eq!(json["emails"][1], "r@s.org");
    }

    #[test]
    fn test_plan_serializes_as_one_tagged_object() {
        let plan = ScrapePlan::new(
            SourceSpec::ListFile("urls.csv".into()),
            vec!["https://a.example".to_string()],
            &Config::default(),
        )
        .with_export("out.xml".into(), ExportFormat::Xml);

        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["type"], "plan");
        assert_eq!(json["urls"][0], "https://a.example");
        assert_eq!(json["timeout_secs"], 30);
        assert_eq!(json["list_options"]["delimiter"], ",");
        assert_eq!(json["export"]["format"], "xml");
    }

    #[test]
    fn test_plan_for_single_url_without_timeout() {
        let mut config = Config::default();
        config.fetch.timeout_secs = 0;

        let plan = ScrapePlan::new(
            SourceSpec::Url("https://a.example".to_string()),
            vec!["https://a.example".to_string()],
            &config,
        );

        let json = serde_json::to_value(&plan).unwrap();
        assert!(json["timeout_secs"].is_null());
        assert!(json.get("list_options").is_none());
        assert!(json.get("export").is_none());
    }
}
