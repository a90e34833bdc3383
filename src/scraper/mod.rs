pub mod batch;
pub mod extractor;
pub mod fetcher;
pub mod report;
pub mod source;

pub use batch::{BatchOutcome, BatchProgress, BatchRunner, OutcomeStatus, SourceOutcome};
pub use extractor::{extract, unique, EMAIL_PATTERN};
pub use fetcher::{Fetcher, HttpFetcher};
pub use report::{PlannedExport, ScrapePlan, ScrapeReport};
pub use source::{load_url_list, ScrapeRequest, SourceSpec};
