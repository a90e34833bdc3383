use crate::error::{MailScrapeError, UserFriendlyError};
use crate::exporter::ExportSummary;
use crate::scraper::{ScrapePlan, ScrapeReport};
use crate::ui::progress::format_duration;
use console::{style, Emoji, Term};

/// Shown when a scrape produced nothing.
pub const NO_EMAILS_MESSAGE: &str = "No emails found.";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static ENVELOPE: Emoji = Emoji("📧 ", "* ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let term = Term::stdout();
        let use_colors = match mode {
            OutputMode::Human => term.features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    // Core messaging methods. Plain mode keeps stdout for addresses only.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Success, message),
            OutputMode::Json => self.print_json_message("success", message),
            OutputMode::Plain => eprintln!("SUCCESS: {}", message),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => eprintln!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => eprintln!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => eprintln!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => eprintln!("STARTING: {}", operation),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &MailScrapeError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    eprintln!();
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    /// Render the matches of a scrape. Always printed, even in quiet mode.
    pub fn print_scrape_report(&self, report: &ScrapeReport) {
        match self.mode {
            OutputMode::Human => self.print_human_report(report),
            OutputMode::Json => {
                let failed: Vec<_> = report
                    .failures()
                    .map(|o| {
                        serde_json::json!({
                            "url": o.url,
                            "cause": match &o.status {
                                crate::scraper::OutcomeStatus::Failed { cause } => cause.as_str(),
                                crate::scraper::OutcomeStatus::Ok { .. } => "",
                            }
                        })
                    })
                    .collect();

                self.print_json_object(&serde_json::json!({
                    "type": "result",
                    "emails": report.emails,
                    "urls_processed": report.urls_processed(),
                    "failed": failed,
                    "cancelled": report.cancelled,
                    "duration_ms": report.duration.as_millis() as u64,
                }));
            }
            OutputMode::Plain => {
                print!("{}", plain_listing(&report.emails));
            }
        }
    }

    /// Render a dry-run plan. JSON mode emits a single `plan` object.
    pub fn print_scrape_plan(&self, plan: &ScrapePlan) {
        if self.mode == OutputMode::Json {
            self.print_json_object(&serde_json::to_value(plan).unwrap_or_default());
            return;
        }

        self.info("Configuration that would be used:");
        match plan.timeout_secs {
            Some(secs) => println!("  Timeout: {} seconds", secs),
            None => println!("  Timeout: none"),
        }
        println!("  Concurrency: {}", plan.concurrency);
        println!("  Max redirects: {}", plan.max_redirects);
        println!("  User agent: {}", plan.user_agent);
        if let Some(ref list) = plan.list_options {
            println!("  Delimiter: {:?}", list.delimiter);
            println!("  Header row: {}", list.has_headers);
            println!("  Keep blank rows: {}", list.keep_blank_rows);
        }
        println!("  Unique: {}", plan.unique);

        self.print_separator();
        self.info("Scrape plan:");
        println!("  Source: {}", plan.source);
        println!("  Pages to fetch: {}", plan.urls.len());
        for (i, url) in plan.urls.iter().enumerate() {
            println!("    {}. {}", i + 1, url);
        }
        if let Some(ref export) = plan.export {
            println!("  Export: {} as {}", export.path.display(), export.format);
        }
    }

    pub fn print_export_summary(&self, summary: &ExportSummary) {
        match self.mode {
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "export",
                "path": summary.path.display().to_string(),
                "format": summary.format,
                "records": summary.records,
                "bytes": summary.bytes,
            })),
            _ => self.success(&format!(
                "Exported {} email{} as {} to {}",
                summary.records,
                if summary.records == 1 { "" } else { "s" },
                summary.format,
                summary.path.display()
            )),
        }
    }

    pub fn print_header(&self, title: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                println!();
                if self.use_colors {
                    println!("{}{}", ENVELOPE, style(title).bold().cyan());
                } else {
                    println!("=== {} ===", title);
                }
                println!();
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "header",
                    "title": title
                }));
            }
            OutputMode::Plain => {}
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain | OutputMode::Json => {}
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green().bold())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Warning => (WARNING, Box::new(|msg| style(msg).yellow().bold())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error | MessageType::Warning => {
                    eprintln!("{}{}", emoji, color_fn(message))
                }
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error | MessageType::Warning => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_report(&self, report: &ScrapeReport) {
        self.print_header(&format!("Emails from {}", report.source));

        print!("{}", human_listing(&report.emails));

        if self.quiet {
            return;
        }

        println!();
        self.print_separator();
        println!(
            "  Pages fetched: {}",
            self.highlight(report.urls_processed() - report.failed_count())
        );
        println!("  Emails found:  {}", self.highlight(report.emails.len()));
        if report.failed_count() > 0 {
            println!("  Failed pages:  {}", self.highlight(report.failed_count()));
        }
        println!(
            "  Time taken:    {}",
            self.highlight(format_duration(report.duration))
        );
        self.print_separator();
    }

    fn highlight<T: std::fmt::Display>(&self, value: T) -> String {
        if self.use_colors {
            style(value).cyan().bold().to_string()
        } else {
            value.to_string()
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

/// Numbered list, or the placeholder line when there is nothing to show.
fn human_listing(emails: &[String]) -> String {
    if emails.is_empty() {
        return format!("{}\n", NO_EMAILS_MESSAGE);
    }

    let width = emails.len().to_string().len();
    emails
        .iter()
        .enumerate()
        .map(|(i, email)| format!("{:>width$}. {}\n", i + 1, email, width = width))
        .collect()
}

/// One address per line, newline joined. Empty when nothing matched.
fn plain_listing(emails: &[String]) -> String {
    emails.iter().map(|e| format!("{}\n", e)).collect()
}
