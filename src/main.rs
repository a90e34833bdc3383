use clap::Parser;
use mailscrape::{
    Cli, ExportError, MailScrape, MailScrapeError, OutputFormatter, OutputMode,
    ScrapePlan, ScrapeRequest, UserFriendlyError,
};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    process::exit(exit_code);
}

async fn run() -> i32 {
    let cli = Cli::parse();

    setup_logging(&cli);

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let app = match MailScrape::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    let request = match cli.scrape_request() {
        Ok(request) => request,
        Err(e) => {
            app.handle_error(&e);
            return exit_code_for(&e);
        }
    };

    if cli.dry_run {
        return handle_dry_run(&cli, &app, &request);
    }

    let report = match app.scrape(request).await {
        Ok(report) => report,
        Err(e) => {
            app.handle_error(&e);
            return exit_code_for(&e);
        }
    };

    app.output_formatter().print_scrape_report(&report);

    if report.cancelled {
        app.handle_error(&MailScrapeError::Cancelled);
        return exit_code_for(&MailScrapeError::Cancelled);
    }

    if let Some(ref destination) = cli.export {
        let format = cli.export_format(app.config());
        match app.export(&report.emails, format, destination) {
            Ok(summary) => app.output_formatter().print_export_summary(&summary),
            Err(e) => {
                app.handle_error(&e);
                return exit_code_for(&e);
            }
        }
    }

    0
}

/// Process exit status for an error that ended the run.
fn exit_code_for(error: &MailScrapeError) -> i32 {
    match error {
        MailScrapeError::Cancelled => 130, // Interrupted (SIGINT)
        MailScrapeError::InvalidSource { .. } => 2,
        MailScrapeError::SourceFile { .. } => 3,
        MailScrapeError::Export(ExportError::NothingToExport) => 4,
        MailScrapeError::Export(ExportError::WriteFailed { .. }) => 5,
        MailScrapeError::Config { .. } => 6,
        _ => 1, // General error
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "mailscrape.toml".to_string());

    match MailScrape::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  mailscrape <url> --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!(
                "Failed to generate configuration file: {}",
                e.user_message()
            );
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(cli: &Cli, app: &MailScrape, request: &ScrapeRequest) -> i32 {
    let formatter = app.output_formatter();

    formatter.info("DRY RUN MODE - No pages will be fetched");
    formatter.print_separator();

    let urls = match app.resolve_source(&request.source) {
        Ok(urls) => urls,
        Err(e) => {
            app.handle_error(&e);
            return exit_code_for(&e);
        }
    };

    // Warn only: unusable URLs are still attempted and reported as failures
    for url in &urls {
        if let Err(reason) = mailscrape::cli::validate_url(url) {
            formatter.warning(&format!("{:?} will fail to fetch: {}", url, reason));
        }
    }

    let mut plan = ScrapePlan::new(request.source.clone(), urls, app.config());
    if let Some(ref destination) = cli.export {
        plan = plan.with_export(destination.clone(), cli.export_format(app.config()));
    }
    formatter.print_scrape_plan(&plan);

    formatter.print_separator();
    formatter.success("Dry run completed successfully");
    formatter.info("Run without --dry-run to perform the scrape");

    0
}

fn print_startup_error(error: &MailScrapeError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

/// Diagnostics go to stderr. `RUST_LOG` wins over the verbosity flags.
fn setup_logging(cli: &Cli) {
    let default_filter = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "warn,mailscrape=info",
            _ => "info,mailscrape=debug",
        }
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
        .ok();
}
