use crate::error::{MailScrapeError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts Ctrl+C presses. The first one lets the pages in flight finish and
/// stops the batch from scheduling more; the second exits with status 130.
pub struct GracefulShutdown {
    interrupts: Arc<AtomicUsize>,
}

impl GracefulShutdown {
    pub fn new() -> Result<Self> {
        let interrupts = Arc::new(AtomicUsize::new(0));
        let handler_interrupts = Arc::clone(&interrupts);

        ctrlc::set_handler(move || {
            match handler_interrupts.fetch_add(1, Ordering::SeqCst) {
                0 => eprintln!(
                    "\n🛑 Finishing the pages in flight, no new URLs will be fetched (Ctrl+C again to quit)"
                ),
                _ => {
                    eprintln!("\n💀 Quitting without results");
                    std::process::exit(130);
                }
            }
        })
        .map_err(|e| MailScrapeError::Config {
            message: format!("Failed to set signal handler: {}", e),
        })?;

        Ok(Self { interrupts })
    }

    /// No signal handler is registered, so several can coexist in one process.
    pub fn new_for_test() -> Self {
        Self {
            interrupts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.interrupts.load(Ordering::SeqCst) == 0
    }

    pub fn check_shutdown(&self) -> Result<()> {
        if self.is_running() {
            Ok(())
        } else {
            Err(MailScrapeError::Cancelled)
        }
    }

    /// Same effect as a first Ctrl+C.
    pub fn request_shutdown(&self) {
        self.interrupts.fetch_add(1, Ordering::SeqCst);
    }
}
