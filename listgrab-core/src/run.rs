use anyhow::{Context, Result};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use listgrab_scanner::result::{RunResult, StopReason};
use listgrab_scanner::{ExtractionEngine, RunOptions, SiteConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// One site plus the parameters of a single run against it.
pub struct ScrapeJob {
    pub site: SiteConfig,
    pub options: RunOptions,
    pub show_progress_bars: bool,
}

impl ScrapeJob {
    pub fn new(site: SiteConfig, options: RunOptions) -> Self {
        Self {
            site,
            options,
            show_progress_bars: false,
        }
    }

    pub fn with_progress_bars(mut self, enabled: bool) -> Self {
        self.show_progress_bars = enabled;
        self
    }
}

/// Callback for reporting scrape progress
pub type ScrapeProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Execute a single scrape job and return everything it collected
pub async fn execute_scrape(
    job: ScrapeJob,
    progress_callback: Option<ScrapeProgressCallback>,
) -> Result<RunResult> {
    let ScrapeJob {
        site,
        options,
        show_progress_bars,
    } = job;

    let site_name = site.site_name().to_string();
    let max_pages = options.max_pages;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .context("invalid progress template")?,
        );
        pb.set_message(format!("Starting {}...", site_name));
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(Arc::new(pb))
    } else {
        None
    };

    let pb_clone = progress_bar.clone();
    let callback_clone = progress_callback.clone();
    let engine_callback: listgrab_scanner::ProgressCallback =
        Arc::new(move |index: usize, url: String| {
            let message = format!("Scraping page {}/{}: {}", index, max_pages, url);
            if let Some(ref pb) = pb_clone {
                pb.set_message(message.clone());
            }
            if let Some(ref cb) = callback_clone {
                cb(message);
            }
        });

    let engine = ExtractionEngine::new(site)
        .with_context(|| format!("failed to set up HTTP client for {}", site_name))?
        .with_progress_callback(engine_callback);

    let outcome = engine.run(options).await;

    if let Some(ref pb) = progress_bar {
        match &outcome {
            Ok(result) => pb.finish_with_message(format!(
                "Scrape complete! {} records from {} page(s)",
                result.records.len(),
                result.metadata.pages_fetched
            )),
            Err(_) => pb.abandon_with_message(format!("Scrape of {} failed", site_name)),
        }
    }

    outcome.with_context(|| format!("scrape of {} failed", site_name))
}

/// Run independent jobs concurrently. Results come back in job order; one
/// failed job does not affect the others.
pub async fn execute_scrapes(jobs: Vec<ScrapeJob>) -> Vec<Result<RunResult>> {
    let results = join_all(jobs.into_iter().map(|job| execute_scrape(job, None))).await;
    for (idx, result) in results.iter().enumerate() {
        if let Err(e) = result {
            warn!("Job {} failed: {:#}", idx + 1, e);
        }
    }
    results
}

/// Generate a short human-readable summary of a finished run
pub fn generate_run_summary(result: &RunResult) -> String {
    let meta = &result.metadata;
    let skipped = result.pages.iter().filter(|p| p.is_skipped()).count();

    let mut summary = String::new();
    summary.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    summary.push_str("# Summary:\n");
    summary.push_str(&format!("  Site: {}\n", meta.site_name));
    summary.push_str(&format!("  Source: {}\n", meta.source_url));
    summary.push_str(&format!(
        "  Pages fetched: {}/{}\n",
        meta.pages_fetched, meta.pages_requested
    ));
    if skipped > 0 {
        summary.push_str(&format!("  Pages skipped: {}\n", skipped));
    }
    summary.push_str(&format!("  Records: {}\n", meta.total_records));
    summary.push_str(&format!("  Fields: {}\n", result.fields.join(", ")));
    summary.push_str(&format!("  Stopped: {}\n", describe_stop(meta.stop_reason)));
    summary.push_str(&format!(
        "  Duration: {:.1}s\n",
        (meta.finished_at - meta.started_at).num_milliseconds() as f64 / 1000.0
    ));
    summary.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    summary
}

pub fn describe_stop(reason: StopReason) -> &'static str {
    match reason {
        StopReason::PageBudget => "page limit reached",
        StopReason::PaginationExhausted => "no further pages",
        StopReason::NoContainers => "page had no listings",
        StopReason::Cancelled => "cancelled",
    }
}
