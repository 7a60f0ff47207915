use crate::config::{FieldSpec, SiteConfig, parse_url};
use crate::document::Document;
use crate::error::{ConfigError, FetchError, Result, ScanError};
use crate::fetcher::{HttpFetcher, PageFetcher, RawDocument};
use crate::field::FieldExtractor;
use crate::pagination::{NextPage, PageState, PaginationAdvancer};
use crate::result::{PageSummary, Record, RunMetadata, RunResult, StopReason};
use chrono::Utc;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

/// Called with (1-based page index, URL) before each page fetch.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per page, including the first.
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Per-run parameters. Validated before the first request.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub start_url: String,
    pub max_pages: usize,
    /// Pause between two page fetches, and between retry attempts.
    pub delay: Duration,
    /// Restrict extraction to these fields, in this order.
    pub fields: Option<Vec<String>>,
    pub cancel: CancellationToken,
}

impl RunOptions {
    pub fn new(start_url: impl Into<String>) -> Self {
        Self {
            start_url: start_url.into(),
            max_pages: 1,
            delay: DEFAULT_DELAY,
            fields: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    FetchingPage,
    ParsingPage,
    ExtractingRecords,
    Pausing,
    Done,
    Aborted,
}

struct StateTracker {
    state: RunState,
}

impl StateTracker {
    fn new() -> Self {
        Self {
            state: RunState::Idle,
        }
    }

    fn enter(&mut self, next: RunState) {
        debug!("{:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

/// Drives fetch, parse, extract and paginate for one site.
///
/// The engine keeps no per-run state: every call to [`run`](Self::run) owns
/// its own page counter and records, so independent runs can share an engine
/// or use separate ones concurrently.
pub struct ExtractionEngine<F = HttpFetcher> {
    site: SiteConfig,
    fetcher: F,
    retry: RetryPolicy,
    progress_callback: Option<ProgressCallback>,
}

impl ExtractionEngine<HttpFetcher> {
    pub fn new(site: SiteConfig) -> Result<Self> {
        let fetcher = HttpFetcher::for_site(&site)?;
        Ok(Self::with_fetcher(site, fetcher))
    }
}

impl<F: PageFetcher> ExtractionEngine<F> {
    pub fn with_fetcher(site: SiteConfig, fetcher: F) -> Self {
        Self {
            site,
            fetcher,
            retry: RetryPolicy::default(),
            progress_callback: None,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    pub async fn run(&self, options: RunOptions) -> Result<RunResult> {
        let mut tracker = StateTracker::new();

        let start_url = parse_url(&options.start_url)?;
        if options.max_pages == 0 {
            return Err(ConfigError::ZeroPageBudget.into());
        }
        let fields = self.site.select_fields(options.fields.as_deref())?;
        let field_names: Vec<String> = fields.iter().map(|f| f.name().to_string()).collect();

        info!(
            "Starting run of {} at {} ({} page(s) max, fields: {})",
            self.site.site_name(),
            start_url,
            options.max_pages,
            field_names.join(", ")
        );

        let advancer = PaginationAdvancer::new(self.site.pagination(), &start_url, options.max_pages);
        let started_at = Utc::now();
        let mut records: Vec<Record> = Vec::new();
        let mut pages: Vec<PageSummary> = Vec::new();
        let mut pages_fetched = 0;
        let mut current = advancer.first_url();
        let mut index = 1;

        let stop_reason = loop {
            if options.cancel.is_cancelled() {
                info!("Run cancelled before page {}", index);
                break StopReason::Cancelled;
            }

            if index > 1 {
                tracker.enter(RunState::Pausing);
                if Self::pause(options.delay, &options.cancel).await {
                    info!("Run cancelled while pausing before page {}", index);
                    break StopReason::Cancelled;
                }
            }

            tracker.enter(RunState::FetchingPage);
            if let Some(ref callback) = self.progress_callback {
                callback(index, current.to_string());
            }

            let step = match self.fetch_with_retry(&current, options.delay).await {
                Ok((raw, attempts)) => {
                    pages_fetched += 1;
                    let (summary, step) = self.process_page(
                        &raw,
                        &fields,
                        index,
                        &advancer,
                        options.max_pages,
                        attempts,
                        &mut records,
                        &mut tracker,
                    );
                    pages.push(summary);
                    step
                }
                Err((error, attempts)) if index == 1 => {
                    tracker.enter(RunState::Aborted);
                    warn!("First page {} failed: {}", current, error);
                    return Err(ScanError::FirstPage {
                        url: current.to_string(),
                        attempts,
                        source: error,
                    });
                }
                Err((error, attempts)) => {
                    warn!("Skipping page {} ({}): {}", index, current, error);
                    pages.push(PageSummary::with_error(
                        index,
                        current.to_string(),
                        attempts,
                        error.to_string(),
                    ));
                    let state = PageState {
                        index,
                        url: &current,
                        document: None,
                    };
                    Self::advance(&advancer, options.max_pages, &state)
                }
            };

            match step {
                ControlFlow::Continue(next) => current = next,
                ControlFlow::Break(reason) => break reason,
            }
            index += 1;
        };

        tracker.enter(RunState::Done);
        info!(
            "Run of {} finished ({}): {} record(s) from {} page(s)",
            self.site.site_name(),
            stop_reason.as_str(),
            records.len(),
            pages_fetched
        );

        let metadata = RunMetadata {
            site_name: self.site.site_name().to_string(),
            source_url: start_url.to_string(),
            pages_requested: options.max_pages,
            pages_fetched,
            total_records: records.len(),
            started_at,
            finished_at: Utc::now(),
            stop_reason,
        };

        Ok(RunResult {
            records,
            fields: field_names,
            pages,
            metadata,
        })
    }

    /// Parse one fetched page, append its records and decide where to go next.
    /// The parsed tree never outlives this call.
    #[allow(clippy::too_many_arguments)]
    fn process_page(
        &self,
        raw: &RawDocument,
        fields: &[&FieldSpec],
        index: usize,
        advancer: &PaginationAdvancer<'_>,
        max_pages: usize,
        attempts: u32,
        records: &mut Vec<Record>,
        tracker: &mut StateTracker,
    ) -> (PageSummary, ControlFlow<StopReason, Url>) {
        let mut summary = PageSummary::new(index, raw.url.to_string());
        summary.status_code = raw.status_code;
        summary.response_time = raw.response_time;
        summary.attempts = attempts;

        tracker.enter(RunState::ParsingPage);
        let document = Document::parse(&raw.body);
        let containers = document.containers(self.site.container());
        summary.containers_found = containers.len();
        info!("Page {} ({}): {} container(s)", index, raw.url, containers.len());
        if let Some(title) = document.title() {
            debug!("Page {} title: {}", index, title);
        }

        if containers.is_empty() {
            return (summary, ControlFlow::Break(StopReason::NoContainers));
        }

        tracker.enter(RunState::ExtractingRecords);
        let extractor = FieldExtractor::for_page(&raw.url);
        for container in containers {
            let mut record = Record::with_capacity(fields.len());
            for spec in fields {
                record.push(spec.name(), extractor.extract(container, spec));
            }
            records.push(record);
        }
        debug!("{} record(s) collected so far", records.len());

        let state = PageState {
            index,
            url: &raw.url,
            document: Some(&document),
        };
        (summary, Self::advance(advancer, max_pages, &state))
    }

    /// The page budget is checked before the pagination strategy is asked.
    fn advance(
        advancer: &PaginationAdvancer<'_>,
        max_pages: usize,
        state: &PageState<'_>,
    ) -> ControlFlow<StopReason, Url> {
        if state.index >= max_pages {
            return ControlFlow::Break(StopReason::PageBudget);
        }
        match advancer.next(state) {
            NextPage::Url(next) => ControlFlow::Continue(next),
            NextPage::Stop => ControlFlow::Break(StopReason::PaginationExhausted),
        }
    }

    async fn fetch_with_retry(
        &self,
        url: &Url,
        delay: Duration,
    ) -> std::result::Result<(RawDocument, u32), (FetchError, u32)> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.fetcher.fetch(url).await {
                Ok(raw) => return Ok((raw, attempt)),
                Err(error) if attempt < max_attempts => {
                    warn!(
                        "Attempt {}/{} for {} failed: {}",
                        attempt, max_attempts, url, error
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                Err(error) => return Err((error, attempt)),
            }
        }
    }

    /// Sleep for `delay`. Returns true if cancelled while waiting.
    async fn pause(delay: Duration, cancel: &CancellationToken) -> bool {
        if delay.is_zero() {
            return cancel.is_cancelled();
        }
        tokio::select! {
            _ = tokio::time::sleep(delay) => false,
            _ = cancel.cancelled() => true,
        }
    }
}
