//! Crawl orchestration: the sequential PAGE/ITEM state machine
//!
//! One run is INIT → PLAN → PAGE loop (each page containing an ITEM loop)
//! → TERMINATE. Each page and each item carries its own failure
//! containment: a dead page or a broken entry shrinks the result and
//! leaves a warning, never aborts the run. The only error `run` can
//! return to the caller is one that happens before the loops start.
//!
//! Pages are visited by constructed URL rather than by clicking "next";
//! every visit is a fresh, idempotent page load, so DOM staleness cannot
//! compound across the walk.

use crate::analysis::SelectorConfig;
use crate::config::Config;
use crate::crawler::dedup::DedupLedger;
use crate::crawler::detail::fetch_content;
use crate::crawler::listing::{extract_entries, ListingEntry};
use crate::crawler::pagination::plan_pages;
use crate::item::{DocumentItem, CONTENT_UNAVAILABLE, DOCUMENT_TYPE_FAQ, SOURCE_NAME};
use crate::pipeline::ItemSink;
use crate::session::{BrowserDriver, BrowserSession};
use crate::HarvestError;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Cooperative cancellation handle, checked between page visits
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; takes effect at the next page boundary
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Outcome counters for one crawl run.
///
/// `pages_planned` vs `pages_processed` is the operator's signal that a
/// run degraded: a clean run has equal counts and zero failures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlReport {
    /// Pages the walker planned
    pub pages_planned: usize,

    /// Pages that loaded and went through extraction
    pub pages_processed: usize,

    /// Pages skipped after navigation or wait failure
    pub pages_failed: usize,

    /// Items handed to the sink
    pub items_emitted: usize,

    /// Entries skipped because their URL was already claimed
    pub duplicates_skipped: usize,

    /// Listing candidates dropped for missing title or link
    pub entries_dropped: usize,

    /// Entries whose processing failed after dedup
    pub item_failures: usize,
}

/// Drives one complete crawl run against an exclusively owned session
pub struct Orchestrator<D: BrowserDriver> {
    session: BrowserSession<D>,
    selectors: SelectorConfig,
    base_url: Url,
    listing_url: Url,
    page_param: String,
    max_pages: u32,
    max_items: usize,
    page_delay: Duration,
    ledger: DedupLedger,
    cancel: CancelFlag,
}

impl<D: BrowserDriver> Orchestrator<D> {
    /// Builds an orchestrator from an already-started session.
    ///
    /// Session start-up is the caller's problem precisely because its
    /// failure is the one fatal error of a crawl; everything after this
    /// point degrades instead of aborting.
    pub fn new(
        session: BrowserSession<D>,
        selectors: SelectorConfig,
        config: &Config,
    ) -> Result<Self, HarvestError> {
        let base_url = Url::parse(&config.site.base_url)?;
        let listing_url = Url::parse(&config.site.listing_url)?;

        Ok(Self {
            session,
            selectors,
            base_url,
            listing_url,
            page_param: config.site.page_param.clone(),
            max_pages: config.crawler.max_pages,
            max_items: config.crawler.max_items,
            page_delay: Duration::from_millis(config.crawler.page_delay_ms),
            ledger: DedupLedger::new(),
            cancel: CancelFlag::new(),
        })
    }

    /// Handle for requesting cancellation from outside the run
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Runs the full crawl, streaming every emitted item into `sink`.
    ///
    /// Always terminates and always releases the browser session. The
    /// returned report carries the planned-versus-achieved counts that
    /// the summary log also records.
    pub async fn run<S: ItemSink>(&mut self, sink: &mut S) -> Result<CrawlReport, HarvestError> {
        let mut report = CrawlReport::default();

        // INIT: land on the listing root and switch to the search tab so
        // pagination discovery sees the right view
        if let Err(e) = self.session.navigate(self.listing_url.as_str()).await {
            tracing::warn!(
                "Initial listing navigation failed: {} (pagination falls back to ceiling)",
                e
            );
        }
        self.activate_tab().await;

        // PLAN
        let pages = plan_pages(
            &mut self.session,
            &self.base_url,
            &self.page_param,
            self.max_pages,
        )
        .await;
        report.pages_planned = pages.len();
        tracing::info!("Planned {} listing pages", pages.len());

        'pages: for page in pages {
            if self.cancel.is_cancelled() {
                tracing::info!("Cancellation requested, stopping before page {}", page);
                break;
            }

            let page_url = self.page_url(page);
            if let Err(e) = self.visit_listing(&page_url).await {
                tracing::warn!("Skipping page {}: {}", page, e);
                report.pages_failed += 1;
                continue;
            }

            let listing = extract_entries(&mut self.session, &self.selectors, &self.base_url).await;
            report.entries_dropped += listing.dropped;
            if listing.entries.is_empty() {
                tracing::warn!("No entries extracted from page {}", page);
            } else {
                tracing::info!("Page {}: {} entries extracted", page, listing.entries.len());
            }

            for entry in &listing.entries {
                if self.max_items > 0 && report.items_emitted >= self.max_items {
                    tracing::info!("Item limit {} reached, stopping", self.max_items);
                    break 'pages;
                }

                if self.ledger.seen(&entry.detail_url) {
                    report.duplicates_skipped += 1;
                    tracing::debug!("Duplicate URL skipped: {}", entry.detail_url);
                    continue;
                }
                self.ledger.record(&entry.detail_url);

                match self.process_entry(page, entry, sink).await {
                    Ok(()) => report.items_emitted += 1,
                    Err(e) => {
                        report.item_failures += 1;
                        tracing::warn!(
                            "Failed to process '{}' ({}): {}",
                            entry.title,
                            entry.detail_url,
                            e
                        );
                    }
                }
            }

            report.pages_processed += 1;

            if self.page_delay > Duration::ZERO {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        // TERMINATE: nothing between the loops and here can early-return,
        // so the session is released on every path through the run
        if let Err(e) = self.session.close().await {
            tracing::warn!("Browser session teardown failed: {}", e);
        }

        tracing::info!(
            "Crawl finished: {}/{} pages processed ({} failed), {} items emitted, \
             {} duplicates skipped, {} entries dropped, {} item failures",
            report.pages_processed,
            report.pages_planned,
            report.pages_failed,
            report.items_emitted,
            report.duplicates_skipped,
            report.entries_dropped,
            report.item_failures
        );

        Ok(report)
    }

    /// Loads one listing page and prepares it for extraction
    async fn visit_listing(&mut self, url: &Url) -> Result<(), crate::session::DriverError> {
        self.session.navigate(url.as_str()).await?;
        // Every visit is a full page load, so the tab choice from the
        // previous page never persists
        self.activate_tab().await;
        self.session.wait_for(&self.selectors.listing_selector).await?;
        Ok(())
    }

    /// Best-effort tab activation; failure means we are already on the
    /// right view.
    ///
    /// When the listing is already visible the click is skipped outright:
    /// on a server-rendered site the tab is a link, and re-clicking it
    /// would reload the first page and discard the current one.
    async fn activate_tab(&mut self) {
        if let Ok(elements) = self
            .session
            .find_elements(&self.selectors.listing_selector)
            .await
        {
            if !elements.is_empty() {
                tracing::debug!("Listing already visible, tab activation skipped");
                return;
            }
        }

        match self.session.click(&self.selectors.tab_selector).await {
            Ok(()) => tracing::debug!("Search tab activated"),
            Err(e) => tracing::debug!("Tab activation skipped: {}", e),
        }
    }

    /// Fetches, normalizes, and emits one listing entry
    async fn process_entry<S: ItemSink>(
        &mut self,
        page: u32,
        entry: &ListingEntry,
        sink: &mut S,
    ) -> Result<(), HarvestError> {
        let detail = fetch_content(&mut self.session, &entry.detail_url, &self.selectors).await;
        let content = resolve_content(
            detail,
            entry.content_preview.as_deref(),
            self.selectors.min_content_chars,
        );

        let now = Utc::now();
        let item = DocumentItem {
            page,
            title: entry.title.clone(),
            content,
            url: entry.detail_url.clone(),
            source: SOURCE_NAME.to_string(),
            document_type: DOCUMENT_TYPE_FAQ.to_string(),
            date_published: now.date_naive(),
            crawled_at: now,
            file_urls: Vec::new(),
        };

        sink.process(item).await?;
        Ok(())
    }

    /// URL of one listing page, addressed directly by page number
    fn page_url(&self, page: u32) -> Url {
        let mut url = self.listing_url.clone();
        url.query_pairs_mut()
            .append_pair(&self.page_param, &page.to_string());
        url
    }
}

/// Chooses the item content: detail text when it clears the minimum
/// length, else the listing preview, else the sentinel. Never empty.
fn resolve_content(detail: String, preview: Option<&str>, min_chars: usize) -> String {
    if detail.chars().count() >= min_chars {
        return detail;
    }

    match preview {
        Some(p) if !p.is_empty() => {
            tracing::warn!("Detail extraction failed, using listing preview");
            p.to_string()
        }
        _ => {
            tracing::warn!("Detail extraction failed, using sentinel content");
            CONTENT_UNAVAILABLE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnalysisConfig, CrawlerConfig, OutputConfig, SiteConfig};
    use crate::pipeline::SinkError;
    use crate::session::StubDriver;

    struct VecSink(Vec<DocumentItem>);

    impl ItemSink for VecSink {
        async fn process(&mut self, item: DocumentItem) -> Result<(), SinkError> {
            self.0.push(item);
            Ok(())
        }

        async fn close(&mut self) -> Result<(), SinkError> {
            Ok(())
        }
    }

    fn test_config(max_pages: u32, max_items: usize) -> Config {
        Config {
            site: SiteConfig {
                base_url: "https://faq.test".to_string(),
                listing_url: "https://faq.test/list.do".to_string(),
                page_param: "page".to_string(),
            },
            crawler: CrawlerConfig {
                max_pages,
                max_items,
                wait_timeout_secs: 1,
                page_delay_ms: 0,
            },
            analysis: AnalysisConfig {
                artifact_dir: "./unused".to_string(),
                artifact_prefix: "knrec_faq".to_string(),
            },
            output: OutputConfig {
                data_dir: "./unused".to_string(),
                files_dir: "./unused".to_string(),
                download_files: false,
            },
        }
    }

    fn listing_page(hrefs: &[(&str, &str)]) -> String {
        let items: String = hrefs
            .iter()
            .map(|(href, title)| {
                format!(
                    r#"<li><a href="{}"><span class="result_tit">{}</span></a></li>"#,
                    href, title
                )
            })
            .collect();
        format!(r#"<ul class="result_list">{}</ul>"#, items)
    }

    fn detail_page(text: &str) -> String {
        format!(
            r#"<div class="album_view_txt"><p class="p_txt">{}</p></div>"#,
            text
        )
    }

    #[test]
    fn test_resolve_content_prefers_long_detail() {
        let detail = "충분히 긴 상세 페이지의 본문 내용입니다.".to_string();
        assert_eq!(
            resolve_content(detail.clone(), Some("미리보기"), 5),
            detail
        );
    }

    #[test]
    fn test_resolve_content_short_detail_uses_preview() {
        assert_eq!(
            resolve_content("짧음".to_string(), Some("미리보기 내용"), 20),
            "미리보기 내용"
        );
    }

    #[test]
    fn test_resolve_content_sentinel_when_nothing() {
        assert_eq!(resolve_content(String::new(), None, 20), CONTENT_UNAVAILABLE);
        assert_eq!(
            resolve_content(String::new(), Some(""), 20),
            CONTENT_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_item_limit_stops_run() {
        let answer = "설비 지원 대상과 조건에 대한 자세한 답변입니다.";
        let driver = StubDriver::new()
            .page("https://faq.test/list.do", &listing_page(&[("/d/1", "Q1?"), ("/d/2", "Q2?")]))
            .page(
                "https://faq.test/list.do?page=1",
                &listing_page(&[("/d/1", "Q1?"), ("/d/2", "Q2?")]),
            )
            .page("https://faq.test/d/1", &detail_page(answer))
            .page("https://faq.test/d/2", &detail_page(answer));

        let session = BrowserSession::new(driver, Duration::from_secs(1));
        let mut orchestrator =
            Orchestrator::new(session, SelectorConfig::default(), &test_config(1, 1)).unwrap();

        let mut sink = VecSink(Vec::new());
        let report = orchestrator.run(&mut sink).await.unwrap();

        assert_eq!(report.items_emitted, 1);
        assert_eq!(sink.0.len(), 1);
        assert_eq!(sink.0[0].url, "https://faq.test/d/1");
    }

    #[tokio::test]
    async fn test_pre_cancelled_run_visits_no_pages() {
        let driver = StubDriver::new().page(
            "https://faq.test/list.do",
            &listing_page(&[("/d/1", "Q1?")]),
        );
        let session = BrowserSession::new(driver, Duration::from_secs(1));
        let mut orchestrator =
            Orchestrator::new(session, SelectorConfig::default(), &test_config(3, 0)).unwrap();

        orchestrator.cancel_flag().cancel();

        let mut sink = VecSink(Vec::new());
        let report = orchestrator.run(&mut sink).await.unwrap();

        assert_eq!(report.pages_processed, 0);
        assert_eq!(report.items_emitted, 0);
        // Planning still happened before the first page boundary
        assert_eq!(report.pages_planned, 3);
    }
}
