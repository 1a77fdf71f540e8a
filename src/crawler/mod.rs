//! The crawl core: pagination planning, listing extraction, detail
//! fetching, deduplication, and the orchestrating state machine
//!
//! The orchestrator turns a flaky, stateful browser-driven source into a
//! best-effort-complete, duplicate-free item stream: pages are walked in
//! a fixed order computed up front, and every page and item carries its
//! own failure containment.

mod dedup;
mod detail;
mod listing;
mod orchestrator;
mod pagination;

pub use dedup::DedupLedger;
pub use detail::fetch_content;
pub use listing::{extract_entries, ExtractedListing, ListingEntry};
pub use orchestrator::{CancelFlag, CrawlReport, Orchestrator};
pub use pagination::plan_pages;

use crate::analysis::SelectorConfig;
use crate::config::Config;
use crate::pipeline::ItemSink;
use crate::session::{BrowserDriver, BrowserSession};
use crate::Result;
use std::time::Duration;

/// Runs a complete crawl against the given driver and sink.
///
/// Convenience wrapper for callers that do not need cancellation: builds
/// the session with the configured wait timeout, runs the orchestrator,
/// and closes the sink.
///
/// # Arguments
///
/// * `driver` - A started browser driver; exclusive ownership moves here
/// * `selectors` - The selector snapshot for this run
/// * `config` - The run configuration
/// * `sink` - Receives every emitted item, one at a time
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The run's planned-versus-achieved counters
/// * `Err(HarvestError)` - Start-up failure; the loops never propagate
pub async fn run_crawl<D: BrowserDriver, S: ItemSink>(
    driver: D,
    selectors: SelectorConfig,
    config: &Config,
    sink: &mut S,
) -> Result<CrawlReport> {
    let session = BrowserSession::new(
        driver,
        Duration::from_secs(config.crawler.wait_timeout_secs),
    );
    let mut orchestrator = Orchestrator::new(session, selectors, config)?;
    let report = orchestrator.run(sink).await?;
    sink.close().await?;
    Ok(report)
}
