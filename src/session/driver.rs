//! The browser driver capability trait and its element snapshot type

use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by browser drivers
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Failed to start browser backend: {0}")]
    Startup(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Timed out waiting for selector '{selector}'")]
    WaitTimeout { selector: String },

    #[error("No clickable element for selector '{selector}'")]
    ClickFailed { selector: String },

    #[error("Invalid selector '{selector}'")]
    InvalidSelector { selector: String },

    #[error("No page loaded")]
    NoPage,

    #[error("Browser backend error: {0}")]
    Backend(String),
}

/// Result type alias for driver operations
pub type DriverResult<T> = Result<T, DriverError>;

/// The narrow browser capability the crawler is written against.
///
/// One navigation at a time: every method takes `&mut self`, so a driver
/// can never be asked to serve two page loads concurrently. Implementations
/// must bound every wait — a hung page surfaces as an error, never as an
/// indefinite block.
#[allow(async_fn_in_trait)]
pub trait BrowserDriver {
    /// Loads the given absolute URL, replacing the current page
    async fn navigate(&mut self, url: &str) -> DriverResult<()>;

    /// Waits until at least one element matches `selector`, up to `timeout`
    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> DriverResult<()>;

    /// Clicks the first element matching `selector`
    async fn click(&mut self, selector: &str) -> DriverResult<()>;

    /// Returns owned snapshots of all elements matching `selector`, in
    /// document order
    async fn find_elements(&mut self, selector: &str) -> DriverResult<Vec<ElementSnapshot>>;

    /// Releases the browser resource; further calls may fail
    async fn close(&mut self) -> DriverResult<()>;
}

/// An owned copy of a matched element.
///
/// Snapshots carry the element's outer HTML and answer text/attribute
/// queries by re-parsing it. Because nothing in a snapshot references the
/// live page, extraction results stay valid across navigations — the
/// "extract before you navigate" rule is enforced by construction, not by
/// convention.
#[derive(Debug, Clone)]
pub struct ElementSnapshot {
    html: String,
}

impl ElementSnapshot {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// The element's full visible text, trimmed
    pub fn text(&self) -> String {
        let fragment = Html::parse_fragment(&self.html);
        fragment
            .root_element()
            .text()
            .collect::<String>()
            .trim()
            .to_string()
    }

    /// An attribute of the element itself
    pub fn attr(&self, name: &str) -> Option<String> {
        let fragment = Html::parse_fragment(&self.html);
        let element = snapshot_root(&fragment)?;
        element.value().attr(name).map(|v| v.to_string())
    }

    /// Trimmed text of the first descendant matching `selector`
    pub fn select_text(&self, selector: &str) -> Option<String> {
        let parsed = Selector::parse(selector).ok()?;
        let fragment = Html::parse_fragment(&self.html);
        let text = fragment
            .select(&parsed)
            .next()?
            .text()
            .collect::<String>()
            .trim()
            .to_string();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// An attribute of the first descendant matching `selector`
    pub fn select_attr(&self, selector: &str, name: &str) -> Option<String> {
        let parsed = Selector::parse(selector).ok()?;
        let fragment = Html::parse_fragment(&self.html);
        fragment
            .select(&parsed)
            .next()?
            .value()
            .attr(name)
            .map(|v| v.to_string())
    }
}

/// First real element of a parsed snapshot, skipping the wrapper elements
/// the fragment parser may synthesize around it
fn snapshot_root(fragment: &Html) -> Option<ElementRef<'_>> {
    fragment
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|element| !matches!(element.value().name(), "html" | "head" | "body"))
}

/// Collects the outer HTML of every match of `selector` in `body`.
///
/// Shared by the DOM-backed drivers; document order is preserved.
pub(crate) fn select_outer_html(body: &str, selector: &str) -> DriverResult<Vec<String>> {
    let parsed = Selector::parse(selector).map_err(|_| DriverError::InvalidSelector {
        selector: selector.to_string(),
    })?;
    let document = Html::parse_document(body);
    Ok(document
        .select(&parsed)
        .map(|element| element.html())
        .collect())
}
