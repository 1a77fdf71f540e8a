//! Listing-page entry extraction
//!
//! Operates on the currently loaded listing page only; the caller must
//! already have navigated there and activated the search tab. Every entry
//! is copied into an owned [`ListingEntry`] before the function returns,
//! so nothing here survives as a live DOM reference once the orchestrator
//! navigates away.

use crate::analysis::SelectorConfig;
use crate::session::{BrowserDriver, BrowserSession, ElementSnapshot};
use url::Url;

/// One entry recovered from a listing page
#[derive(Debug, Clone, PartialEq)]
pub struct ListingEntry {
    /// Question title, non-empty
    pub title: String,

    /// Absolute detail-page URL, non-empty
    pub detail_url: String,

    /// Answer preview shown on the listing, if any
    pub content_preview: Option<String>,
}

/// Result of extracting one listing page
#[derive(Debug, Default)]
pub struct ExtractedListing {
    /// Well-formed entries in document order
    pub entries: Vec<ListingEntry>,

    /// Candidates dropped for missing a title or link
    pub dropped: usize,
}

/// Recovers the ordered entries of the currently loaded listing page.
///
/// The listing selector fallback chain is applied first: the primary
/// selector wins if it matches at least one element, otherwise each
/// alternate is tried in order. Malformed candidates are dropped with a
/// warning and counted; they never stop extraction of their siblings.
pub async fn extract_entries<D: BrowserDriver>(
    session: &mut BrowserSession<D>,
    selectors: &SelectorConfig,
    base_url: &Url,
) -> ExtractedListing {
    let candidates = locate_candidates(session, selectors).await;

    let mut listing = ExtractedListing::default();
    for (index, element) in candidates.iter().enumerate() {
        match build_entry(element, base_url) {
            Some(entry) => listing.entries.push(entry),
            None => {
                listing.dropped += 1;
                tracing::warn!("Listing entry {} missing title or link, dropped", index + 1);
            }
        }
    }

    listing
}

/// Walks the listing-selector fallback chain until one selector matches
async fn locate_candidates<D: BrowserDriver>(
    session: &mut BrowserSession<D>,
    selectors: &SelectorConfig,
) -> Vec<ElementSnapshot> {
    match session.find_elements(&selectors.listing_selector).await {
        Ok(elements) if !elements.is_empty() => return elements,
        Ok(_) => {
            tracing::debug!(
                "Listing selector '{}' matched nothing",
                selectors.listing_selector
            );
        }
        Err(e) => {
            tracing::debug!(
                "Listing selector '{}' failed: {}",
                selectors.listing_selector,
                e
            );
        }
    }

    for alternate in &selectors.alternate_listing_selectors {
        tracing::info!("Listing selector fallback: trying '{}'", alternate);
        match session.find_elements(alternate).await {
            Ok(elements) if !elements.is_empty() => return elements,
            Ok(_) => {}
            Err(e) => tracing::debug!("Alternate selector '{}' failed: {}", alternate, e),
        }
    }

    tracing::warn!("No listing selector matched any elements");
    Vec::new()
}

/// Builds an owned entry from one candidate element, or `None` when the
/// candidate has no usable title or link
fn build_entry(element: &ElementSnapshot, base_url: &Url) -> Option<ListingEntry> {
    // The candidate is usually an <li> wrapping the anchor, but an
    // artifact selector may match the anchor itself
    let href = element
        .select_attr("a", "href")
        .or_else(|| element.attr("href"))?;
    let detail_url = resolve_detail_url(&href, base_url)?;

    let title = anchor_title(element)?;

    let content_preview = element
        .select_text(".result_txt")
        .map(|text| text.replace("....", "").trim().to_string())
        .filter(|text| !text.is_empty());

    Some(ListingEntry {
        title,
        detail_url,
        content_preview,
    })
}

/// Title of a candidate: the anchor's `title` attribute when present and
/// non-blank, else derived from the anchor's visible text
fn anchor_title(element: &ElementSnapshot) -> Option<String> {
    let from_attr = element
        .select_attr("a", "title")
        .or_else(|| element.attr("title"))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    if from_attr.is_some() {
        return from_attr;
    }

    let text = element
        .select_text("a")
        .unwrap_or_else(|| element.text());
    let derived = derive_title(&text);
    if derived.is_empty() {
        None
    } else {
        Some(derived)
    }
}

/// Derives a question title from anchor text.
///
/// The first `?` is the question boundary and is kept; without one, the
/// first line wins; a single-line text is used whole.
pub(crate) fn derive_title(text: &str) -> String {
    let text = text.trim();
    if let Some(pos) = text.find('?') {
        return text[..=pos].trim().to_string();
    }
    if let Some(pos) = text.find('\n') {
        return text[..pos].trim().to_string();
    }
    text.to_string()
}

/// Resolves an anchor href to an absolute http(s) URL against the site
/// base. Root-relative and scheme-relative hrefs both resolve; script and
/// fragment pseudo-links are rejected.
fn resolve_detail_url(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }

    match base_url.join(href) {
        Ok(resolved) if resolved.scheme() == "http" || resolved.scheme() == "https" => {
            Some(resolved.to_string())
        }
        _ => None,
    }
}
