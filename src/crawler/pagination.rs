//! Pagination planning
//!
//! Runs once per crawl, against the already-loaded listing root. The page
//! count is read from the on-page pagination controls; when the signals
//! disagree the largest wins, and when discovery fails entirely the
//! configured ceiling substitutes. Planning errors are never fatal — a
//! crawl always gets a page sequence.

use crate::session::{BrowserDriver, BrowserSession};
use url::Url;

/// Selectors the pagination controls have been observed under
const PAGINATION_PROBE: &str = ".paging a, .pagination a, .page_navi a";

/// Computes the ordered sequence of listing pages to visit.
///
/// The result is always `1..=max` for some `max >= 1`, where `max` is the
/// largest page number discovered from the pagination controls, clamped to
/// `fallback_ceiling`; the ceiling itself is used when nothing can be
/// discovered.
pub async fn plan_pages<D: BrowserDriver>(
    session: &mut BrowserSession<D>,
    base_url: &Url,
    page_param: &str,
    fallback_ceiling: u32,
) -> Vec<u32> {
    let max_page = match discover_max_page(session, base_url, page_param).await {
        Some(found) if found > fallback_ceiling => {
            tracing::info!(
                "Discovered {} pages, clamping to configured ceiling {}",
                found,
                fallback_ceiling
            );
            fallback_ceiling
        }
        Some(found) => {
            tracing::info!("Discovered {} listing pages from pagination controls", found);
            found
        }
        None => {
            tracing::warn!(
                "Could not discover page count, falling back to ceiling {}",
                fallback_ceiling
            );
            fallback_ceiling
        }
    };

    (1..=max_page).collect()
}

/// Reads the largest page number advertised by the pagination controls.
///
/// Two signals per link: a purely numeric link text, and a `page_param`
/// query parameter in the link's href (the "last page" arrow carries one
/// even though its text is a glyph).
async fn discover_max_page<D: BrowserDriver>(
    session: &mut BrowserSession<D>,
    base_url: &Url,
    page_param: &str,
) -> Option<u32> {
    let links = match session.find_elements(PAGINATION_PROBE).await {
        Ok(links) => links,
        Err(e) => {
            tracing::warn!("Pagination probe failed: {}", e);
            return None;
        }
    };

    let mut max_page: Option<u32> = None;
    for link in &links {
        if let Ok(number) = link.text().parse::<u32>() {
            max_page = Some(max_page.map_or(number, |m| m.max(number)));
        }
        if let Some(href) = link.attr("href") {
            if let Some(number) = page_number_from_href(&href, base_url, page_param) {
                max_page = Some(max_page.map_or(number, |m| m.max(number)));
            }
        }
    }

    max_page.filter(|&m| m >= 1)
}

fn page_number_from_href(href: &str, base_url: &Url, page_param: &str) -> Option<u32> {
    let resolved = base_url.join(href.trim()).ok()?;
    for (key, value) in resolved.query_pairs() {
        if key == page_param {
            return value.parse().ok();
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::StubDriver;
    use std::time::Duration;

    const ROOT: &str = "https://faq.test/list.do";

    async fn plan_with_fixture(html: &str, ceiling: u32) -> Vec<u32> {
        let driver = StubDriver::new().page(ROOT, html);
        let mut session = BrowserSession::new(driver, Duration::from_secs(1));
        session.navigate(ROOT).await.unwrap();
        let base = Url::parse("https://faq.test/").unwrap();
        plan_pages(&mut session, &base, "page", ceiling).await
    }

    #[tokio::test]
    async fn test_numeric_link_texts() {
        let html = r#"<div class="paging">
            <a href="?page=1">1</a><a href="?page=2">2</a><a href="?page=3">3</a>
        </div>"#;
        let pages = plan_with_fixture(html, 35).await;
        assert_eq!(pages, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_last_page_arrow_wins() {
        let html = r#"<div class="paging">
            <a href="?page=1">1</a><a href="?page=2">2</a>
            <a href="?page=12" class="last">&gt;&gt;</a>
        </div>"#;
        let pages = plan_with_fixture(html, 35).await;
        assert_eq!(pages.len(), 12);
        assert_eq!(pages.last(), Some(&12));
    }

    #[tokio::test]
    async fn test_no_controls_uses_ceiling() {
        let pages = plan_with_fixture("<ul class=\"result_list\"></ul>", 7).await;
        assert_eq!(pages, (1..=7).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_discovery_clamped_to_ceiling() {
        let html = r#"<div class="pagination"><a href="?page=90">90</a></div>"#;
        let pages = plan_with_fixture(html, 35).await;
        assert_eq!(pages.len(), 35);
    }

    #[tokio::test]
    async fn test_sequence_is_contiguous_from_one() {
        let html = r#"<div class="page_navi"><a href="?page=5">5</a></div>"#;
        let pages = plan_with_fixture(html, 35).await;
        assert_eq!(pages, vec![1, 2, 3, 4, 5]);
    }
}
