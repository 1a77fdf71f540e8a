//! Detail-page content extraction
//!
//! Navigates to a detail URL and walks the content-selector fallback
//! chain. Every failure mode — navigation, wait, selector miss, short
//! match — degrades to the next candidate or to an empty string; the
//! caller substitutes the listing preview or sentinel. Nothing here ever
//! aborts the run.

use crate::analysis::SelectorConfig;
use crate::session::{BrowserDriver, BrowserSession};

/// Fetches the full answer text for one detail URL.
///
/// Returns an empty string when navigation fails, the content container
/// never appears, or every selector in the chain comes up empty. The
/// primary selector succeeds on any non-empty text; alternates must
/// additionally clear `min_content_chars`, which keeps a decorative
/// near-empty element from masquerading as the answer.
pub async fn fetch_content<D: BrowserDriver>(
    session: &mut BrowserSession<D>,
    url: &str,
    selectors: &SelectorConfig,
) -> String {
    if let Err(e) = session.navigate(url).await {
        tracing::warn!("Detail navigation failed for {}: {}", url, e);
        return String::new();
    }

    if let Err(e) = session.wait_for(&selectors.content_selector).await {
        tracing::warn!("Content container did not appear on {}: {}", url, e);
        return String::new();
    }

    if let Some(text) = selector_text(session, &selectors.content_selector).await {
        tracing::debug!(
            "Primary content selector matched on {} ({} chars)",
            url,
            text.chars().count()
        );
        return text;
    }

    for alternate in &selectors.alternate_content_selectors {
        if let Some(text) = selector_text(session, alternate).await {
            if text.chars().count() >= selectors.min_content_chars {
                tracing::info!(
                    "Content selector fallback '{}' succeeded on {} ({} chars)",
                    alternate,
                    url,
                    text.chars().count()
                );
                return text;
            }
        }
    }

    tracing::warn!("All content selectors exhausted for {}", url);
    String::new()
}

/// Joined text of all elements matching `selector` on the current page.
///
/// Multiple matches happen when the answer is rendered across sibling
/// nodes; their distinct trimmed texts are joined with a blank line.
/// Selector errors count as "no match".
async fn selector_text<D: BrowserDriver>(
    session: &mut BrowserSession<D>,
    selector: &str,
) -> Option<String> {
    let elements = match session.find_elements(selector).await {
        Ok(elements) => elements,
        Err(e) => {
            tracing::debug!("Content selector '{}' failed: {}", selector, e);
            return None;
        }
    };

    let mut texts: Vec<String> = Vec::new();
    for element in &elements {
        let text = element.text();
        if text.is_empty() || texts.contains(&text) {
            continue;
        }
        texts.push(text);
    }

    if texts.is_empty() {
        None
    } else {
        Some(texts.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::StubDriver;
    use std::time::Duration;

    const DETAIL_URL: &str = "https://faq.test/d/1";

    async fn fetch_from(html: &str, selectors: &SelectorConfig) -> String {
        let driver = StubDriver::new().page(DETAIL_URL, html);
        let mut session = BrowserSession::new(driver, Duration::from_secs(1));
        fetch_content(&mut session, DETAIL_URL, selectors).await
    }

    #[tokio::test]
    async fn test_primary_selector_wins() {
        let html = r#"<div class="album_view_txt">
            <p class="p_txt">신재생에너지 설비의 지원 대상은 주택 소유자입니다.</p>
        </div>"#;
        let content = fetch_from(html, &SelectorConfig::default()).await;
        assert_eq!(content, "신재생에너지 설비의 지원 대상은 주택 소유자입니다.");
    }

    #[tokio::test]
    async fn test_sibling_nodes_joined_and_deduplicated() {
        let html = r#"<div class="album_view_txt">
            <p class="p_txt">첫 번째 문단입니다.</p>
            <p class="p_txt">첫 번째 문단입니다.</p>
            <p class="p_txt">두 번째 문단입니다.</p>
        </div>"#;
        let content = fetch_from(html, &SelectorConfig::default()).await;
        assert_eq!(content, "첫 번째 문단입니다.\n\n두 번째 문단입니다.");
    }

    #[tokio::test]
    async fn test_alternate_needs_minimum_length() {
        // Primary is present but empty; the first alternate matches the
        // container whose text is long enough
        let html = r#"<div class="album_view_txt">
            <p class="p_txt"> </p>
            설비 지원 조건과 신청 절차에 대한 자세한 안내문입니다.
        </div>"#;
        let content = fetch_from(html, &SelectorConfig::default()).await;
        assert!(content.contains("설비 지원 조건과 신청 절차"));
    }

    #[tokio::test]
    async fn test_short_alternate_rejected() {
        let html = r#"<div class="album_view_txt"><p class="p_txt"> </p>짧음</div>"#;
        let content = fetch_from(html, &SelectorConfig::default()).await;
        assert_eq!(content, "");
    }

    #[tokio::test]
    async fn test_missing_container_returns_empty() {
        let content = fetch_from("<p>전혀 다른 페이지</p>", &SelectorConfig::default()).await;
        assert_eq!(content, "");
    }

    #[tokio::test]
    async fn test_failed_navigation_returns_empty() {
        let driver = StubDriver::new().failing_page(DETAIL_URL);
        let mut session = BrowserSession::new(driver, Duration::from_secs(1));
        let content = fetch_content(&mut session, DETAIL_URL, &SelectorConfig::default()).await;
        assert_eq!(content, "");
    }
}
