//! The immutable selector snapshot a crawl runs with

use crate::analysis::artifact::AnalysisArtifact;

/// Default listing selector, the one the target site has used for years
pub const DEFAULT_LISTING_SELECTOR: &str = "ul.result_list li";

/// Default detail-content selector
pub const DEFAULT_CONTENT_SELECTOR: &str = ".album_view_txt .p_txt";

/// Known-good alternates tried when the content selector fails
pub const DEFAULT_ALTERNATE_CONTENT_SELECTORS: [&str; 5] = [
    ".album_view_txt",
    ".content_area",
    ".faq_content",
    ".view_content",
    ".board_view",
];

/// Default simple-search tab link, matched by its accessible title
pub const DEFAULT_TAB_SELECTOR: &str = "a[title*='간편검색']";

/// Minimum character count for an alternate content selector to count as
/// a real answer rather than a decorative fragment
pub const DEFAULT_MIN_CONTENT_CHARS: usize = 20;

/// Selector configuration for one crawl run.
///
/// Built once at orchestrator start, read-only afterwards. Selectors come
/// from the analysis artifact where available; built-in defaults fill the
/// gaps and are kept as fallbacks behind artifact-supplied primaries.
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// Primary selector matching one listing entry per element
    pub listing_selector: String,

    /// Tried in order when the primary listing selector matches nothing
    pub alternate_listing_selectors: Vec<String>,

    /// Primary selector for the detail-page answer text
    pub content_selector: String,

    /// Tried in order when the primary content selector yields nothing
    pub alternate_content_selectors: Vec<String>,

    /// Link that switches the listing into simple-search mode
    pub tab_selector: String,

    /// Minimum accepted length for alternate-selector content, in chars
    pub min_content_chars: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            listing_selector: DEFAULT_LISTING_SELECTOR.to_string(),
            alternate_listing_selectors: Vec::new(),
            content_selector: DEFAULT_CONTENT_SELECTOR.to_string(),
            alternate_content_selectors: DEFAULT_ALTERNATE_CONTENT_SELECTORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            tab_selector: DEFAULT_TAB_SELECTOR.to_string(),
            min_content_chars: DEFAULT_MIN_CONTENT_CHARS,
        }
    }
}

impl SelectorConfig {
    /// Folds an analysis artifact into the default configuration.
    ///
    /// Artifact-supplied selectors become primaries; the displaced
    /// defaults are kept as alternates so a stale artifact degrades into
    /// a fallback step instead of an empty crawl. Artifact content probes
    /// are inserted ahead of the built-in alternates, best first.
    pub fn from_artifact(artifact: &AnalysisArtifact) -> Self {
        let mut config = Self::default();

        if let Some(selector) = &artifact.faq_selector_used {
            if !selector.trim().is_empty() && selector != &config.listing_selector {
                config
                    .alternate_listing_selectors
                    .push(config.listing_selector.clone());
                config.listing_selector = selector.clone();
            }
        }

        if let Some(selector) = &artifact.recommended_content_selector {
            if !selector.trim().is_empty() {
                config.content_selector = selector.clone();
            }
        }

        let mut alternates: Vec<String> = Vec::new();
        if let Some(detail) = &artifact.detail_page_analysis {
            for probe in &detail.content_selectors {
                alternates.push(probe.selector.clone());
            }
        }
        for default in DEFAULT_ALTERNATE_CONTENT_SELECTORS {
            alternates.push(default.to_string());
        }
        alternates.retain(|s| s != &config.content_selector);
        alternates.dedup();
        config.alternate_content_selectors = dedup_preserving_order(alternates);

        if let Some(selector) = &artifact.simple_search_tab {
            if !selector.trim().is_empty() {
                config.tab_selector = selector.clone();
            }
        }

        config
    }
}

fn dedup_preserving_order(selectors: Vec<String>) -> Vec<String> {
    let mut seen = Vec::new();
    for selector in selectors {
        if !seen.contains(&selector) {
            seen.push(selector);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::artifact::{
        AnalysisArtifact, ContentSelectorProbe, DetailPageAnalysis,
    };

    #[test]
    fn test_defaults() {
        let config = SelectorConfig::default();
        assert_eq!(config.listing_selector, "ul.result_list li");
        assert_eq!(config.content_selector, ".album_view_txt .p_txt");
        assert_eq!(config.alternate_content_selectors.len(), 5);
        assert_eq!(config.min_content_chars, 20);
    }

    #[test]
    fn test_empty_artifact_keeps_defaults() {
        let config = SelectorConfig::from_artifact(&AnalysisArtifact::default());
        assert_eq!(config.listing_selector, DEFAULT_LISTING_SELECTOR);
        assert_eq!(config.content_selector, DEFAULT_CONTENT_SELECTOR);
        assert!(config.alternate_listing_selectors.is_empty());
    }

    #[test]
    fn test_artifact_listing_selector_demotes_default() {
        let artifact = AnalysisArtifact {
            faq_selector_used: Some("div.faq_board li".to_string()),
            ..Default::default()
        };
        let config = SelectorConfig::from_artifact(&artifact);
        assert_eq!(config.listing_selector, "div.faq_board li");
        assert_eq!(
            config.alternate_listing_selectors,
            vec![DEFAULT_LISTING_SELECTOR.to_string()]
        );
    }

    #[test]
    fn test_artifact_content_probes_come_first() {
        let artifact = AnalysisArtifact {
            recommended_content_selector: Some(".album_view_txt .p_txt".to_string()),
            detail_page_analysis: Some(DetailPageAnalysis {
                content_selectors: vec![
                    ContentSelectorProbe {
                        selector: ".album_view_txt .p_txt".to_string(),
                        text_length: Some(512),
                    },
                    ContentSelectorProbe {
                        selector: ".faq_answer".to_string(),
                        text_length: Some(480),
                    },
                ],
            }),
            ..Default::default()
        };
        let config = SelectorConfig::from_artifact(&artifact);

        // The primary never appears among its own alternates
        assert!(!config
            .alternate_content_selectors
            .contains(&config.content_selector));
        assert_eq!(config.alternate_content_selectors[0], ".faq_answer");
        assert!(config
            .alternate_content_selectors
            .contains(&".board_view".to_string()));
    }

    #[test]
    fn test_blank_artifact_fields_ignored() {
        let artifact = AnalysisArtifact {
            faq_selector_used: Some("   ".to_string()),
            simple_search_tab: Some(String::new()),
            ..Default::default()
        };
        let config = SelectorConfig::from_artifact(&artifact);
        assert_eq!(config.listing_selector, DEFAULT_LISTING_SELECTOR);
        assert_eq!(config.tab_selector, DEFAULT_TAB_SELECTOR);
    }
}
