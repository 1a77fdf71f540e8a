//! Deserialization and discovery of analysis artifacts
//!
//! Artifacts are JSON files named `<prefix>_analysis_<timestamp>.json`.
//! Because the timestamp is `%Y%m%d_%H%M%S`, lexicographic filename order
//! is chronological order, and the newest artifact is the lexicographic
//! maximum.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The analysis provider's record of what it found on the target site.
///
/// Every field is optional: the crawler must run with a partial artifact
/// or with none at all.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisArtifact {
    /// When the analysis ran (ISO timestamp)
    pub timestamp: Option<String>,

    /// The page the analysis inspected
    pub url: Option<String>,

    /// Listing selector that matched FAQ entries during analysis
    pub faq_selector_used: Option<String>,

    /// Best content selector found on a sample detail page
    pub recommended_content_selector: Option<String>,

    /// Selector of the simple-search tab link
    pub simple_search_tab: Option<String>,

    /// Total listing pages the analysis observed
    pub total_pages: Option<u32>,

    /// Number of FAQ entries found on the sample listing page
    pub faq_count: Option<u32>,

    /// Pagination links observed on the listing page
    #[serde(default)]
    pub pagination: Vec<PaginationLink>,

    /// Detail-page probe results
    pub detail_page_analysis: Option<DetailPageAnalysis>,
}

/// One pagination link observed during analysis
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationLink {
    pub text: Option<String>,
    pub href: Option<String>,
}

/// Results of probing a sample detail page for content containers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailPageAnalysis {
    /// Selectors that matched content, best first
    #[serde(default)]
    pub content_selectors: Vec<ContentSelectorProbe>,
}

/// One content-selector probe result
#[derive(Debug, Clone, Deserialize)]
pub struct ContentSelectorProbe {
    pub selector: String,
    pub text_length: Option<u64>,
}

/// Finds and loads the newest analysis artifact under `dir`.
///
/// Returns `None` (with a logged warning) when the directory is missing,
/// no matching file exists, or the newest file fails to parse — the
/// caller falls back to default selectors in all of these cases.
pub fn load_latest_artifact(dir: &Path, prefix: &str) -> Option<AnalysisArtifact> {
    let latest = match find_latest_file(dir, prefix) {
        Some(path) => path,
        None => {
            tracing::warn!(
                "No analysis artifact matching {}_analysis_*.json in {}, using default selectors",
                prefix,
                dir.display()
            );
            return None;
        }
    };

    tracing::info!("Loading analysis artifact: {}", latest.display());

    let content = match std::fs::read_to_string(&latest) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read artifact {}: {}", latest.display(), e);
            return None;
        }
    };

    match serde_json::from_str::<AnalysisArtifact>(&content) {
        Ok(artifact) => {
            if let Some(count) = artifact.faq_count {
                tracing::info!("Artifact reports {} FAQ entries per listing page", count);
            }
            if let Some(selector) = &artifact.faq_selector_used {
                tracing::info!("Artifact listing selector: {}", selector);
            }
            Some(artifact)
        }
        Err(e) => {
            tracing::warn!("Failed to parse artifact {}: {}", latest.display(), e);
            None
        }
    }
}

/// Picks the lexicographically greatest `<prefix>_analysis_*.json` filename.
fn find_latest_file(dir: &Path, prefix: &str) -> Option<PathBuf> {
    let marker = format!("{}_analysis_", prefix);
    let entries = std::fs::read_dir(dir).ok()?;

    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.starts_with(&marker) && name.ends_with(".json"))
                .unwrap_or(false)
        })
        .max()
}
