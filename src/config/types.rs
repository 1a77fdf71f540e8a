use serde::Deserialize;

/// Main configuration structure for knrec-harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
}

/// Target-site identity
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base origin used to resolve relative detail links
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// URL of the paginated FAQ listing (the simple-search tab view)
    #[serde(rename = "listing-url")]
    pub listing_url: String,

    /// Query parameter carrying the listing page number
    #[serde(rename = "page-param", default = "default_page_param")]
    pub page_param: String,
}

/// Crawl limits and timing
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Pagination ceiling used when on-page discovery fails, and the hard
    /// cap on the number of listing pages visited
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Stop after emitting this many items; 0 means unlimited
    #[serde(rename = "max-items", default)]
    pub max_items: usize,

    /// Bounded wait for page loads and element presence, in seconds
    #[serde(rename = "wait-timeout-secs", default = "default_wait_timeout")]
    pub wait_timeout_secs: u64,

    /// Pause between listing-page visits, in milliseconds
    #[serde(rename = "page-delay-ms", default = "default_page_delay")]
    pub page_delay_ms: u64,
}

/// Where to find the analysis provider's selector artifact
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Directory scanned for artifact files
    #[serde(rename = "artifact-dir")]
    pub artifact_dir: String,

    /// Artifact filename prefix; the newest `<prefix>_analysis_*.json` wins
    #[serde(rename = "artifact-prefix", default = "default_artifact_prefix")]
    pub artifact_prefix: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the timestamped JSON result files
    #[serde(rename = "data-dir")]
    pub data_dir: String,

    /// Directory receiving downloaded attachments
    #[serde(rename = "files-dir", default = "default_files_dir")]
    pub files_dir: String,

    /// Whether the attachment download sink is enabled
    #[serde(rename = "download-files", default)]
    pub download_files: bool,
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_max_pages() -> u32 {
    35
}

fn default_wait_timeout() -> u64 {
    10
}

fn default_page_delay() -> u64 {
    500
}

fn default_artifact_prefix() -> String {
    "knrec_faq".to_string()
}

fn default_files_dir() -> String {
    "./output/files".to_string()
}
