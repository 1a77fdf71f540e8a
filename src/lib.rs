//! knrec-harvest: a FAQ document harvester for the KNREC support portal
//!
//! This crate implements a browser-driven crawler that walks the paginated
//! FAQ listing of the Korea New & Renewable Energy Center website, follows
//! every listing entry to its detail page, and emits normalized,
//! duplicate-free document records to a persistence sink. Selector
//! configuration comes from a prior structural-analysis artifact, with
//! hardcoded fallbacks when the artifact is missing or incomplete.

pub mod analysis;
pub mod config;
pub mod crawler;
pub mod item;
pub mod pipeline;
pub mod session;

use thiserror::Error;

/// Main error type for knrec-harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser driver error: {0}")]
    Driver(#[from] session::DriverError),

    #[error("Sink error: {0}")]
    Sink(#[from] pipeline::SinkError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for knrec-harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use analysis::SelectorConfig;
pub use config::Config;
pub use crawler::{CrawlReport, Orchestrator};
pub use item::DocumentItem;
pub use session::{BrowserDriver, BrowserSession};
