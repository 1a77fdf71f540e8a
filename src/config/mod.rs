//! Run configuration: TOML parsing and validation
//!
//! Configuration is split into site identity (URLs), crawl limits,
//! analysis-artifact location, and output paths. Loading and validation
//! are separate steps so tests can construct configs directly.

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{AnalysisConfig, Config, CrawlerConfig, OutputConfig, SiteConfig};
pub use validation::validate;
