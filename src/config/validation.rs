use crate::config::types::{AnalysisConfig, Config, CrawlerConfig, OutputConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_analysis_config(&config.analysis)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates site URLs
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if base.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url must use HTTPS scheme, got '{}'",
            config.base_url
        )));
    }

    Url::parse(&config.listing_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid listing-url: {}", e)))?;

    if config.page_param.is_empty() {
        return Err(ConfigError::Validation(
            "page-param cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawl limits
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 || config.max_pages > 500 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be between 1 and 500, got {}",
            config.max_pages
        )));
    }

    if config.wait_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "wait-timeout-secs must be >= 1, got {}",
            config.wait_timeout_secs
        )));
    }

    Ok(())
}

fn validate_analysis_config(config: &AnalysisConfig) -> Result<(), ConfigError> {
    if config.artifact_dir.is_empty() {
        return Err(ConfigError::Validation(
            "artifact-dir cannot be empty".to_string(),
        ));
    }

    if config.artifact_prefix.is_empty() {
        return Err(ConfigError::Validation(
            "artifact-prefix cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.data_dir.is_empty() {
        return Err(ConfigError::Validation(
            "data-dir cannot be empty".to_string(),
        ));
    }

    if config.download_files && config.files_dir.is_empty() {
        return Err(ConfigError::Validation(
            "files-dir cannot be empty when download-files is enabled".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            site: SiteConfig {
                base_url: "https://www.knrec.or.kr".to_string(),
                listing_url: "https://www.knrec.or.kr/biz/faq/faq_list01.do".to_string(),
                page_param: "page".to_string(),
            },
            crawler: CrawlerConfig {
                max_pages: 35,
                max_items: 0,
                wait_timeout_secs: 10,
                page_delay_ms: 500,
            },
            analysis: AnalysisConfig {
                artifact_dir: "./output/analysis/knrec".to_string(),
                artifact_prefix: "knrec_faq".to_string(),
            },
            output: OutputConfig {
                data_dir: "./output/data".to_string(),
                files_dir: "./output/files".to_string(),
                download_files: false,
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_http_base_url_rejected() {
        let mut config = valid_config();
        config.site.base_url = "http://www.knrec.or.kr".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_malformed_base_url_rejected() {
        let mut config = valid_config();
        config.site.base_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_zero_max_pages_rejected() {
        let mut config = valid_config();
        config.crawler.max_pages = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_page_param_rejected() {
        let mut config = valid_config();
        config.site.page_param = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_files_dir_required_when_downloading() {
        let mut config = valid_config();
        config.output.download_files = true;
        config.output.files_dir = String::new();
        assert!(validate(&config).is_err());
    }
}
