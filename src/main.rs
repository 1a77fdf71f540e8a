//! knrec-harvest main entry point
//!
//! Command-line interface for the KNREC FAQ harvester.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use knrec_harvest::analysis::{load_latest_artifact, SelectorConfig};
use knrec_harvest::config::{load_config, Config};
use knrec_harvest::crawler::Orchestrator;
use knrec_harvest::pipeline::{FileDownloadSink, ItemSink, JsonArrayWriter};
use knrec_harvest::session::{BrowserDriver, BrowserSession, HttpDriver};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// knrec-harvest: KNREC FAQ document harvester
///
/// Walks the paginated FAQ listing of the KNREC support portal, follows
/// every entry to its detail page, and writes normalized JSON documents
/// for the downstream ingest pipeline.
#[derive(Parser, Debug)]
#[command(name = "knrec-harvest")]
#[command(version = "0.3.0")]
#[command(about = "KNREC FAQ document harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config, show the effective selectors, and exit
    #[arg(long)]
    dry_run: bool,

    /// Browser backend to crawl with
    #[arg(long, value_enum, default_value_t = DriverKind::Http)]
    driver: DriverKind,

    /// Stop after emitting this many items (overrides max-items)
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DriverKind {
    /// Plain HTTP client; sufficient for the server-rendered listing
    Http,
    /// Headless Chrome (requires the `chrome` build feature)
    Chrome,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    if let Some(limit) = cli.limit {
        config.crawler.max_items = limit;
    }

    // Selector configuration: newest analysis artifact, defaults otherwise
    let artifact = load_latest_artifact(
        Path::new(&config.analysis.artifact_dir),
        &config.analysis.artifact_prefix,
    );
    let selectors = match &artifact {
        Some(artifact) => SelectorConfig::from_artifact(artifact),
        None => SelectorConfig::default(),
    };

    if cli.dry_run {
        handle_dry_run(&config, &selectors);
        return Ok(());
    }

    match cli.driver {
        DriverKind::Http => {
            let driver = HttpDriver::new()?;
            run_harvest(driver, selectors, &config).await
        }
        DriverKind::Chrome => run_with_chrome(selectors, &config).await,
    }
}

#[cfg(feature = "chrome")]
async fn run_with_chrome(selectors: SelectorConfig, config: &Config) -> anyhow::Result<()> {
    let driver = knrec_harvest::session::ChromeDriver::new()?;
    run_harvest(driver, selectors, config).await
}

#[cfg(not(feature = "chrome"))]
async fn run_with_chrome(_selectors: SelectorConfig, _config: &Config) -> anyhow::Result<()> {
    anyhow::bail!("Chrome driver not compiled in; rebuild with --features chrome")
}

/// Runs the crawl with Ctrl-C wired to the page-boundary cancellation
async fn run_harvest<D: BrowserDriver>(
    driver: D,
    selectors: SelectorConfig,
    config: &Config,
) -> anyhow::Result<()> {
    let session = BrowserSession::new(
        driver,
        Duration::from_secs(config.crawler.wait_timeout_secs),
    );
    let mut orchestrator = Orchestrator::new(session, selectors, config)?;

    let cancel = orchestrator.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping at the next page boundary");
            cancel.cancel();
        }
    });

    let writer = JsonArrayWriter::create(Path::new(&config.output.data_dir), "knrec_faq")?;
    let report = if config.output.download_files {
        let mut sink = FileDownloadSink::new(writer, &config.output.files_dir)?;
        let report = orchestrator.run(&mut sink).await?;
        sink.close().await?;
        report
    } else {
        let mut sink = writer;
        let report = orchestrator.run(&mut sink).await?;
        sink.close().await?;
        report
    };

    println!("=== Harvest Summary ===");
    println!(
        "Pages:      {}/{} processed, {} failed",
        report.pages_processed, report.pages_planned, report.pages_failed
    );
    println!("Items:      {} emitted", report.items_emitted);
    println!("Duplicates: {} skipped", report.duplicates_skipped);
    println!(
        "Dropped:    {} malformed entries, {} item failures",
        report.entries_dropped, report.item_failures
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("knrec_harvest=info,warn"),
            1 => EnvFilter::new("knrec_harvest=debug,info"),
            2 => EnvFilter::new("knrec_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what a crawl would use
fn handle_dry_run(config: &Config, selectors: &SelectorConfig) {
    println!("=== knrec-harvest Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Listing URL: {}", config.site.listing_url);
    println!("  Page parameter: {}", config.site.page_param);

    println!("\nCrawler:");
    println!("  Pagination ceiling: {}", config.crawler.max_pages);
    println!(
        "  Item limit: {}",
        if config.crawler.max_items == 0 {
            "unlimited".to_string()
        } else {
            config.crawler.max_items.to_string()
        }
    );
    println!("  Wait timeout: {}s", config.crawler.wait_timeout_secs);
    println!("  Page delay: {}ms", config.crawler.page_delay_ms);

    println!("\nSelectors:");
    println!("  Listing: {}", selectors.listing_selector);
    for alternate in &selectors.alternate_listing_selectors {
        println!("    alternate: {}", alternate);
    }
    println!("  Content: {}", selectors.content_selector);
    for alternate in &selectors.alternate_content_selectors {
        println!("    alternate: {}", alternate);
    }
    println!("  Tab: {}", selectors.tab_selector);
    println!("  Min content length: {}", selectors.min_content_chars);

    println!("\nOutput:");
    println!("  Data directory: {}", config.output.data_dir);
    println!("  Files directory: {}", config.output.files_dir);
    println!("  Download attachments: {}", config.output.download_files);

    println!("\n✓ Configuration is valid");
}
