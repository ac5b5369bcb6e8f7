//! Domain-Miner main entry point
//!
//! This is the command-line interface for the Domain-Miner single-domain crawler.

use anyhow::Context;
use clap::Parser;
use domain_miner::config::{load_config_with_hash, validate, CrawlConfig};
use domain_miner::output::print_summary;
use domain_miner::robots::robots_url;
use domain_miner::{Crawler, Profile};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// How often crawl progress is logged
const PROGRESS_INTERVAL: Duration = Duration::from_secs(5);

/// Domain-Miner: a polite single-domain data miner
///
/// Domain-Miner crawls one domain with a pool of concurrent workers while
/// respecting robots.txt, and extracts contacts, SEO metadata or page text
/// from every page it fetches.
#[derive(Parser, Debug)]
#[command(name = "domain-miner")]
#[command(version = "1.0.0")]
#[command(about = "A polite single-domain data miner", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", required_unless_present = "list_profiles")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Extraction profile, overriding the config file
    #[arg(long, value_name = "PROFILE")]
    profile: Option<Profile>,

    /// Save the raw HTML of every fetched page into the output directory
    #[arg(long)]
    save_html: bool,

    /// Maximum number of pages to fetch, overriding the config file
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Number of concurrent workers, overriding the config file
    #[arg(long, value_name = "N")]
    max_workers: Option<usize>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "list_profiles")]
    dry_run: bool,

    /// List the available extraction profiles and exit
    #[arg(long)]
    list_profiles: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration
    fn apply_overrides(&self, config: &mut CrawlConfig) {
        if let Some(profile) = self.profile {
            config.profile = profile;
        }
        if self.save_html {
            config.save_html = true;
        }
        if let Some(max_pages) = self.max_pages {
            config.max_pages = max_pages;
        }
        if let Some(max_workers) = self.max_workers {
            config.max_workers = max_workers;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.list_profiles {
        handle_list_profiles();
        return Ok(());
    }

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config_path = cli
        .config
        .as_deref()
        .context("a configuration file is required")?;

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", config_path.display());
    let (config, config_hash) = load_config_with_hash(config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let mut crawl_config = config.crawler;
    cli.apply_overrides(&mut crawl_config);
    validate(&crawl_config).context("Invalid command-line override")?;

    if cli.dry_run {
        handle_dry_run(&crawl_config);
    } else {
        handle_crawl(crawl_config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("domain_miner=info,warn"),
            1 => EnvFilter::new("domain_miner=debug,info"),
            2 => EnvFilter::new("domain_miner=trace,debug"),
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

fn handle_list_profiles() {
    println!("Available profiles:");
    for profile in Profile::ALL {
        println!("  {:<10} {}", profile.as_str(), profile.description());
    }
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &CrawlConfig) {
    println!("=== Domain-Miner Dry Run ===\n");

    println!("Target:");
    println!("  Start URL: {}", config.start_url);
    println!("  Allowed domain: {}", config.allowed_domain);
    match &config.robots_url {
        Some(url) => println!("  robots.txt: {}", url),
        None => println!("  robots.txt: {}", robots_url(&config.allowed_domain)),
    }

    println!("\nCrawler Configuration:");
    println!("  Workers: {}", config.max_workers);
    println!("  Max pages: {}", config.max_pages);
    println!("  Queue capacity: {}", config.queue_capacity);
    println!("  Request timeout: {}s", config.request_timeout);
    println!("  User agent: {}", config.user_agent);

    println!("\nExtraction:");
    println!("  Profile: {} ({})", config.profile, config.profile.description());
    println!("  Save HTML: {}", config.save_html);

    println!("\nOutput:");
    println!("  Results: {}", config.results_path().display());
    println!("  Log file: {}", config.log_file.display());

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl mode
async fn handle_crawl(config: CrawlConfig) -> anyhow::Result<()> {
    let crawler = Crawler::new(config).context("Failed to initialize crawler")?;

    let progress = crawler.progress();
    let ticker = tokio::spawn(async move {
        let mut interval = tokio::time::interval(PROGRESS_INTERVAL);
        interval.tick().await;
        loop {
            interval.tick().await;
            tracing::info!(
                "Progress: {}/{} pages ({:.0}%), {} queued",
                progress.page_count(),
                progress.page_cap(),
                progress.fraction() * 100.0,
                progress.queued()
            );
        }
    });

    let result = crawler.run().await;
    ticker.abort();
    let summary = result.context("Crawl failed")?;

    println!();
    print_summary(&summary);

    let path = crawler
        .save_results()
        .context("Failed to save results")?;
    println!("\nResults written to {}", path.display());

    Ok(())
}
