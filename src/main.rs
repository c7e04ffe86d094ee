//! Schema-Crawler main entry point
//!
//! Command-line interface that crawls one site and packages its schema
//! documents.

use anyhow::{bail, Context};
use clap::Parser;
use schema_crawler::config::{load_config_with_hash, validate, Config};
use schema_crawler::jobs::{CrawlRequest, CrawlService, Job};
use schema_crawler::state::JobStatus;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Schema-Crawler: crawl a site and generate schema.org JSON-LD for it
///
/// Crawls pages reachable from the seed URL, generates a JSON-LD document
/// for each page and packages the documents with a loader script.
#[derive(Parser, Debug)]
#[command(name = "schema-crawler")]
#[command(version = "1.0.0")]
#[command(about = "Crawl a website and generate schema.org JSON-LD", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum pages to crawl (clamped to the configured ceiling)
    #[arg(short, long, value_name = "N")]
    max_pages: Option<usize>,

    /// Follow links to other hosts
    #[arg(long)]
    allow_cross_domain: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and request and show the crawl plan without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load(cli.config.as_ref())?;

    let mut request = CrawlRequest::new(cli.url.clone()).with_cross_domain(cli.allow_cross_domain);
    if let Some(max_pages) = cli.max_pages {
        request = request.with_max_pages(max_pages);
    }

    if cli.dry_run {
        return handle_dry_run(&config, &request);
    }

    let job = handle_crawl(&config, request, cli.quiet).await?;
    if job.status == JobStatus::Failed {
        bail!("crawl job {} failed", job.id);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("schema_crawler=info,warn"),
            1 => EnvFilter::new("schema_crawler=debug,info"),
            2 => EnvFilter::new("schema_crawler=trace,debug"),
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

/// Loads the configuration file, or the defaults when none is given
fn load(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using defaults");
        let config = Config::default();
        validate(&config).context("default configuration is invalid")?;
        return Ok(config);
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok(config)
}

/// Handles the --dry-run mode: validates the request and shows the plan
fn handle_dry_run(config: &Config, request: &CrawlRequest) -> anyhow::Result<()> {
    let job_config = request
        .validate(&config.crawler)
        .context("crawl request is invalid")?;

    println!("=== Schema-Crawler Dry Run ===\n");

    println!("Request:");
    println!("  Seed URL: {}", job_config.start_url);
    println!("  Page budget: {}", job_config.max_pages);
    println!("  Cross-domain: {}", job_config.allow_cross_domain);

    println!("\nFetcher:");
    println!("  Attempts: {}", config.fetcher.max_attempts);
    println!("  Backoff: {}ms", config.fetcher.backoff_ms);
    println!("  Navigation timeout: {}ms", config.fetcher.navigation_timeout_ms);
    println!("  Rate limit delay: {}ms", config.crawler.rate_limit_delay_ms);
    println!("  Proxies: {}", config.fetcher.proxies.len());

    println!("\nInference:");
    if config.inference.enabled {
        println!("  Endpoint: {}", config.inference.endpoint);
        println!("  Model: {}", config.inference.model);
    } else {
        println!("  Disabled (fallback documents only)");
    }

    println!("\nOutput:");
    println!("  Storage: {}", config.output.storage_dir);
    if config.output.sinks.archives() {
        println!("  Archive: yes");
    }
    if config.output.sinks.publishes() {
        println!(
            "  Publish: {} ({})",
            config.output.publish_dir, config.output.publish_base_url
        );
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl up to {} pages", job_config.max_pages);

    Ok(())
}

/// Runs one crawl job to completion, printing progress as it goes
async fn handle_crawl(config: &Config, request: CrawlRequest, quiet: bool) -> anyhow::Result<Job> {
    let service = CrawlService::from_config(config).context("failed to start crawl service")?;
    let submitted = service.submit(request).context("crawl request was rejected")?;
    let mut updates = service.subscribe(&submitted.id)?;

    let mut reported = 0;
    while updates.changed().await.is_ok() {
        let job = updates.borrow_and_update().clone();
        if !quiet && job.completed_pages.len() > reported {
            for page in &job.completed_pages[reported..] {
                println!(
                    "[{}/{}] {} ({} words)",
                    job.progress, job.total_pages, page.url, page.word_count
                );
            }
            reported = job.completed_pages.len();
        }
        if !job.status.is_active() {
            break;
        }
    }

    let job = submitted.handle.await.context("crawl task panicked")?;
    print_report(&job);
    Ok(job)
}

fn print_report(job: &Job) {
    println!("\n=== Crawl {} ===", job.status);
    println!("Job: {}", job.id);
    println!("Pages: {}", job.completed_pages.len());

    if let Some(outputs) = &job.outputs {
        println!("Output tree: {}", outputs.tree_dir);
        if let Some(archive) = &outputs.archive_path {
            println!("Archive: {}", archive);
        }
        if let Some(url) = &outputs.publish_url {
            println!("Published: {}", url);
        }
    }

    if let Some(tag) = job.artifacts.as_ref().and_then(|a| a.script_tag.as_ref()) {
        println!("\nAdd to your site:\n  {}", tag);
    }

    if !job.errors.is_empty() {
        println!("\nErrors ({}):", job.errors.len());
        for error in &job.errors {
            println!("  - {}", error);
        }
    }
}
