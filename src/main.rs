//! Ripple-Crawl main entry point
//!
//! This is the command-line interface for the Ripple-Crawl crawler and its
//! companion utilities.

use chrono::Utc;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ripple_crawl::config::{
    apply_overrides, load_config_with_hash, validate_crawl_target, Config, ReportFormat,
};
use ripple_crawl::crawler::{build_fetcher, Coordinator, Fetcher, StaticFetcher};
use ripple_crawl::fibonacci::Fibonacci;
use ripple_crawl::greetings::hellos;
use ripple_crawl::output::{
    generate_markdown_summary, print_statistics, CollectingSink, ConsoleSink, CrawlSummary,
    JsonLinesSink, ReportSink, TeeSink,
};
use ripple_crawl::rot13::Rot13Reader;
use ripple_crawl::tree::{same_content, Tree};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Seed used by `crawl` when no configuration file is given
const SAMPLE_SEED: &str = "https://golang.org/";

/// Depth used by `crawl` when no configuration file is given
const SAMPLE_MAX_DEPTH: u32 = 4;

/// Ripple-Crawl: a depth-bounded concurrent crawler
#[derive(Parser, Debug)]
#[command(name = "ripple-crawl")]
#[command(version = "1.0.0")]
#[command(about = "A depth-bounded concurrent crawler", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Crawl from a seed, following links up to a maximum depth
    ///
    /// Without a configuration file the built-in golang.org page table is
    /// crawled from https://golang.org/ with depth 4.
    Crawl {
        /// Path to TOML configuration file
        #[arg(value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Override the seed identifier
        #[arg(long)]
        seed: Option<String>,

        /// Override the maximum depth
        #[arg(long)]
        max_depth: Option<u32>,

        /// Write reports as JSON lines
        #[arg(long)]
        json: bool,

        /// Validate the configuration and show what would be crawled
        #[arg(long)]
        dry_run: bool,
    },

    /// Compare the values of two random trees by walking them concurrently
    SameTrees {
        /// Multiplier for the first tree's values (k, 2k, ..., 10k)
        #[arg(long)]
        left: i64,

        /// Multiplier for the second tree's values
        #[arg(long)]
        right: i64,

        /// Seed for the insertion order
        #[arg(long)]
        rng_seed: Option<u64>,
    },

    /// Greet each name with a randomly chosen template
    Greet {
        #[arg(required = true)]
        names: Vec<String>,

        /// Seed for the template choice
        #[arg(long)]
        rng_seed: Option<u64>,
    },

    /// Decode ROT13 text (reads stdin when TEXT is absent)
    Rot13 { text: Option<String> },

    /// Print the first Fibonacci numbers
    Fib {
        #[arg(long, default_value_t = 10)]
        count: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Crawl {
            config,
            seed,
            max_depth,
            json,
            dry_run,
        } => handle_crawl(config.as_deref(), seed, max_depth, json, dry_run, cli.quiet).await,
        Commands::SameTrees {
            left,
            right,
            rng_seed,
        } => handle_same_trees(left, right, rng_seed).await,
        Commands::Greet { names, rng_seed } => handle_greet(&names, rng_seed),
        Commands::Rot13 { text } => handle_rot13(text),
        Commands::Fib { count } => {
            for value in Fibonacci::new().take(count) {
                println!("{}", value);
            }
            Ok(())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_crawl=info,warn"),
            1 => EnvFilter::new("ripple_crawl=debug,info"),
            2 => EnvFilter::new("ripple_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Handles the crawl subcommand
async fn handle_crawl(
    config_path: Option<&Path>,
    seed: Option<String>,
    max_depth: Option<u32>,
    json: bool,
    dry_run: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = match config_path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let loaded = load_config_with_hash(path)
                .and_then(|(cfg, hash)| Ok((apply_overrides(cfg, seed.clone(), max_depth)?, hash)));
            match loaded {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    Some((cfg, hash))
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => None,
    };

    let (fetcher, seed, max_depth, json, summary_path, config_hash): (
        Arc<dyn Fetcher>,
        String,
        u32,
        bool,
        Option<String>,
        Option<String>,
    ) = match &loaded {
        Some((config, hash)) => (
            build_fetcher(config)?,
            config.crawler.seed.clone(),
            config.crawler.max_depth,
            json || config.output.format == ReportFormat::Json,
            config.output.summary_path.clone(),
            Some(hash.clone()),
        ),
        None => {
            let seed = seed.unwrap_or_else(|| SAMPLE_SEED.to_string());
            let max_depth = max_depth.unwrap_or(SAMPLE_MAX_DEPTH);
            if let Err(e) = validate_crawl_target(&seed, max_depth) {
                tracing::error!("Invalid crawl target: {}", e);
                return Err(e.into());
            }
            (Arc::new(StaticFetcher::sample()), seed, max_depth, json, None, None)
        }
    };

    if dry_run {
        print_dry_run(loaded.as_ref().map(|(cfg, _)| cfg), &seed, max_depth);
        return Ok(());
    }

    let collector = Arc::new(CollectingSink::new());
    let printer: Arc<dyn ReportSink> = if json {
        Arc::new(JsonLinesSink::new(std::io::stdout()))
    } else {
        Arc::new(ConsoleSink)
    };
    let sink = TeeSink::new().with(printer).with(collector.clone());

    let started_at = Utc::now();
    let stats = Coordinator::new(fetcher, Arc::new(sink))
        .run(&seed, max_depth)
        .await;
    let finished_at = Utc::now();

    if !quiet && !json {
        println!();
        print_statistics(&stats);
    }

    if let Some(path) = summary_path {
        let mut summary =
            CrawlSummary::from_reports(stats, &collector.reports(), started_at, finished_at);
        if let Some(hash) = config_hash {
            summary = summary.with_config_hash(hash);
        }
        generate_markdown_summary(&summary, Path::new(&path))?;
        tracing::info!("Summary written to: {}", path);
    }

    Ok(())
}

/// Shows what a crawl would do without fetching anything
fn print_dry_run(config: Option<&Config>, seed: &str, max_depth: u32) {
    println!("=== Ripple-Crawl Dry Run ===\n");

    println!("Crawl:");
    println!("  Seed: {}", seed);
    println!("  Max depth: {}", max_depth);

    match config {
        Some(config) => {
            println!("\nFetcher:");
            println!("  Kind: {:?}", config.fetcher.kind);
            println!("  Timeout: {}s", config.fetcher.timeout_secs);
            if let Some(ua) = &config.user_agent {
                println!("  User agent: {}", ua.header_value());
            }
            println!("\nFixture pages ({}):", config.pages.len());
            for page in &config.pages {
                println!("  - {} ({} links)", page.id, page.links.len());
            }
            println!("\nOutput:");
            println!("  Format: {:?}", config.output.format);
            if let Some(path) = &config.output.summary_path {
                println!("  Summary: {}", path);
            }

            println!("\n✓ Configuration is valid");
        }
        None => println!("\nFetcher:\n  Built-in golang.org sample table"),
    }
}

async fn handle_same_trees(
    left: i64,
    right: i64,
    rng_seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = rng_from(rng_seed);
    let a = Arc::new(Tree::random(left, &mut rng));
    let b = Arc::new(Tree::random(right, &mut rng));

    println!("{}", same_content(a, b).await);
    Ok(())
}

fn handle_greet(names: &[String], rng_seed: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = rng_from(rng_seed);
    let messages = hellos(names, &mut rng)?;

    for name in names {
        if let Some(message) = messages.get(name) {
            println!("{}", message);
        }
    }
    Ok(())
}

fn handle_rot13(text: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let mut decoded = String::new();
    match text {
        Some(text) => Rot13Reader::new(text.as_bytes()).read_to_string(&mut decoded)?,
        None => Rot13Reader::new(std::io::stdin().lock()).read_to_string(&mut decoded)?,
    };

    print!("{}", decoded);
    if !decoded.ends_with('\n') {
        println!();
    }
    Ok(())
}
