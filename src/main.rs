mod crawl;
mod db;
mod discovery;
mod error;
mod fetch;
mod parser;
mod profile;
mod report;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::warn;
use url::Url;

use crawl::{CrawlConfig, Crawler};
use fetch::{FetchConfig, HttpFetcher, DEFAULT_TIMEOUT_SECS};
use parser::noise::{self, NoiseClassifier};

#[derive(Parser)]
#[command(name = "company_profiler", about = "Company website profiler: founders, team, testimonials")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl a company website and build its profile
    Crawl {
        /// Homepage URL (https:// is assumed when no scheme is given)
        url: String,
        /// JSON output path (default: <company>_<timestamp>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Max pages to visit, homepage included (1-5; larger values are capped)
        #[arg(long, default_value_t = discovery::DEFAULT_MAX_PAGES)]
        max_pages: usize,
        /// Pages fetched concurrently
        #[arg(short = 'j', long, default_value = "1")]
        concurrency: usize,
        /// Per-page fetch timeout in seconds
        #[arg(long, env = "PROFILER_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout: u64,
        /// Disable a noise rule by name (repeatable)
        #[arg(long = "disable-rule", value_name = "NAME")]
        disable_rules: Vec<String>,
        /// Skip saving to the SQLite history
        #[arg(long)]
        no_db: bool,
        #[arg(long, env = "PROFILER_DB", default_value = db::DEFAULT_DB_PATH)]
        db: PathBuf,
    },
    /// Recently crawled companies
    Overview {
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
        #[arg(long, env = "PROFILER_DB", default_value = db::DEFAULT_DB_PATH)]
        db: PathBuf,
    },
    /// Show crawl history totals
    Stats {
        #[arg(long, env = "PROFILER_DB", default_value = db::DEFAULT_DB_PATH)]
        db: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Crawl {
            url,
            output,
            max_pages,
            concurrency,
            timeout,
            disable_rules,
            no_db,
            db,
        } => {
            let base_url = normalize_url(&url)?;
            let max_pages = max_pages.clamp(1, discovery::DEFAULT_MAX_PAGES);
            let noise = noise_classifier(&disable_rules)?;

            let fetch_config = FetchConfig {
                timeout: Duration::from_secs(timeout),
                ..FetchConfig::default()
            };
            let crawl_config = CrawlConfig {
                max_pages,
                concurrency,
                show_progress: std::io::stderr().is_terminal(),
            };
            let crawler =
                Crawler::new(HttpFetcher::new(&fetch_config)?, crawl_config).with_noise(noise);

            println!("Crawling {} (up to {} pages)...", base_url, max_pages);
            let (profile, stats) = crawler.crawl(&base_url).await;

            report::print_summary(&profile, &stats);
            let path = report::save_json(&profile, output.as_deref())?;
            println!("\nSaved to: {}", path.display());

            if !no_db {
                // History is best-effort; the JSON file is the primary output.
                match save_history(&db, &profile) {
                    Ok(id) => println!("Recorded crawl #{} in {}", id, db.display()),
                    Err(e) => warn!("Could not record crawl in {}: {:#}", db.display(), e),
                }
            }
            Ok(())
        }
        Commands::Overview { limit, db } => {
            let conn = db::connect(&db)?;
            db::init_schema(&conn)?;
            let rows = db::fetch_overview(&conn, limit)?;
            if rows.is_empty() {
                println!("No crawls recorded. Run 'crawl' first.");
                return Ok(());
            }

            println!(
                "{:>4} | {:<24} | {:<32} | {:>4} | {:>4} | {:>5} | {:<7} | {:<19}",
                "#", "Company", "URL", "Fndr", "Team", "Quote", "Contact", "Scraped"
            );
            println!("{}", "-".repeat(121));

            for r in &rows {
                println!(
                    "{:>4} | {:<24} | {:<32} | {:>4} | {:>4} | {:>5} | {:<7} | {:<19}",
                    r.id,
                    report::truncate(&r.name, 24),
                    report::truncate(&r.url, 32),
                    r.founders,
                    r.team,
                    r.testimonials,
                    if r.has_contact { "yes" } else { "-" },
                    r.scraped_at
                );
            }

            println!("\n{} crawls", rows.len());
            Ok(())
        }
        Commands::Stats { db } => {
            let conn = db::connect(&db)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Crawls:        {}", s.crawls);
            println!("Sites:         {}", s.sites);
            println!("Founders:      {}", s.founders);
            println!("Team members:  {}", s.team_members);
            println!("Testimonials:  {}", s.testimonials);
            println!("With contact:  {}", s.with_contact);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn save_history(path: &std::path::Path, profile: &profile::CompanyProfile) -> anyhow::Result<i64> {
    let conn = db::connect(path)?;
    db::init_schema(&conn)?;
    db::save_profile(&conn, profile)
}

/// Accepts bare hosts ("acme.com") by assuming https.
fn normalize_url(raw: &str) -> anyhow::Result<Url> {
    let raw = raw.trim();
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };
    let url = Url::parse(&candidate).with_context(|| format!("Invalid URL: {}", raw))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        bail!("Invalid URL: {} (expected an http(s) site)", raw);
    }
    Ok(url)
}

fn noise_classifier(disabled: &[String]) -> anyhow::Result<NoiseClassifier> {
    let mut classifier = NoiseClassifier::default();
    for name in disabled {
        if !noise::is_known_rule(name) {
            bail!(
                "Unknown noise rule '{}'. Known rules: {}",
                name,
                NoiseClassifier::default().rule_names().join(", ")
            );
        }
        classifier = classifier.without(name);
    }
    Ok(classifier)
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
