//! CovidLab CLI — fetch and cache management commands.
//!
//! Commands:
//! - `fetch` — pull the daily series for one or more areas and print summaries
//! - `cache status` — report cached responses
//! - `cache clear` — drop all cached responses

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use covidlab_core::analytics;
use covidlab_core::data::{fetch_areas, ResponseCache, StdoutProgress};
use covidlab_core::domain::{sort_most_recent_first, Area, DailyRecord, Nation};
use covidlab_core::{ClientConfig, CovidDataClient};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "covidlab",
    about = "CovidLab CLI — coronavirus dashboard series fetcher"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the daily series for one or more areas and print summaries.
    Fetch {
        /// Areas to fetch: nation names, or local authorities with --ltla.
        /// Defaults to all four nations.
        areas: Vec<String>,

        /// Treat the named areas as local authorities (ltla granularity).
        #[arg(long, default_value_t = false)]
        ltla: bool,

        /// Cache directory. Defaults to ./cache.
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Transport timeout in seconds.
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Path to a TOML config file (flags override its values).
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Cache management commands.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Report cached responses.
    Status {
        /// Cache directory. Defaults to ./cache.
        #[arg(long, default_value = "cache")]
        cache_dir: PathBuf,
    },
    /// Drop all cached responses.
    Clear {
        /// Cache directory. Defaults to ./cache.
        #[arg(long, default_value = "cache")]
        cache_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            areas,
            ltla,
            cache_dir,
            timeout_secs,
            config,
        } => run_fetch(areas, ltla, cache_dir, timeout_secs, config).await,
        Commands::Cache { action } => match action {
            CacheAction::Status { cache_dir } => run_cache_status(&cache_dir),
            CacheAction::Clear { cache_dir } => run_cache_clear(&cache_dir),
        },
    }
}

async fn run_fetch(
    names: Vec<String>,
    ltla: bool,
    cache_dir: Option<PathBuf>,
    timeout_secs: Option<u64>,
    config: Option<PathBuf>,
) -> Result<()> {
    let mut cfg = match config {
        Some(path) => ClientConfig::from_toml_file(&path)?,
        None => ClientConfig::default(),
    };
    if let Some(dir) = cache_dir {
        cfg.cache_dir = dir;
    }
    if let Some(secs) = timeout_secs {
        cfg.timeout_secs = secs;
    }

    let areas = resolve_areas(&names, ltla)?;
    let client = Arc::new(CovidDataClient::new(cfg)?);
    let summary = fetch_areas(client, &areas, &StdoutProgress).await;

    for (area, mut records) in summary.series {
        sort_most_recent_first(&mut records);
        print_summary(&area, &records);
    }

    if summary.succeeded == 0 && summary.total > 0 {
        bail!("all {} fetches failed", summary.total);
    }
    Ok(())
}

fn resolve_areas(names: &[String], ltla: bool) -> Result<Vec<Area>> {
    if names.is_empty() {
        if ltla {
            bail!("--ltla requires at least one area name");
        }
        return Ok(Nation::all().into_iter().map(Area::Nation).collect());
    }

    names
        .iter()
        .map(|name| {
            if ltla {
                Ok(Area::Region(name.clone()))
            } else {
                name.parse::<Nation>().map(Area::Nation).map_err(|e| anyhow!(e))
            }
        })
        .collect()
}

fn print_summary(area: &Area, records: &[DailyRecord]) {
    println!("\n=== {} ===", area.area_name());

    let Some(latest) = analytics::latest(records) else {
        println!("  no data");
        return;
    };

    println!(
        "  {}  +{} cases ({} total)",
        latest.date, latest.new_cases, latest.total_cases
    );
    println!(
        "            +{} deaths ({} total)",
        latest.new_deaths, latest.total_deaths
    );
    println!(
        "  admissions: {}   ventilator beds: {}",
        latest.new_hospital_admissions,
        analytics::ventilator_occupancy(records)
    );

    print_series("cases   7d", &analytics::smoothed_new_cases(records));
    print_series("cases  21d", &analytics::raw_new_cases(records));
    print_series("deaths  7d", &analytics::smoothed_new_deaths(records));
    print_series("deaths 21d", &analytics::raw_new_deaths(records));
}

fn print_series(label: &str, values: &[f64]) {
    let row: Vec<String> = values.iter().map(|v| format!("{v:.2}")).collect();
    println!("  {label}: [{}]", row.join(" "));
}

fn run_cache_status(cache_dir: &PathBuf) -> Result<()> {
    let entries = ResponseCache::new(cache_dir).status();
    if entries.is_empty() {
        println!("Cache is empty ({})", cache_dir.display());
        return Ok(());
    }

    println!("Cached responses in {}:", cache_dir.display());
    for entry in entries {
        println!(
            "  {}  {}  {} bytes  stored {}",
            &entry.key[..12.min(entry.key.len())],
            entry.area_name.as_deref().unwrap_or("<unknown>"),
            entry
                .body_bytes
                .map_or_else(|| "?".to_string(), |b| b.to_string()),
            entry
                .stored_at
                .map_or_else(|| "?".to_string(), |t| t.to_string()),
        );
    }
    Ok(())
}

fn run_cache_clear(cache_dir: &PathBuf) -> Result<()> {
    let removed = ResponseCache::new(cache_dir).clear()?;
    println!("Removed {removed} cached response(s)");
    Ok(())
}
