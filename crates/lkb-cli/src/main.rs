//! 🚀 lkb-cli: the front door, the bouncer, the maitre d' of lakebridge.
//!
//! 🎬 *[narrator voice]* "It all started with a simple main() function..."
//! 📦 Thin wrapper: parse args, set up logging, load config, then let the library do the
//! heavy lifting. Like a manager. 🦆

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lkb::generators::{Dataset, SampleDataGenerator, save_to_file};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// 🔧 The config file we look for when nobody passes `--config`.
const DEFAULT_CONFIG_FILE: &str = "lkb.toml";

/// 🪣🦆 Move CSVs between an S3-compatible bucket and DuckDB, and watch them become tables.
#[derive(Debug, Parser)]
#[command(name = "lkb-cli", version, about)]
struct Cli {
    /// TOML config file. Defaults to ./lkb.toml when it exists, env vars (LKB_*) otherwise.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the full demo: upload, list, load, query, export, presign.
    Run,
    /// Write one sample dataset to a file or stdout.
    Generate {
        /// sales, employees, products or time-series
        dataset: Dataset,
        /// Rows to generate (days, for time-series). Ignored for products.
        #[arg(long, default_value_t = 10)]
        rows: usize,
        /// Seed for reproducible output.
        #[arg(long)]
        seed: Option<u64>,
        /// Output file. Stdout when absent.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// 🔍 Pick the config file: an explicit one must exist, the default one may not.
fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) => {
            let exists = path.try_exists().with_context(|| {
                format!("💀 Couldn't check whether '{}' exists", path.display())
            })?;
            anyhow::ensure!(
                exists,
                "💀 Configuration file '{}' doesn't exist. Relative paths resolve against the \
                 current directory; an absolute path removes the guesswork.",
                path.display()
            );
            Ok(Some(path.to_path_buf()))
        }
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_FILE);
            Ok(fallback.is_file().then(|| fallback.to_path_buf()))
        }
    }
}

fn generate(dataset: Dataset, rows: usize, seed: Option<u64>, out: Option<&Path>) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let mut generator = match seed {
        Some(seed) => SampleDataGenerator::seeded(seed, today),
        None => SampleDataGenerator::from_entropy(today),
    };
    let text = generator
        .generate(dataset, rows)
        .with_context(|| format!("💀 Failed to generate {dataset}"))?;
    match out {
        Some(path) => save_to_file(&text, path)
            .with_context(|| format!("💀 Failed to write {dataset} to '{}'", path.display())),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let config_path = resolve_config_path(cli.config.as_deref())?;
            let app_config = lkb::app_config::load_config(config_path.as_deref())
                .context("💀 In lkb-cli, main, we couldn't load the config. Check the file and the LKB_* env vars.")?;
            info!("🔧 store: {:?}", app_config.store);
            lkb::run(app_config).await
        }
        Command::Generate {
            dataset,
            rows,
            seed,
            out,
        } => generate(dataset, rows, seed, out.as_deref()),
    }
}

/// 🕵️ Does this error chain smell like nothing is listening on the other end?
fn looks_like_connection_trouble(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        let cause_str = cause.to_string();
        cause_str.contains("dispatch failure")
            || cause_str.contains("error sending request")
            || cause_str.contains("connection refused")
            || cause_str.contains("Connection refused")
            || cause_str.contains("tcp connect error")
            || cause_str.contains("dns error")
    })
}

/// 🚀 main(): where it all begins. The "I pressed F5 and held my breath" moment.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(err) = dispatch(cli).await {
        error!("💀 error: {}", err);
        // -- 🧅 peel the onion of sadness, one layer at a time
        for cause in err.chain().skip(1) {
            error!("⚠️  cause: {}", cause);
        }

        if looks_like_connection_trouble(&err) {
            error!(
                "🔧 hint: looks like the object store isn't reachable. \
                Double-check that MinIO (or whatever speaks S3 for you) is running and that \
                [store].endpoint points at it. With Docker: `docker ps`, then \
                `docker compose up -d` to resurrect it. ☕"
            );
        }

        std::process::exit(1);
    }
}
