//! 🪣🦆 lakebridge: move delimited tables between an object store and an embedded engine.
//!
//! 🧠 Knowledge graph:
//! - `backends`: the S3 object store client and the DuckDB session
//! - `delimited`: shape check + RFC-4180 quoting, shared by everyone who touches a comma
//! - `generators`: fake sales, employees, products, time series
//! - `supervisors`: the demo script that wires it all together
//! - `app_config` / `error` / `common`: the ambient plumbing

pub mod app_config;
pub mod backends;
pub mod common;
pub mod delimited;
pub mod error;
pub mod generators;
pub mod supervisors;

use anyhow::{Context, Result};

use crate::app_config::AppConfig;
use crate::supervisors::Supervisor;

pub use crate::error::{ErrorKind, LakeError, LakeResult};

/// 🚀 Run the demo with `app_config`, printing to stdout.
pub async fn run(app_config: AppConfig) -> Result<()> {
    let mut stdout = std::io::stdout();
    Supervisor::new(app_config)
        .run(&mut stdout)
        .await
        .context("Failed to run the lakebridge demo")
}
