//! 🔧 App Configuration: the sacred TOML-to-struct pipeline.
//!
//! 📡 "Config not found: We looked everywhere. Under the couch. Behind the fridge.
//! In the bucket. Nothing." -- every developer at 3am 🦆
//!
//! 🏗️ Powered by Figment. Env vars (`LKB_*`, nested with `__`) are the base layer, an optional
//! TOML file goes on top. Every field has a default, so an empty world still gets you the local
//! MinIO profile and a ten-row sales demo.

use anyhow::Context;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::backends::StoreConfig;

/// 🎬 Knobs for the demo script itself.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DemoConfig {
    /// 🌱 Fixed seed for reproducible sample data. Absent means fresh entropy every run.
    pub seed: Option<u64>,
    pub sales_rows: usize,
    pub employee_rows: usize,
    /// ⏳ Lifetime of the presigned URL printed at the end.
    pub presign_ttl_seconds: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed: None,
            sales_rows: 10,
            employee_rows: 100,
            presign_ttl_seconds: 3600,
        }
    }
}

/// 📦 The AppConfig: one struct to rule them all, one struct to find them,
/// one struct to bring them all, and in the Figment bind them.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// 🪣 Where the bucket lives and how to knock on its door.
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

/// 🚀 Load the config from env vars and, if given, a TOML file. TOML wins on conflicts.
///
/// 📐 No file means env only. We don't go looking for one; the CLI decides that.
///
/// 💀 Returns an error if the merged config doesn't deserialize. The context says which layer
/// was involved, so you know whether to blame the file or the shell.
pub fn load_config(config_file_name: Option<&Path>) -> anyhow::Result<AppConfig> {
    info!(
        "🔧 Loading configuration: {:#?}",
        config_file_name.unwrap_or(Path::new(""))
    );

    let config = Figment::new().merge(Env::prefixed("LKB_").split("__"));

    let config = match config_file_name {
        Some(file_name) => config.merge(Toml::file(file_name)),
        None => config,
    };

    let context_msg = match config_file_name {
        Some(path) => format!(
            "💀 Failed to parse configuration from file '{}' and environment variables (LKB_*). \
             The file exists in our hearts, but apparently not in valid TOML.",
            path.display()
        ),
        None => "💀 Failed to parse configuration from environment variables (LKB_*). \
                 No file was provided; this one's all on the environment. Classic."
            .to_string(),
    };

    config.extract().context(context_msg)
}
