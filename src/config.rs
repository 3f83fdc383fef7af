//! Runtime configuration.
//!
//! Defaults are compiled in; a JSON file may override any subset of fields and
//! `WBI_AFRICA_*` environment variables override the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Individuals using the Internet (% of population).
pub const DEFAULT_INDICATOR: &str = "IT.NET.USER.ZS";
pub const DEFAULT_BASE_URL: &str = "https://api.worldbank.org/v2";
pub const DEFAULT_HORIZON_YEARS: u32 = 10;
/// Longest accepted projection window.
pub const MAX_HORIZON_YEARS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_indicator")]
    pub indicator: String,
    #[serde(default = "default_horizon_years")]
    pub horizon_years: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Parallel fetches when building the fleet snapshot; 1 is sequential.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_indicator() -> String {
    DEFAULT_INDICATOR.to_string()
}
fn default_horizon_years() -> u32 {
    DEFAULT_HORIZON_YEARS
}
fn default_per_page() -> u32 {
    1000
}
fn default_max_pages() -> u32 {
    50
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_connect_timeout_secs() -> u64 {
    10
}
fn default_workers() -> usize {
    8
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            indicator: default_indicator(),
            horizon_years: default_horizon_years(),
            per_page: default_per_page(),
            max_pages: default_max_pages(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            workers: default_workers(),
        }
    }
}

impl Config {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parse config {}", path.display()))
    }

    /// Defaults or the given file, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        cfg.apply_env(|k| std::env::var(k).ok())?;
        Ok(cfg)
    }

    /// Apply `WBI_AFRICA_*` overrides from a variable lookup.
    pub fn apply_env<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = var("WBI_AFRICA_BASE_URL").filter(|v| !v.trim().is_empty()) {
            self.base_url = v.trim().trim_end_matches('/').to_string();
        }
        if let Some(v) = var("WBI_AFRICA_INDICATOR").filter(|v| !v.trim().is_empty()) {
            self.indicator = v.trim().to_string();
        }
        if let Some(v) = var("WBI_AFRICA_WORKERS") {
            self.workers = v
                .trim()
                .parse()
                .with_context(|| format!("invalid WBI_AFRICA_WORKERS: {v:?}"))?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_HORIZON_YEARS).contains(&self.horizon_years) {
            anyhow::bail!(
                "horizon_years must be between 1 and {MAX_HORIZON_YEARS}, got {}",
                self.horizon_years
            );
        }
        if self.workers == 0 {
            anyhow::bail!("workers must be at least 1");
        }
        if self.per_page == 0 || self.max_pages == 0 {
            anyhow::bail!("per_page and max_pages must be positive");
        }
        Ok(())
    }
}
