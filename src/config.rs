/// Configuration module for hanzi-lookup.
///
/// Handles loading, validating, and providing default configuration values.
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Config file used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

// ── Default value functions ──────────────────────────────────────────

fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("hanzi-lookup/{}", env!("CARGO_PKG_VERSION"))
}

fn default_bkrs() -> SourceConfig {
    SourceConfig {
        base_url: "https://bkrs.info/slovo.php?ch=".to_string(),
        max_query_len: 100,
    }
}

fn default_zhonga() -> SourceConfig {
    SourceConfig {
        base_url: "https://www.zhonga.ru/search?q=".to_string(),
        // zhonga search degrades on longer queries
        max_query_len: 24,
    }
}

// ── Config structs ───────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub sources: SourcesConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SourcesConfig {
    #[serde(default = "default_bkrs")]
    pub bkrs: SourceConfig,

    #[serde(default = "default_zhonga")]
    pub zhonga: SourceConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub base_url: String,
    /// Longer queries get the oversized marker without a fetch.
    pub max_query_len: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    pub token: String,
    /// Caller identity attached to requests bearing this token.
    pub caller: String,
}

// ── Default impls ────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            user_agent: default_user_agent(),
            sources: SourcesConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            bkrs: default_bkrs(),
            zhonga: default_zhonga(),
        }
    }
}

// ── Config implementation ────────────────────────────────────────────

impl Config {
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Load the lookup service config.
    ///
    /// An empty `config_path` means [`DEFAULT_CONFIG_PATH`]. A missing
    /// file yields the built-in defaults, and a template is written only
    /// when the default path was used. A file that is not valid JSON is
    /// ignored in favor of the defaults; it is never overwritten.
    pub fn load(config_path: &str) -> Result<Self> {
        let path = match config_path {
            "" => DEFAULT_CONFIG_PATH,
            custom => custom,
        };

        if !Path::new(path).exists() {
            info!(%path, "lookup config not found, using built-in defaults");
            let cfg = Self::default();
            if path == DEFAULT_CONFIG_PATH {
                if let Err(e) = cfg.save(path) {
                    warn!(%path, "could not write lookup config template: {e:#}");
                } else {
                    info!(%path, "wrote lookup config template");
                }
            }
            return Ok(cfg);
        }

        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read lookup config {path}"))?;

        match serde_json::from_str::<Config>(&data) {
            Ok(cfg) => {
                info!(
                    %path,
                    tokens = cfg.auth.tokens.len(),
                    "loaded lookup config"
                );
                Ok(cfg)
            }
            Err(e) => {
                warn!(%path, "lookup config is not valid JSON ({e}), falling back to built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Write the config as pretty-printed JSON to `path`.
    pub fn save(&self, path: &str) -> Result<()> {
        let data =
            serde_json::to_string_pretty(self).context("failed to serialize lookup config")?;
        std::fs::write(path, data)
            .with_context(|| format!("failed to write lookup config {path}"))?;
        Ok(())
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.fetch_timeout_secs > 0,
            "fetch_timeout_secs must be positive"
        );
        for (name, source) in [("bkrs", &self.sources.bkrs), ("zhonga", &self.sources.zhonga)] {
            anyhow::ensure!(
                !source.base_url.is_empty(),
                "sources.{name}.base_url must not be empty"
            );
            anyhow::ensure!(
                source.max_query_len > 0,
                "sources.{name}.max_query_len must be positive"
            );
        }
        anyhow::ensure!(
            self.auth.tokens.iter().all(|t| !t.token.is_empty()),
            "auth.tokens entries must have a non-empty token"
        );
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────
