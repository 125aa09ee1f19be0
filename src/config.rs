//! Tool configuration: which store to talk to and how patient prompts are.
//!
//! The config is a small JSON document. A missing default config file is not
//! an error; the built-in defaults (local workbook, unbounded retries) apply.
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_SCHEMA_VERSION: u32 = 1;

const APP_DIR: &str = "redeploy-pool";
const CONFIG_FILE: &str = "config.json";
const WORKBOOK_FILE: &str = "workbook.json";

pub const DEFAULT_TOKEN_ENV: &str = "REDEPLOY_SHEETS_TOKEN";
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub schema_version: u32,
    #[serde(default)]
    pub store: StoreConfig,
    /// Rejected attempts allowed per prompt; absent means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_prompt_attempts: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreConfig {
    Local {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        workbook: Option<PathBuf>,
    },
    Sheets {
        spreadsheet_id: String,
        #[serde(default = "default_token_env")]
        token_env: String,
        #[serde(default = "default_base_url")]
        base_url: String,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Local { workbook: None }
    }
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

fn default_base_url() -> String {
    DEFAULT_SHEETS_BASE_URL.to_string()
}

pub fn default_config() -> Config {
    Config {
        schema_version: CONFIG_SCHEMA_VERSION,
        store: StoreConfig::default(),
        max_prompt_attempts: None,
    }
}

/// `$XDG_CONFIG_HOME/redeploy-pool/config.json` (or the platform equivalent).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Local workbook location when neither the config nor the CLI names one.
pub fn default_workbook_path() -> Result<PathBuf> {
    let base = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow!("unable to resolve a data directory for the workbook"))?;
    Ok(base.join(APP_DIR).join(WORKBOOK_FILE))
}

/// Load the config at `explicit`, or the default location when `None`.
///
/// An explicitly named file must exist; the default file may be absent.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.is_file() => path,
            _ => {
                tracing::debug!("no config file; using defaults");
                return Ok(default_config());
            }
        },
    };
    let bytes = fs::read(&path).with_context(|| format!("read config {}", path.display()))?;
    let config: Config = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config JSON {}", path.display()))?;
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

pub fn validate_config(config: &Config) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    if config.max_prompt_attempts == Some(0) {
        return Err(anyhow!("max_prompt_attempts must be at least 1 when set"));
    }
    match &config.store {
        StoreConfig::Local { workbook } => {
            if workbook
                .as_deref()
                .is_some_and(|path| path.as_os_str().is_empty())
            {
                return Err(anyhow!("store.workbook must be non-empty when set"));
            }
        }
        StoreConfig::Sheets {
            spreadsheet_id,
            token_env,
            base_url,
        } => {
            for (label, value) in [
                ("store.spreadsheet_id", spreadsheet_id),
                ("store.token_env", token_env),
                ("store.base_url", base_url),
            ] {
                if value.trim().is_empty() {
                    return Err(anyhow!("{label} must be non-empty"));
                }
            }
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err(anyhow!(
                    "store.base_url must be an http(s) URL (got {base_url:?})"
                ));
            }
        }
    }
    Ok(())
}

/// Workbook path for the local backend: CLI override, then config, then the
/// default data-dir location.
pub fn resolve_workbook_path(config: &Config, cli_override: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = cli_override {
        return Ok(path.to_path_buf());
    }
    match &config.store {
        StoreConfig::Local {
            workbook: Some(path),
        } => Ok(path.clone()),
        _ => default_workbook_path(),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
