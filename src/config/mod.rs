/// Application configuration module
use serde_json::Value;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str = "https://api.nasa.gov";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Location of the key inside the editor MCP config
const CONFIG_KEY_POINTER: &str = "/mcpServers/nasa/env/NASA_API_KEY";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub nasa_api_url: String,
    pub nasa_api_key: Option<String>,
    pub config_path: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let nasa_api_url = env::var("NASA_API_URL")
            .ok()
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self {
            nasa_api_url,
            nasa_api_key: env::var("NASA_API_KEY").ok(),
            config_path: default_config_path(),
            timeout_secs: env_u64("NASA_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Resolve the credential, giving an explicit flag precedence
    pub fn resolve_api_key(&self, flag: Option<&str>) -> Option<ResolvedKey> {
        resolve_api_key(
            flag,
            self.nasa_api_key.as_deref(),
            self.config_path.as_deref(),
        )
    }
}

/// `~/.cursor/mcp.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".cursor").join("mcp.json"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Flag,
    Env,
    ConfigFile,
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Flag => f.write_str("--api_key"),
            KeySource::Env => f.write_str("NASA_API_KEY"),
            KeySource::ConfigFile => f.write_str("config file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    pub value: String,
    pub source: KeySource,
}

/// First non-empty credential from flag, environment, then config file
pub fn resolve_api_key(
    flag: Option<&str>,
    env_value: Option<&str>,
    config_path: Option<&Path>,
) -> Option<ResolvedKey> {
    let resolved = non_empty(flag)
        .map(|value| (KeySource::Flag, value))
        .or_else(|| non_empty(env_value).map(|value| (KeySource::Env, value)))
        .or_else(|| {
            config_path
                .and_then(read_config_key)
                .map(|value| (KeySource::ConfigFile, value))
        })
        .map(|(source, value)| ResolvedKey { value, source });

    match &resolved {
        Some(key) => debug!("API key resolved from {}", key.source),
        None => debug!("No API key found in any source"),
    }
    resolved
}

/// Read the key from a JSON config file; every failure is a warning
pub fn read_config_key(path: &Path) -> Option<String> {
    if !path.exists() {
        debug!("Config file {} not present", path.display());
        return None;
    }

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    let json: Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            warn!("Failed to parse config file {}: {}", path.display(), e);
            return None;
        }
    };

    match json.pointer(CONFIG_KEY_POINTER) {
        Some(Value::String(s)) => non_empty(Some(s.as_str())),
        Some(other) => {
            warn!(
                "Ignoring non-string NASA_API_KEY in {}: {}",
                path.display(),
                other
            );
            None
        }
        None => None,
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|&n| n > 0)
        .unwrap_or(default)
}
