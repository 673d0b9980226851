mod config;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tubegrab_core::{TubeGrabError, TubeGrabResult};

pub use config::{
    DEFAULT_HOST, DEFAULT_PORT, DEFAULT_PROVIDER_URL, ProviderConfig, ServerConfig, SessionConfig,
    TubeGrabConfig,
};

pub const API_KEY_ENV: &str = "RAPIDAPI_KEY";
pub const PROVIDER_URL_ENV: &str = "TUBEGRAB_PROVIDER_URL";
pub const HOST_ENV: &str = "TUBEGRAB_HOST";
pub const PORT_ENV: &str = "TUBEGRAB_PORT";

pub fn config_path() -> TubeGrabResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| TubeGrabError::Config("home directory not found".to_string()))?;
    Ok(home.join(".tubegrab").join("config.toml"))
}

pub fn load_config() -> TubeGrabResult<TubeGrabConfig> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> TubeGrabResult<TubeGrabConfig> {
    if !path.exists() {
        return Ok(TubeGrabConfig::default());
    }
    let content = fs::read_to_string(path)
        .map_err(|err| TubeGrabError::Config(format!("failed to read config: {err}")))?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> TubeGrabResult<TubeGrabConfig> {
    toml::from_str(content)
        .map_err(|err| TubeGrabError::Config(format!("failed to parse config: {err}")))
}

fn env_lookup(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn resolve_provider_url(config: &TubeGrabConfig) -> String {
    resolve_provider_url_with(config, env_lookup)
}

pub fn resolve_provider_url_with(
    config: &TubeGrabConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> String {
    non_blank(lookup(PROVIDER_URL_ENV))
        .or_else(|| non_blank(config.provider.base_url.clone()))
        .unwrap_or_else(|| DEFAULT_PROVIDER_URL.to_string())
}

pub fn resolve_provider_timeout(config: &TubeGrabConfig) -> Duration {
    Duration::from_secs(config.provider.timeout_secs.unwrap_or(30))
}

pub fn resolve_listen_addr(config: &TubeGrabConfig) -> TubeGrabResult<(String, u16)> {
    resolve_listen_addr_with(config, env_lookup)
}

pub fn resolve_listen_addr_with(
    config: &TubeGrabConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> TubeGrabResult<(String, u16)> {
    let host = non_blank(lookup(HOST_ENV))
        .or_else(|| non_blank(config.server.host.clone()))
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = match non_blank(lookup(PORT_ENV)) {
        Some(value) => value
            .parse::<u16>()
            .map_err(|err| TubeGrabError::Config(format!("invalid {PORT_ENV}: {err}")))?,
        None => config.server.port.unwrap_or(DEFAULT_PORT),
    };
    Ok((host, port))
}

pub fn resolve_progress_timing(config: &TubeGrabConfig) -> (Duration, Duration) {
    let total = config.session.progress_duration_ms.unwrap_or(8_000);
    let tick = config.session.tick_ms.unwrap_or(100).max(1);
    (Duration::from_millis(total), Duration::from_millis(tick))
}

#[derive(Debug, Clone)]
pub enum KeySource {
    Env {
        var: String,
        fallback: Option<String>,
    },
    Fixed(Option<String>),
}

impl KeySource {
    pub fn from_config(config: &TubeGrabConfig) -> Self {
        Self::Env {
            var: API_KEY_ENV.to_string(),
            fallback: config.provider.api_key.clone(),
        }
    }

    pub fn read(&self) -> Option<String> {
        self.read_with(env_lookup)
    }

    pub fn read_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        match self {
            Self::Env { var, fallback } => {
                non_blank(lookup(var)).or_else(|| non_blank(fallback.clone()))
            }
            Self::Fixed(value) => non_blank(value.clone()),
        }
    }
}
