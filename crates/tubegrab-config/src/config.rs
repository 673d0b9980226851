use serde::{Deserialize, Serialize};

pub const DEFAULT_PROVIDER_URL: &str = "https://youtube-mp310.p.rapidapi.com";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8787;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            timeout_secs: Some(30),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub progress_duration_ms: Option<u64>,
    pub tick_ms: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            progress_duration_ms: Some(8_000),
            tick_ms: Some(100),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TubeGrabConfig {
    pub provider: ProviderConfig,
    pub server: ServerConfig,
    pub session: SessionConfig,
}
