use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::AppError;

pub const DEFAULT_TOKEN_ENDPOINT_URL: &str =
    "https://dev.microsofttranslator.com/apps/endpoint?api-version=1.0";
pub const DEFAULT_SYNTHESIS_URL_TEMPLATE: &str =
    "https://{region}.tts.speech.microsoft.com/cognitiveservices/v1";
pub const DEFAULT_VOICE_LIST_URL: &str =
    "https://eastus.api.speech.microsoft.com/cognitiveservices/voices/list";
pub const DEFAULT_PASSWORD: &str = "your_password_here";

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub password: String,
    pub upstream: UpstreamConfig,
}

/// Where the relay talks to. Overridable so tests can point at a mock server.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub token_endpoint_url: String,
    /// `{region}` is replaced by the credential's region.
    pub synthesis_url_template: String,
    pub voice_list_url: String,
    /// Refresh when the credential expires within this many seconds.
    pub refresh_margin_secs: i64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            token_endpoint_url: DEFAULT_TOKEN_ENDPOINT_URL.to_string(),
            synthesis_url_template: DEFAULT_SYNTHESIS_URL_TEMPLATE.to_string(),
            voice_list_url: DEFAULT_VOICE_LIST_URL.to_string(),
            refresh_margin_secs: 60,
        }
    }
}

impl UpstreamConfig {
    pub fn synthesis_url(&self, region: &str) -> String {
        self.synthesis_url_template.replace("{region}", region)
    }
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key: &str| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = var("PORT", "3000")
            .parse::<u16>()
            .map_err(|e| AppError::Config(format!("PORT must be a number: {}", e)))?;
        let refresh_margin_secs = var("REFRESH_MARGIN_SECS", "60")
            .parse::<i64>()
            .map_err(|e| AppError::Config(format!("REFRESH_MARGIN_SECS must be a number: {}", e)))?;

        Ok(Self {
            host: var("HOST", "0.0.0.0"),
            port,
            static_dir: var("STATIC_DIR", "./static").into(),
            password: var("RELAY_PASSWORD", DEFAULT_PASSWORD),
            upstream: UpstreamConfig {
                token_endpoint_url: var("TOKEN_ENDPOINT_URL", DEFAULT_TOKEN_ENDPOINT_URL),
                synthesis_url_template: var(
                    "SYNTHESIS_URL_TEMPLATE",
                    DEFAULT_SYNTHESIS_URL_TEMPLATE,
                ),
                voice_list_url: var("VOICE_LIST_URL", DEFAULT_VOICE_LIST_URL),
                refresh_margin_secs,
            },
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid address: {}", e)))
    }
}
