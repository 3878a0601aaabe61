pub mod endpoint;
pub mod signature;
pub mod ssml;

use crate::config::UpstreamConfig;
use crate::error::AppError;

pub use endpoint::EndpointCache;
pub use ssml::{SynthesisRequest, DEFAULT_FORMAT, DEFAULT_VOICE};

const USER_AGENT: &str = "okhttp/4.5.0";
const ORIGIN: &str = "https://azure.microsoft.com";

pub struct TtsService {
    client: reqwest::Client,
    upstream: UpstreamConfig,
    endpoint: EndpointCache,
}

impl TtsService {
    pub fn new(upstream: UpstreamConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder().build()?;
        let endpoint = EndpointCache::new(client.clone(), &upstream);

        Ok(Self {
            client,
            upstream,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &EndpointCache {
        &self.endpoint
    }

    /// Synthesize `request` and return the encoded audio.
    pub async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, AppError> {
        // 1. Make sure we hold a token
        self.endpoint.ensure_valid().await?;
        let credential = self
            .endpoint
            .credential()
            .ok_or_else(|| AppError::Parse("No endpoint credential available".into()))?;

        // 2. Render SSML
        let ssml = request.to_ssml();

        // 3. Call the regional synthesis endpoint
        let response = self
            .client
            .post(self.upstream.synthesis_url(&credential.region))
            .header("Authorization", &credential.token)
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", &request.format)
            .header("User-Agent", USER_AGENT)
            .header("Origin", ORIGIN)
            .header("Referer", format!("{}/", ORIGIN))
            .body(ssml)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream {
                context: "TTS request",
                status: status.as_u16(),
            });
        }

        // 4. Buffer the whole body
        let audio = response.bytes().await?;
        tracing::debug!(
            "Synthesized {} bytes with voice {}",
            audio.len(),
            request.voice
        );

        Ok(audio.to_vec())
    }

    /// Full voice list as published by the speech service.
    pub async fn list_upstream_voices(&self) -> Result<serde_json::Value, AppError> {
        let response = self
            .client
            .get(&self.upstream.voice_list_url)
            .header("User-Agent", "Mozilla/5.0 (Windows NT 10.0; Win64; x64)")
            .header("X-Ms-Useragent", "SpeechStudio/2021.05.001")
            .header("Content-Type", "application/json")
            .header("Origin", ORIGIN)
            .header("Referer", ORIGIN)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream {
                context: "Voice list request",
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}
