//! Cached speech endpoint credential.
//!
//! The translator app endpoint hands out a region and a short-lived JWT bearer
//! token. [`EndpointCache`] keeps the current one and swaps it out whole when it
//! is missing or close to expiry. Refreshes are not serialised: two requests
//! that both see a stale credential may both fetch, and the later write wins.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use chrono::Utc;
use parking_lot::RwLock;
use serde::Deserialize;

use super::signature::{generate_signature, random_id};
use crate::config::UpstreamConfig;
use crate::error::AppError;

const INITIAL_CLIENT_ID: &str = "76a75279-2ffa-4c3d-8db8-7b47252aa41c";
const FALLBACK_LIFETIME_SECS: i64 = 3600;

/// Standard alphabet, padding optional, for JWT payload segments.
const JWT_PAYLOAD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    pub region: String,
    pub token: String,
    /// Unix seconds.
    pub expires_at: i64,
}

#[derive(Debug, Deserialize)]
struct EndpointResponse {
    r: String,
    t: String,
}

pub struct EndpointCache {
    client: reqwest::Client,
    token_endpoint_url: String,
    refresh_margin_secs: i64,
    credential: RwLock<Option<Credential>>,
    client_id: RwLock<String>,
}

impl EndpointCache {
    pub fn new(client: reqwest::Client, config: &UpstreamConfig) -> Self {
        Self {
            client,
            token_endpoint_url: config.token_endpoint_url.clone(),
            refresh_margin_secs: config.refresh_margin_secs,
            credential: RwLock::new(None),
            client_id: RwLock::new(INITIAL_CLIENT_ID.to_string()),
        }
    }

    /// Snapshot of the held credential.
    pub fn credential(&self) -> Option<Credential> {
        self.credential.read().clone()
    }

    /// Trace id sent as `X-ClientTraceId`.
    pub fn client_id(&self) -> String {
        self.client_id.read().clone()
    }

    pub fn needs_refresh(&self, now: i64) -> bool {
        match self.credential.read().as_ref() {
            Some(credential) => now > credential.expires_at - self.refresh_margin_secs,
            None => true,
        }
    }

    /// Make sure a usable credential is held, fetching a new one if needed.
    pub async fn ensure_valid(&self) -> Result<(), AppError> {
        let now = Utc::now().timestamp();
        if !self.needs_refresh(now) {
            if let Some(credential) = self.credential() {
                tracing::debug!(
                    "Endpoint still valid, {:.2} minutes remaining",
                    minutes_left(credential.expires_at, now)
                );
            }
            return Ok(());
        }

        self.refresh().await
    }

    async fn refresh(&self) -> Result<(), AppError> {
        let response = self
            .client
            .post(&self.token_endpoint_url)
            .header("Accept-Language", "zh-Hans")
            .header("X-ClientVersion", "4.0.530a 5fe1dc6c")
            .header("X-UserId", "0f04d16a175c411e")
            .header("X-HomeGeographicRegion", "zh-Hans-CN")
            .header("X-ClientTraceId", self.client_id())
            .header("X-MT-Signature", generate_signature(&self.token_endpoint_url)?)
            .header("User-Agent", "okhttp/4.5.0")
            .header("Content-Type", "application/json; charset=utf-8")
            .header("Accept-Encoding", "gzip")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Endpoint request failed: {}", e);
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Endpoint request returned {}", status);
            return Err(AppError::Upstream {
                context: "Endpoint request",
                status: status.as_u16(),
            });
        }

        let endpoint: EndpointResponse = response.json().await?;
        let now = Utc::now().timestamp();
        let expires_at = token_expiry(&endpoint.t, now)?;

        *self.credential.write() = Some(Credential {
            region: endpoint.r,
            token: endpoint.t,
            expires_at,
        });
        *self.client_id.write() = random_id();

        tracing::info!(
            "Fetched endpoint, {:.2} minutes until expiry",
            minutes_left(expires_at, now)
        );
        Ok(())
    }
}

/// Expiry of a JWT bearer token, from its `exp` claim.
///
/// Tokens that are not dot-separated get `now + 3600`. A payload without a
/// numeric `exp` expires at `now`, so it is used once and then refetched. A
/// payload that does not decode is an error.
pub fn token_expiry(token: &str, now: i64) -> Result<i64, AppError> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next()) {
        (Some(_), Some(payload)) => payload,
        _ => return Ok(now + FALLBACK_LIFETIME_SECS),
    };

    let standard = payload.replace('-', "+").replace('_', "/");
    let bytes = JWT_PAYLOAD
        .decode(standard)
        .map_err(|e| AppError::Parse(format!("JWT payload is not base64: {}", e)))?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|e| AppError::Parse(format!("JWT payload is not JSON: {}", e)))?;

    match claims.get("exp").and_then(|exp| exp.as_f64()) {
        Some(exp) => Ok(exp as i64),
        None => {
            tracing::warn!("JWT payload has no numeric exp claim, refreshing on next use");
            Ok(now)
        }
    }
}

fn minutes_left(expires_at: i64, now: i64) -> f64 {
    (expires_at - now) as f64 / 60.0
}
