pub mod handlers;
pub mod routes;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tts::{SynthesisRequest, DEFAULT_FORMAT, DEFAULT_VOICE};

/// `GET /api/tts?t=..&v=..&r=..&p=..&o=..&d=..`
#[derive(Debug, Default, Deserialize)]
pub struct TtsQuery {
    pub t: Option<String>,
    pub v: Option<String>,
    pub r: Option<String>,
    pub p: Option<String>,
    pub o: Option<String>,
    pub d: Option<String>,
}

/// `POST /api/tts` body. Fields are loosely typed: scalars are coerced to text
/// or numbers as needed.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TtsBody {
    pub text: Option<Value>,
    pub voice: Option<Value>,
    pub rate: Option<Value>,
    pub pitch: Option<Value>,
    pub format: Option<Value>,
    pub preview: Option<Value>,
}

impl From<TtsQuery> for SynthesisRequest {
    fn from(query: TtsQuery) -> Self {
        Self {
            text: query.t.unwrap_or_default(),
            voice: or_default(query.v, DEFAULT_VOICE),
            rate: query.r.as_deref().map(parse_number).unwrap_or(0.0),
            pitch: query.p.as_deref().map(parse_number).unwrap_or(0.0),
            format: or_default(query.o, DEFAULT_FORMAT),
            download: query.d.as_deref() == Some("true"),
        }
    }
}

impl From<TtsBody> for SynthesisRequest {
    fn from(body: TtsBody) -> Self {
        Self {
            text: value_to_text(body.text).unwrap_or_default(),
            voice: or_default(value_to_text(body.voice), DEFAULT_VOICE),
            rate: body.rate.as_ref().map(value_to_number).unwrap_or(0.0),
            pitch: body.pitch.as_ref().map(value_to_number).unwrap_or(0.0),
            format: or_default(value_to_text(body.format), DEFAULT_FORMAT),
            // Only an explicit `false` asks for a download
            download: body.preview == Some(Value::Bool(false)),
        }
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Lenient numeric parse; anything unusable is `0`.
fn parse_number(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Text form of a scalar; falsy values (`null`, `false`, `0`, `""`) give `None`.
fn value_to_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn value_to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_number(s),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct VoicesQuery {
    pub api: Option<String>,
    pub f: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceEntry {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct VerifyPasswordRequest {
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckPasswordResponse {
    pub require_password: bool,
}

#[derive(Debug, Serialize)]
pub struct VerifyPasswordResponse {
    pub valid: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Region of the cached credential, if one is held.
    pub region: Option<String>,
}
