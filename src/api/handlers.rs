use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};
use std::sync::Arc;

use super::{
    CheckPasswordResponse, HealthResponse, TtsBody, TtsQuery, VerifyPasswordRequest,
    VerifyPasswordResponse, VoiceEntry, VoicesQuery,
};
use crate::api::routes::AppState;
use crate::error::AppError;
use crate::store;
use crate::tts::SynthesisRequest;

const DEFAULT_CATALOG: &str = "edge-api";

pub async fn check_password() -> Json<CheckPasswordResponse> {
    Json(CheckPasswordResponse {
        require_password: false,
    })
}

pub async fn verify_password(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VerifyPasswordRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    let valid = request.password.as_deref() == Some(state.password.as_str());
    let status = if valid {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };

    Ok((status, Json(VerifyPasswordResponse { valid })).into_response())
}

pub async fn tts_query(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TtsQuery>,
) -> Result<Response, AppError> {
    speak(&state, query.into()).await
}

pub async fn tts_json(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TtsBody>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = payload?;
    speak(&state, body.into()).await
}

async fn speak(state: &AppState, request: SynthesisRequest) -> Result<Response, AppError> {
    tracing::info!(
        "TTS request: voice={} format={} chars={}",
        request.voice,
        request.format,
        request.text.chars().count()
    );

    // Download name is checked before any upstream call
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg"));
    if request.download {
        let disposition = format!("attachment; filename=\"{}.mp3\"", request.voice);
        let value = HeaderValue::from_str(&disposition).map_err(|_| {
            AppError::Header(format!("voice name {:?} cannot name a download", request.voice))
        })?;
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    let audio = state.tts.synthesize(&request).await?;

    Ok((StatusCode::OK, headers, audio).into_response())
}

pub async fn list_voices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VoicesQuery>,
) -> Result<Response, AppError> {
    let catalog: Map<String, Value> = match state.store.get(store::SPEAKERS).await? {
        Some(raw) => serde_json::from_str(&raw)?,
        None => Map::new(),
    };

    let api = query
        .api
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| DEFAULT_CATALOG.to_string());
    let voices = catalog_voices(&catalog, &api);

    if query.f.as_deref() == Some("1") {
        return Ok(Json(voices).into_response());
    }

    let listing = voices
        .iter()
        .map(|v| format!("{} / {}", v.key, v.name))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(([(header::CONTENT_TYPE, "text/plain")], listing).into_response())
}

/// Entries of `catalog[api].speakers`, in document order.
fn catalog_voices(catalog: &Map<String, Value>, api: &str) -> Vec<VoiceEntry> {
    catalog
        .get(api)
        .and_then(|entry| entry.get("speakers"))
        .and_then(Value::as_object)
        .map(|speakers| {
            speakers
                .iter()
                .map(|(key, name)| VoiceEntry {
                    key: key.clone(),
                    name: name
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| name.to_string()),
                })
                .collect()
        })
        .unwrap_or_default()
}

pub async fn upstream_voices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let voices = state.tts.list_upstream_voices().await?;
    Ok(Json(voices))
}

pub async fn static_asset(
    State(state): State<Arc<AppState>>,
    uri: Uri,
) -> Result<Response, AppError> {
    let (key, content_type) = match uri.path() {
        "/" | "/index.html" => (store::INDEX, "text/html; charset=utf-8"),
        "/style.css" => (store::STYLE, "text/css; charset=utf-8"),
        "/script.js" => (store::SCRIPT, "application/javascript; charset=utf-8"),
        "/speakers.json" => (store::SPEAKERS, "application/json; charset=utf-8"),
        _ => return Ok((StatusCode::NOT_FOUND, "Not Found").into_response()),
    };

    let body = state.store.get(key).await?.unwrap_or_default();
    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        region: state.tts.endpoint().credential().map(|c| c.region),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> Map<String, Value> {
        serde_json::from_value(json!({
            "edge-api": { "speakers": { "zh-b": "B", "zh-a": "A" } },
            "other": { "speakers": {} }
        }))
        .unwrap()
    }

    #[test]
    fn catalog_keeps_document_order() {
        let voices = catalog_voices(&catalog(), "edge-api");
        let keys: Vec<&str> = voices.iter().map(|v| v.key.as_str()).collect();
        assert_eq!(keys, vec!["zh-b", "zh-a"]);
    }

    #[test]
    fn unknown_catalog_is_empty() {
        assert!(catalog_voices(&catalog(), "missing").is_empty());
        assert!(catalog_voices(&catalog(), "other").is_empty());
    }
}
