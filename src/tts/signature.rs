//! `X-MT-Signature` generation for the translator token endpoint.
//!
//! The signature is `<tag>::<base64 hmac>::<date>::<correlation id>` where the
//! HMAC-SHA256 covers the lower-cased concatenation of tag, percent-encoded
//! host+path, date and correlation id.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

pub const APP_TAG: &str = "MSTranslatorAndroidApp";

const SIGNING_KEY: &str =
    "oik6PdDdMnOXemTbwvMn9de/h9lFnfBaCWbGMMZqqoSaQaqUOqjVGm5NqsmjcBI1x+sS9ugjB55HEJWRiFXYFw==";

/// Characters left untouched by a URI component encoder.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Random 32-character hex identifier.
pub fn random_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Sign `url` with the current time and a fresh correlation id.
pub fn generate_signature(url: &str) -> Result<String, AppError> {
    sign_with(url, Utc::now(), &random_id())
}

fn sign_with(url: &str, now: DateTime<Utc>, correlation_id: &str) -> Result<String, AppError> {
    let (_, host_and_path) = url
        .split_once("://")
        .ok_or_else(|| AppError::Signing(format!("URL has no scheme: {}", url)))?;
    let encoded_url = utf8_percent_encode(host_and_path, URI_COMPONENT).to_string();
    let date = signature_date(now);

    let bytes_to_sign =
        format!("{}{}{}{}", APP_TAG, encoded_url, date, correlation_id).to_lowercase();
    let signature = BASE64.encode(hmac_sha256(bytes_to_sign.as_bytes())?);

    Ok(format!(
        "{}::{}::{}::{}",
        APP_TAG, signature, date, correlation_id
    ))
}

/// RFC 1123 date with the zone last, lower-cased: `sat, 18 oct 2026 09:05:01 gmt`.
fn signature_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
        .to_lowercase()
}

fn hmac_sha256(input: &[u8]) -> Result<Vec<u8>, AppError> {
    let key = BASE64
        .decode(SIGNING_KEY)
        .map_err(|e| AppError::Signing(format!("Invalid signing key: {}", e)))?;
    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|e| AppError::Signing(format!("Failed to create HMAC: {}", e)))?;
    mac.update(input);
    Ok(mac.finalize().into_bytes().to_vec())
}
