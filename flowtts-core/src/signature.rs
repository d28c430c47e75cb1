//! TC3-HMAC-SHA256 request signing for the Tencent Cloud TTS API.
//!
//! Every request is signed independently so the service can verify it
//! without shared session state. The derived signing key is scoped to
//! date + service + request type, so a leaked per-request signature cannot
//! be replayed for a different date or service.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

/// Service name used in the credential scope.
pub const TTS_SERVICE: &str = "trtc";
/// API version sent in `X-TC-Version`.
pub const TTS_VERSION: &str = "2019-07-22";
/// Host the canonical request is bound to.
pub const TTS_HOST: &str = "trtc.ai.tencentcloudapi.com";
/// Endpoint all requests are POSTed to.
pub const TTS_ENDPOINT: &str = "https://trtc.ai.tencentcloudapi.com";

/// Action for single-shot synthesis.
pub const ACTION_SYNTHESIZE: &str = "TextToSpeech";
/// Action for streaming synthesis.
pub const ACTION_SYNTHESIZE_STREAM: &str = "TextToSpeechSSE";

const ALGORITHM: &str = "TC3-HMAC-SHA256";

type HmacSha256 = Hmac<Sha256>;

/// Generates the signed headers for one TTS request.
///
/// Captures a fresh timestamp on every call; headers are never reused across
/// two payload/timestamp pairs.
pub fn generate_headers(
    secret_id: &str,
    secret_key: &str,
    payload: &[u8],
    stream: bool,
) -> HashMap<&'static str, String> {
    generate_headers_at(secret_id, secret_key, payload, stream, Utc::now())
}

/// Deterministic signing core: identical inputs and instant produce
/// identical headers.
pub(crate) fn generate_headers_at(
    secret_id: &str,
    secret_key: &str,
    payload: &[u8],
    stream: bool,
    now: DateTime<Utc>,
) -> HashMap<&'static str, String> {
    let timestamp = now.timestamp();
    let date = now.format("%Y-%m-%d").to_string();

    let action = if stream {
        ACTION_SYNTHESIZE_STREAM
    } else {
        ACTION_SYNTHESIZE
    };

    // Step 1: canonical request
    let canonical_headers = format!("content-type:application/json\nhost:{TTS_HOST}\n");
    let signed_headers = "content-type;host";
    let hashed_payload = sha256_hex(payload);
    let canonical_request =
        format!("POST\n/\n\n{canonical_headers}\n{signed_headers}\n{hashed_payload}");

    // Step 2: string to sign
    let credential_scope = format!("{date}/{TTS_SERVICE}/tc3_request");
    let hashed_canonical_request = sha256_hex(canonical_request.as_bytes());
    let string_to_sign =
        format!("{ALGORITHM}\n{timestamp}\n{credential_scope}\n{hashed_canonical_request}");

    // Step 3: signature via the nested key derivation
    let secret_date = hmac_sha256(format!("TC3{secret_key}").as_bytes(), &date);
    let secret_service = hmac_sha256(&secret_date, TTS_SERVICE);
    let secret_signing = hmac_sha256(&secret_service, "tc3_request");
    let signature = hex::encode(hmac_sha256(&secret_signing, &string_to_sign));

    // Step 4: authorization header
    let authorization = format!(
        "{ALGORITHM} Credential={secret_id}/{credential_scope}, \
         SignedHeaders={signed_headers}, Signature={signature}"
    );

    HashMap::from([
        ("Content-Type", "application/json".to_string()),
        ("Host", TTS_HOST.to_string()),
        ("X-TC-Action", action.to_string()),
        ("X-TC-Version", TTS_VERSION.to_string()),
        ("X-TC-Timestamp", timestamp.to_string()),
        // Region is not required for the TTS API.
        ("X-TC-Region", String::new()),
        ("Authorization", authorization),
    ])
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn hmac_sha256(key: &[u8], data: &str) -> Vec<u8> {
    let mut mac =
        HmacSha256::new_from_slice(key).expect("HMAC-SHA256 accepts keys of any length");
    mac.update(data.as_bytes());
    mac.finalize().into_bytes().to_vec()
}
