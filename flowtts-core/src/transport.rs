//! HTTP boundary: one POST endpoint serving both the JSON and the SSE
//! response shapes.

use std::collections::HashMap;

use anyhow::anyhow;
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use crate::error::TtsError;
use crate::signature::TTS_ENDPOINT;
use crate::types::ApiResponse;

/// Sends a synchronous synthesis request and decodes the JSON envelope.
/// A service-reported error in the envelope becomes [`TtsError::Service`].
pub(crate) async fn post_synthesize(
    client: &Client,
    headers: &HashMap<&'static str, String>,
    payload: Vec<u8>,
) -> Result<ApiResponse, TtsError> {
    let response = send(client, headers, payload).await?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| TtsError::Transport(anyhow!("failed to read response: {e}")))?;

    let envelope: ApiResponse = serde_json::from_str(&body).map_err(|e| {
        debug!(%status, body = %body, "unparseable synthesis response");
        TtsError::Decode(anyhow!("failed to parse response ({status}): {e}"))
    })?;

    if let Some(error) = &envelope.response.error {
        let request_id = envelope.response.request_id.clone();
        return Err(TtsError::Service {
            code: error.code.clone(),
            message: error.message.clone(),
            request_id: (!request_id.is_empty()).then_some(request_id),
        });
    }

    Ok(envelope)
}

/// Opens a streaming synthesis request. Any non-200 status aborts with the
/// response body as diagnostic text.
pub(crate) async fn open_stream(
    client: &Client,
    headers: &HashMap<&'static str, String>,
    payload: Vec<u8>,
) -> Result<Response, TtsError> {
    let response = send(client, headers, payload).await?;

    let status = response.status();
    if status != StatusCode::OK {
        let body = response.text().await.unwrap_or_default();
        debug!(%status, body = %body, "stream request rejected");
        return Err(TtsError::Decode(anyhow!(
            "request failed with status {status}: {body}"
        )));
    }

    Ok(response)
}

async fn send(
    client: &Client,
    headers: &HashMap<&'static str, String>,
    payload: Vec<u8>,
) -> Result<Response, TtsError> {
    let mut request = client.post(TTS_ENDPOINT);
    for (name, value) in headers {
        request = request.header(*name, value.as_str());
    }

    request
        .body(payload)
        .send()
        .await
        .map_err(|e| TtsError::Transport(anyhow!("request failed: {e}")))
}
