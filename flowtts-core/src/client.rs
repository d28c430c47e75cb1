//! FlowTTS client: the synchronous and streaming synthesis flows.

use std::time::Duration;

use anyhow::anyhow;
use base64::Engine;
use reqwest::Client;
use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::config::Config;
use crate::error::TtsError;
use crate::language::{detect_language, DEFAULT_LANGUAGE};
use crate::signature;
use crate::stream::{pump_stream, TtsStream, STREAM_CHANNEL_CAPACITY};
use crate::transport;
use crate::types::{
    AudioFormat, AudioFormatParams, SynthesizeOptions, SynthesizeRequest, SynthesizeResponse,
    VoiceParams, SAMPLE_RATE,
};
use crate::voice::resolver::default_resolver;
use crate::voice::{Voice, VoiceLibrary};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Client for the FlowTTS speech-synthesis service.
pub struct FlowTts {
    config: Config,
    client: Client,
}

impl FlowTts {
    /// Creates a client, validating the configuration.
    pub fn new(mut config: Config) -> Result<Self, TtsError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Ok(Self { config, client })
    }

    /// Converts text to speech, returning the complete audio buffer.
    pub async fn synthesize(
        &self,
        options: SynthesizeOptions,
    ) -> Result<SynthesizeResponse, TtsError> {
        options.validate()?;

        let auto_detected = options.language.is_none();
        let language = options
            .language
            .clone()
            .unwrap_or_else(|| detect_language(&options.text, DEFAULT_LANGUAGE));

        let (voice_id, model) = resolve_voice(options.voice.as_deref())?;

        let request = SynthesizeRequest {
            sdk_app_id: self.config.sdk_app_id,
            text: options.text.clone(),
            model: model.to_string(),
            voice: VoiceParams {
                voice_id: voice_id.clone(),
                speed: options.speed,
                volume: options.volume,
                pitch: options.pitch,
            },
            audio_format: AudioFormatParams {
                format: options.format.as_str().to_string(),
                sample_rate: SAMPLE_RATE,
            },
        };

        let payload = serde_json::to_vec(&request)
            .map_err(|e| TtsError::Decode(anyhow!("failed to serialize request: {e}")))?;

        let headers = signature::generate_headers(
            &self.config.secret_id,
            &self.config.secret_key,
            &payload,
            false,
        );

        debug!(voice_id = %voice_id, model, "sending synthesis request");

        let envelope = transport::post_synthesize(&self.client, &headers, payload).await?;
        let body = envelope.response;

        if body.audio.is_empty() {
            return Err(TtsError::Service {
                code: "NoAudioData".to_string(),
                message: "no audio data in response".to_string(),
                request_id: (!body.request_id.is_empty()).then(|| body.request_id.clone()),
            });
        }

        let audio = base64::engine::general_purpose::STANDARD
            .decode(&body.audio)
            .map_err(|e| TtsError::Decode(anyhow!("failed to decode audio: {e}")))?;

        debug!(bytes = audio.len(), request_id = %body.request_id, "synthesis complete");

        Ok(SynthesizeResponse {
            audio,
            format: options.format,
            detected_language: auto_detected.then_some(language),
            auto_detected,
            request_id: body.request_id,
        })
    }

    /// Converts text to speech as an incrementally delivered chunk stream.
    ///
    /// The requested format is ignored: streaming always produces raw PCM at
    /// 24000 Hz. Chunks are delivered through a bounded queue; a consumer
    /// that stops draining stalls the transport read (backpressure).
    pub async fn synthesize_stream(
        &self,
        options: SynthesizeOptions,
    ) -> Result<TtsStream, TtsError> {
        options.validate()?;

        let (voice_id, model) = resolve_voice(options.voice.as_deref())?;

        let request = SynthesizeRequest {
            sdk_app_id: self.config.sdk_app_id,
            text: options.text.clone(),
            model: model.to_string(),
            voice: VoiceParams {
                voice_id: voice_id.clone(),
                speed: options.speed,
                volume: options.volume,
                pitch: options.pitch,
            },
            // Streaming is always raw PCM regardless of the requested format.
            audio_format: AudioFormatParams {
                format: AudioFormat::Pcm.as_str().to_string(),
                sample_rate: SAMPLE_RATE,
            },
        };

        let payload = serde_json::to_vec(&request)
            .map_err(|e| TtsError::Decode(anyhow!("failed to serialize request: {e}")))?;

        let headers = signature::generate_headers(
            &self.config.secret_id,
            &self.config.secret_key,
            &payload,
            true,
        );

        debug!(voice_id = %voice_id, model, "opening synthesis stream");

        let response = transport::open_stream(&self.client, &headers, payload).await?;

        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
        let (cancel_tx, cancel_rx) = watch::channel(false);

        tokio::spawn(async move {
            pump_stream(response.bytes_stream(), tx, cancel_rx).await;
        });

        Ok(TtsStream::new(rx, cancel_tx))
    }

    /// All catalog voices; extended voices are appended when requested.
    pub fn list_voices(&self, include_extended: bool) -> Result<VoiceLibrary, TtsError> {
        default_resolver().voices(include_extended)
    }

    /// Case-insensitive search over voice names, descriptions and languages.
    pub fn search_voices(&self, query: &str) -> Result<Vec<Voice>, TtsError> {
        default_resolver().search(query)
    }

    /// Voice metadata by id; `Ok(None)` for an unknown id.
    pub fn voice(&self, voice_id: &str) -> Result<Option<Voice>, TtsError> {
        default_resolver().voice(voice_id)
    }
}

fn resolve_voice(voice: Option<&str>) -> Result<(String, &'static str), TtsError> {
    let resolver = default_resolver();
    let voice_id = match voice {
        Some(id) => id.to_string(),
        None => resolver.fallback_voice()?.id,
    };
    let model = resolver.model_for_voice(&voice_id)?;
    Ok((voice_id, model))
}
