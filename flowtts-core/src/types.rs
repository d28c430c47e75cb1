//! Caller-facing options and responses, plus the wire payload types.

use serde::{Deserialize, Serialize};

use crate::error::TtsError;

/// Sample rate of all synthesis output, in Hz.
pub const SAMPLE_RATE: u32 = 24000;

/// Output encoding for synchronous synthesis. Streaming always produces raw
/// PCM regardless of the requested format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Wav,
    Pcm,
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Pcm => "pcm",
        }
    }
}

/// Options for a synthesis call.
#[derive(Debug, Clone)]
pub struct SynthesizeOptions {
    /// Text to synthesize. Required.
    pub text: String,
    /// Voice id; the catalog fallback voice is used when unset.
    pub voice: Option<String>,
    /// Audio format for synchronous synthesis. Streaming ignores this.
    pub format: AudioFormat,
    /// Language tag; auto-detected from the text when unset.
    pub language: Option<String>,
    /// Speech speed, 0.5 to 2.0.
    pub speed: f64,
    /// Speech volume, 0.5 to 2.0.
    pub volume: f64,
    /// Pitch shift in semitones, -12 to 12.
    pub pitch: i32,
}

impl SynthesizeOptions {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: None,
            format: AudioFormat::default(),
            language: None,
            speed: 1.0,
            volume: 1.0,
            pitch: 0,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), TtsError> {
        if self.text.trim().is_empty() {
            return Err(TtsError::InvalidOptions("text cannot be empty".to_string()));
        }
        if !(0.5..=2.0).contains(&self.speed) {
            return Err(TtsError::InvalidOptions(
                "speed must be between 0.5 and 2.0".to_string(),
            ));
        }
        if !(0.5..=2.0).contains(&self.volume) {
            return Err(TtsError::InvalidOptions(
                "volume must be between 0.5 and 2.0".to_string(),
            ));
        }
        if !(-12..=12).contains(&self.pitch) {
            return Err(TtsError::InvalidOptions(
                "pitch must be between -12 and 12 semitones".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result of a synchronous synthesis call.
#[derive(Debug, Clone)]
pub struct SynthesizeResponse {
    /// Decoded audio bytes.
    pub audio: Vec<u8>,
    pub format: AudioFormat,
    /// Language detected from the text, when none was supplied.
    pub detected_language: Option<String>,
    pub auto_detected: bool,
    /// Service-assigned request identifier.
    pub request_id: String,
}

// Wire types for the Tencent Cloud API. Field names are PascalCase on the
// wire.

#[derive(Debug, Serialize)]
pub(crate) struct VoiceParams {
    #[serde(rename = "VoiceId")]
    pub voice_id: String,
    #[serde(rename = "Speed")]
    pub speed: f64,
    #[serde(rename = "Volume")]
    pub volume: f64,
    #[serde(rename = "Pitch")]
    pub pitch: i32,
}

#[derive(Debug, Serialize)]
pub(crate) struct AudioFormatParams {
    #[serde(rename = "Format")]
    pub format: String,
    #[serde(rename = "SampleRate")]
    pub sample_rate: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct SynthesizeRequest {
    #[serde(rename = "SdkAppId")]
    pub sdk_app_id: i64,
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Voice")]
    pub voice: VoiceParams,
    #[serde(rename = "AudioFormat")]
    pub audio_format: AudioFormatParams,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    #[serde(rename = "Response")]
    pub response: ApiResponseBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponseBody {
    #[serde(rename = "Audio", default)]
    pub audio: String,
    #[serde(rename = "RequestId", default)]
    pub request_id: String,
    #[serde(rename = "Error")]
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Message")]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let options = SynthesizeOptions::new("hello");
        assert_eq!(options.speed, 1.0);
        assert_eq!(options.volume, 1.0);
        assert_eq!(options.pitch, 0);
        assert_eq!(options.format, AudioFormat::Wav);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_empty_text_rejected() {
        let options = SynthesizeOptions::new("   ");
        let err = options.validate().unwrap_err();
        assert_eq!(err.code(), "InvalidOptions");
    }

    #[rstest]
    #[case(0.4)]
    #[case(2.1)]
    fn test_speed_out_of_range(#[case] speed: f64) {
        let mut options = SynthesizeOptions::new("hello");
        options.speed = speed;
        assert!(options.validate().is_err());
    }

    #[rstest]
    #[case(0.5)]
    #[case(2.0)]
    fn test_speed_bounds_are_inclusive(#[case] speed: f64) {
        let mut options = SynthesizeOptions::new("hello");
        options.speed = speed;
        assert!(options.validate().is_ok());
    }

    #[rstest]
    #[case(0.4)]
    #[case(2.1)]
    fn test_volume_out_of_range(#[case] volume: f64) {
        let mut options = SynthesizeOptions::new("hello");
        options.volume = volume;
        assert!(options.validate().is_err());
    }

    #[rstest]
    #[case(-13)]
    #[case(13)]
    fn test_pitch_out_of_range(#[case] pitch: i32) {
        let mut options = SynthesizeOptions::new("hello");
        options.pitch = pitch;
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_request_serializes_pascal_case() {
        let request = SynthesizeRequest {
            sdk_app_id: 1400000000,
            text: "你好".to_string(),
            model: "flow_01_turbo".to_string(),
            voice: VoiceParams {
                voice_id: "v-female-R2s4N9qJ".to_string(),
                speed: 1.0,
                volume: 1.0,
                pitch: 0,
            },
            audio_format: AudioFormatParams {
                format: "wav".to_string(),
                sample_rate: SAMPLE_RATE,
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["SdkAppId"], 1400000000i64);
        assert_eq!(value["Text"], "你好");
        assert_eq!(value["Model"], "flow_01_turbo");
        assert_eq!(value["Voice"]["VoiceId"], "v-female-R2s4N9qJ");
        assert_eq!(value["AudioFormat"]["Format"], "wav");
        assert_eq!(value["AudioFormat"]["SampleRate"], 24000);
    }

    #[test]
    fn test_response_envelope_with_error() {
        let body = r#"{"Response":{"RequestId":"r-1","Error":{"Code":"AuthFailure","Message":"bad signature"}}}"#;
        let envelope: ApiResponse = serde_json::from_str(body).unwrap();
        let error = envelope.response.error.unwrap();
        assert_eq!(error.code, "AuthFailure");
        assert_eq!(envelope.response.request_id, "r-1");
        assert!(envelope.response.audio.is_empty());
    }
}
