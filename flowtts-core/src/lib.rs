//! FlowTTS: Rust SDK for the Tencent Cloud TRTC AI text-to-speech API.
//!
//! Supports one-shot synthesis ([`FlowTts::synthesize`]) and incrementally
//! streamed synthesis ([`FlowTts::synthesize_stream`]), with
//! TC3-HMAC-SHA256 request signing and an embedded voice catalog.
//!
//! ```no_run
//! use flowtts_core::{Config, FlowTts, SynthesizeOptions};
//!
//! # async fn run() -> Result<(), flowtts_core::TtsError> {
//! let client = FlowTts::new(Config::new("secret-id", "secret-key", 1400000000))?;
//! let response = client.synthesize(SynthesizeOptions::new("你好，世界")).await?;
//! // response.audio holds the decoded audio bytes
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod language;
pub mod signature;
pub mod stream;
pub mod types;
pub mod voice;

mod sse;
mod transport;

pub use client::FlowTts;
pub use config::Config;
pub use error::TtsError;
pub use stream::{AudioChunk, StreamChunk, StreamEnd, TtsStream};
pub use types::{AudioFormat, SynthesizeOptions, SynthesizeResponse};
pub use voice::resolver::VoiceResolver;
pub use voice::{Voice, VoiceLibrary};
