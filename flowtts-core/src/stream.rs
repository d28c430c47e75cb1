//! Streaming synthesis delivery: chunk types, the caller handle, and the
//! background pump that turns the SSE byte stream into chunks.

use base64::Engine;
use futures_util::{pin_mut, Stream, StreamExt};
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::error::TtsError;
use crate::sse::SseParser;

/// Pending-chunk capacity of the delivery queue. A consumer that stops
/// draining exerts backpressure on the transport read once this many chunks
/// are waiting.
pub(crate) const STREAM_CHANNEL_CAPACITY: usize = 10;

/// One unit of streaming synthesis output.
#[derive(Debug)]
pub enum StreamChunk {
    /// A decoded audio fragment.
    Audio(AudioChunk),
    /// Terminal marker: the stream completed normally.
    End(StreamEnd),
    /// Terminal transport failure. The channel closes after this.
    Error(TtsError),
}

/// Raw PCM audio fragment with its position in the stream.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub data: Vec<u8>,
    /// Strictly increasing within one stream, starting at 0.
    pub sequence: usize,
}

/// Terminal record of a completed stream.
#[derive(Debug, Clone)]
pub struct StreamEnd {
    /// Number of audio chunks delivered before this marker.
    pub total_chunks: usize,
    /// Service-assigned request identifier.
    pub request_id: String,
}

/// Caller handle for one streaming synthesis call.
///
/// Dropping the handle cancels the background reader, so an abandoned
/// stream never leaks its transport task.
#[derive(Debug)]
pub struct TtsStream {
    rx: mpsc::Receiver<StreamChunk>,
    cancel: watch::Sender<bool>,
}

impl TtsStream {
    pub(crate) fn new(rx: mpsc::Receiver<StreamChunk>, cancel: watch::Sender<bool>) -> Self {
        Self { rx, cancel }
    }

    /// Receives the next chunk. `None` means the stream closed: either after
    /// an end or error chunk, or because the transport ended without a
    /// terminal record.
    pub async fn next_chunk(&mut self) -> Option<StreamChunk> {
        self.rx.recv().await
    }

    /// Stops the background reader. Chunks already queued remain readable.
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }
}

impl Drop for TtsStream {
    fn drop(&mut self) {
        let _ = self.cancel.send(true);
    }
}

/// Drives the SSE byte stream, delivering decoded chunks into `tx`.
///
/// Owns the response body exclusively and releases it on every exit path.
/// Cancellation is observed both while reading and while blocked on a full
/// delivery queue.
pub(crate) async fn pump_stream<S, B, E>(
    body: S,
    tx: mpsc::Sender<StreamChunk>,
    mut cancel: watch::Receiver<bool>,
) where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    pin_mut!(body);

    let mut parser = SseParser::new();
    let mut sequence = 0usize;

    'read: loop {
        let frame = tokio::select! {
            _ = cancel.changed() => {
                debug!("stream cancelled, stopping reader");
                break;
            }
            frame = body.next() => frame,
        };

        let Some(frame) = frame else {
            // Transport closed without a terminal record: the channel just
            // closes, no synthetic end chunk.
            debug!(sequence, "stream ended without terminal record");
            break;
        };

        let bytes = match frame {
            Ok(bytes) => bytes,
            Err(error) => {
                let chunk = StreamChunk::Error(TtsError::Transport(anyhow::anyhow!(
                    "stream read error: {error}"
                )));
                let _ = deliver(&tx, &mut cancel, chunk).await;
                break;
            }
        };

        for record in parser.push(bytes.as_ref()) {
            if record.chunk_type == "audio" && !record.audio.is_empty() {
                match base64::engine::general_purpose::STANDARD.decode(&record.audio) {
                    Ok(data) => {
                        let chunk = StreamChunk::Audio(AudioChunk { data, sequence });
                        if !deliver(&tx, &mut cancel, chunk).await {
                            break 'read;
                        }
                        sequence += 1;
                    }
                    Err(error) => {
                        warn!(%error, sequence, "dropping audio chunk with undecodable payload");
                    }
                }
            }

            if record.is_terminal() {
                let chunk = StreamChunk::End(StreamEnd {
                    total_chunks: sequence,
                    request_id: record.request_id.clone(),
                });
                let _ = deliver(&tx, &mut cancel, chunk).await;
                debug!(total_chunks = sequence, "stream completed");
                break 'read;
            }
        }
    }
}

/// Sends one chunk, bailing out if the stream is cancelled or the receiver
/// is gone. Returns false when delivery is no longer possible.
async fn deliver(
    tx: &mpsc::Sender<StreamChunk>,
    cancel: &mut watch::Receiver<bool>,
    chunk: StreamChunk,
) -> bool {
    tokio::select! {
        _ = cancel.changed() => {
            debug!("stream cancelled while delivering chunk");
            false
        }
        sent = tx.send(chunk) => sent.is_ok(),
    }
}
