//! Incremental parser for the TTS Server-Sent-Events response stream.

use serde::Deserialize;
use tracing::warn;

/// One decoded chunk record from the SSE stream.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StreamChunkData {
    #[serde(rename = "Type", default)]
    pub chunk_type: String,
    #[serde(rename = "Audio", default)]
    pub audio: String,
    #[serde(rename = "IsEnd", default)]
    pub is_end: bool,
    #[serde(rename = "RequestId", default)]
    pub request_id: String,
}

impl StreamChunkData {
    pub fn is_terminal(&self) -> bool {
        self.chunk_type == "end" || self.is_end
    }
}

/// Incremental SSE decoder.
///
/// `data:`-prefixed lines accumulate into the current event; a blank line
/// dispatches the buffered event as one JSON record. A malformed event is
/// dropped so one corrupt record never aborts an otherwise healthy stream.
/// After a terminal record the parser ignores all remaining input.
#[derive(Debug, Default)]
pub(crate) struct SseParser {
    buf: Vec<u8>,
    event_data: String,
    terminated: bool,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn terminated(&self) -> bool {
        self.terminated
    }

    /// Feeds raw bytes, returning every record completed by this input.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<StreamChunkData> {
        let mut records = Vec::new();
        if self.terminated {
            return records;
        }
        self.buf.extend_from_slice(bytes);

        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw[..pos]);
            let line = line.strip_suffix('\r').unwrap_or(&line);
            if let Some(record) = self.process_line(line) {
                records.push(record);
                if self.terminated {
                    break;
                }
            }
        }
        records
    }

    fn process_line(&mut self, line: &str) -> Option<StreamChunkData> {
        if let Some(data) = line.strip_prefix("data:") {
            self.event_data.push_str(data.trim_start());
            return None;
        }
        if !line.is_empty() || self.event_data.is_empty() {
            return None;
        }

        let event = std::mem::take(&mut self.event_data);
        match serde_json::from_str::<StreamChunkData>(&event) {
            Ok(record) => {
                if record.is_terminal() {
                    self.terminated = true;
                }
                Some(record)
            }
            Err(error) => {
                warn!(%error, len = event.len(), "dropping malformed stream event");
                None
            }
        }
    }
}
