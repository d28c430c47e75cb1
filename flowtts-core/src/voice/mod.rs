pub mod resolver;

use serde::{Deserialize, Serialize};

/// A synthesis voice from the bundled catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub language: String,
    /// Backend model serving this voice.
    pub model: String,
}

/// Collection of voices returned by list operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceLibrary {
    pub preset: Vec<Voice>,
}
