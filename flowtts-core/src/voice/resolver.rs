//! Voice catalog lookups and voice id → model resolution.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;

use super::{Voice, VoiceLibrary};
use crate::error::TtsError;

/// Model serving the standard (turbo) catalog.
pub const MODEL_TURBO: &str = "flow_01_turbo";
/// Model serving the extended catalog.
pub const MODEL_EX: &str = "flow_01_ex";

const TURBO_VOICES_JSON: &str = include_str!("data/voices-flow_01_turbo.json");
const EX_VOICES_JSON: &str = include_str!("data/voices-flow_01_ex.json");

#[derive(Deserialize)]
struct VoiceData {
    voices: Vec<Voice>,
}

struct Catalog {
    turbo_voices: Vec<Voice>,
    ex_voices: Vec<Voice>,
    turbo_by_id: HashMap<String, usize>,
    ex_by_id: HashMap<String, usize>,
}

/// Voice catalog with O(1) id lookups.
///
/// The catalog is built at most once per instance no matter how many threads
/// race on first use; every caller observes either the complete catalog or
/// the propagated initialization error, never a partial one. Once built it
/// never changes, so reads take no lock.
pub struct VoiceResolver {
    catalog: OnceLock<Result<Catalog, String>>,
}

static DEFAULT_RESOLVER: VoiceResolver = VoiceResolver::new();

/// Process-wide resolver backing all client operations. Acceptable global
/// state: the catalog is immutable configuration data.
pub fn default_resolver() -> &'static VoiceResolver {
    &DEFAULT_RESOLVER
}

impl VoiceResolver {
    pub const fn new() -> Self {
        Self {
            catalog: OnceLock::new(),
        }
    }

    fn catalog(&self) -> Result<&Catalog, TtsError> {
        self.catalog
            .get_or_init(|| Catalog::load(TURBO_VOICES_JSON, EX_VOICES_JSON))
            .as_ref()
            .map_err(|e| TtsError::CatalogInit(e.clone()))
    }

    /// Returns the backend model serving the given voice id. The standard
    /// catalog takes precedence over the extended one.
    pub fn model_for_voice(&self, voice_id: &str) -> Result<&'static str, TtsError> {
        let catalog = self.catalog()?;
        if catalog.turbo_by_id.contains_key(voice_id) {
            return Ok(MODEL_TURBO);
        }
        if catalog.ex_by_id.contains_key(voice_id) {
            return Ok(MODEL_EX);
        }
        Err(TtsError::UnknownVoiceId(voice_id.to_string()))
    }

    /// Voice metadata by id. Unknown ids are not an error.
    pub fn voice(&self, voice_id: &str) -> Result<Option<Voice>, TtsError> {
        let catalog = self.catalog()?;
        Ok(catalog.lookup(voice_id).cloned())
    }

    /// All voices in declaration order, standard catalog first. Extended
    /// voices are appended only when requested.
    pub fn voices(&self, include_extended: bool) -> Result<VoiceLibrary, TtsError> {
        let catalog = self.catalog()?;
        let mut preset = catalog.turbo_voices.clone();
        if include_extended {
            preset.extend(catalog.ex_voices.iter().cloned());
        }
        Ok(VoiceLibrary { preset })
    }

    /// Case-insensitive substring search over name, description and
    /// language, standard-catalog entries first.
    pub fn search(&self, query: &str) -> Result<Vec<Voice>, TtsError> {
        let catalog = self.catalog()?;
        let query = query.to_lowercase();
        let results = catalog
            .turbo_voices
            .iter()
            .chain(catalog.ex_voices.iter())
            .filter(|v| {
                v.name.to_lowercase().contains(&query)
                    || v.description.to_lowercase().contains(&query)
                    || v.language.to_lowercase().contains(&query)
            })
            .cloned()
            .collect();
        Ok(results)
    }

    /// Deterministic default: the first standard-catalog voice.
    pub fn fallback_voice(&self) -> Result<Voice, TtsError> {
        let catalog = self.catalog()?;
        catalog
            .turbo_voices
            .first()
            .cloned()
            .ok_or(TtsError::NoVoicesAvailable)
    }
}

impl Default for VoiceResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    fn load(turbo_json: &str, ex_json: &str) -> Result<Catalog, String> {
        let turbo: VoiceData = serde_json::from_str(turbo_json)
            .map_err(|e| format!("failed to load turbo voices: {e}"))?;
        let ex: VoiceData =
            serde_json::from_str(ex_json).map_err(|e| format!("failed to load ex voices: {e}"))?;

        let turbo_by_id = turbo
            .voices
            .iter()
            .enumerate()
            .map(|(i, v)| (v.id.clone(), i))
            .collect();
        let ex_by_id = ex
            .voices
            .iter()
            .enumerate()
            .map(|(i, v)| (v.id.clone(), i))
            .collect();

        Ok(Catalog {
            turbo_voices: turbo.voices,
            ex_voices: ex.voices,
            turbo_by_id,
            ex_by_id,
        })
    }

    fn lookup(&self, voice_id: &str) -> Option<&Voice> {
        if let Some(&i) = self.turbo_by_id.get(voice_id) {
            return self.turbo_voices.get(i);
        }
        self.ex_by_id
            .get(voice_id)
            .and_then(|&i| self.ex_voices.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_for_turbo_voices() {
        let resolver = VoiceResolver::new();
        assert_eq!(
            resolver.model_for_voice("v-female-R2s4N9qJ").unwrap(),
            MODEL_TURBO
        );
        assert_eq!(
            resolver.model_for_voice("v-male-Bk7vD3xP").unwrap(),
            MODEL_TURBO
        );
    }

    #[test]
    fn test_model_for_extended_voices() {
        let resolver = VoiceResolver::new();
        assert_eq!(resolver.model_for_voice("male-qn-qingse").unwrap(), MODEL_EX);
        assert_eq!(resolver.model_for_voice("female-shaonv").unwrap(), MODEL_EX);
    }

    #[test]
    fn test_unknown_voice_id() {
        let resolver = VoiceResolver::new();
        let err = resolver.model_for_voice("unknown-voice-id").unwrap_err();
        assert_eq!(err.code(), "UnknownVoiceID");
    }

    #[test]
    fn test_voice_lookup() {
        let resolver = VoiceResolver::new();
        let voice = resolver.voice("v-female-R2s4N9qJ").unwrap().unwrap();
        assert_eq!(voice.id, "v-female-R2s4N9qJ");
        assert!(!voice.name.is_empty());
        assert!(!voice.language.is_empty());

        assert!(resolver.voice("unknown-voice-id").unwrap().is_none());
    }

    #[test]
    fn test_standard_catalog_is_strict_subset() {
        let resolver = VoiceResolver::new();
        let standard = resolver.voices(false).unwrap();
        let all = resolver.voices(true).unwrap();
        assert!(standard.preset.len() < all.preset.len());
        // Standard voices come first, in declaration order.
        assert_eq!(all.preset[..standard.preset.len()], standard.preset[..]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let resolver = VoiceResolver::new();
        let lower = resolver.search("female").unwrap();
        let upper = resolver.search("FEMALE").unwrap();
        let mixed = resolver.search("Female").unwrap();
        assert!(!lower.is_empty());
        assert_eq!(lower, upper);
        assert_eq!(lower, mixed);
    }

    #[test]
    fn test_search_matches_name_description_and_language() {
        let resolver = VoiceResolver::new();

        let by_name = resolver.search("温柔").unwrap();
        assert!(by_name.iter().any(|v| v.id == "v-female-R2s4N9qJ"));

        let by_language = resolver.search("ja").unwrap();
        assert!(by_language.iter().any(|v| v.language == "ja"));
    }

    #[test]
    fn test_search_no_match_is_empty_not_error() {
        let resolver = VoiceResolver::new();
        assert!(resolver.search("xyzzz-no-match-12345").unwrap().is_empty());
    }

    #[test]
    fn test_fallback_voice_is_deterministic() {
        let resolver = VoiceResolver::new();
        let first = resolver.fallback_voice().unwrap();
        let second = resolver.fallback_voice().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.id, resolver.voices(false).unwrap().preset[0].id);
    }

    #[test]
    fn test_default_resolver_is_shared() {
        let a = default_resolver().fallback_voice().unwrap();
        let b = default_resolver().fallback_voice().unwrap();
        assert_eq!(a, b);
    }
}
