//! Voice catalog: discovery, grouping by language, and ranking.
//!
//! A [`Catalog`] is a plain value. It is built once by
//! [`Discovery::discover`](discovery::Discovery::discover) and recomputed only
//! when the caller reports that the platform's voice list changed.
//!
//! # Examples
//!
//! ```rust
//! use voiceforge::{Catalog, Voice, VoiceChoice};
//!
//! let catalog = Catalog::from_voices(vec![
//!     Voice::new("Sam", "en-US", true),
//!     Voice::new("Ava Premium", "en-US", false),
//!     Voice::new("Thomas", "fr-FR", true),
//! ]);
//!
//! assert_eq!(catalog.default_language(), Some("en-US"));
//! match catalog.recommended_voice("en-US") {
//!     VoiceChoice::Voice(voice) => assert_eq!(voice.name, "Ava Premium"),
//!     VoiceChoice::SystemDefault => unreachable!(),
//! }
//! assert_eq!(catalog.recommended_voice("de-DE"), VoiceChoice::SystemDefault);
//! ```

pub mod discovery;
pub mod language;
pub mod ranking;

pub use discovery::{ensure_supported, Discovery, DiscoveryParams};
pub use language::{
    get_language_name, group_by_language, primary_subtag, select_default_language,
    LanguageGroup, LanguageGroups, FALLBACK_LANGUAGES,
};
pub use ranking::{compare_voices, rank_voices, VoiceTier};

use crate::error::CatalogError;
use crate::voice::{Utterance, Voice, VoiceChoice, DEFAULT_VOICE_VALUE};

/// How a catalog came to be ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    /// The polling loop saw a populated voice list.
    Polled,
    /// The platform's "voices changed" notification arrived first.
    Notified,
    /// The bounded wait ran out; the canned language list is in use.
    Fallback,
    /// Built directly from an already-fetched voice list.
    Provided,
}

/// One entry of a voice picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceOption {
    /// Voice name, or `"default"` for the system default sentinel
    pub value: String,
    pub label: String,
    pub recommended: bool,
    pub cloud: bool,
}

/// Discovered voices grouped by language.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    voices: Vec<Voice>,
    groups: LanguageGroups,
    source: Option<CatalogSource>,
}

impl Catalog {
    /// Build a ready catalog from a voice list the caller already holds.
    pub fn from_voices(voices: Vec<Voice>) -> Self {
        Self::build(voices, CatalogSource::Provided)
    }

    pub(crate) fn build(voices: Vec<Voice>, source: CatalogSource) -> Self {
        let groups = group_by_language(&voices);
        Self {
            voices,
            groups,
            source: Some(source),
        }
    }

    /// Ready catalog holding the canned language list and no voices.
    pub fn fallback() -> Self {
        Self {
            voices: Vec::new(),
            groups: language::fallback_groups(),
            source: Some(CatalogSource::Fallback),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.source.is_some()
    }

    pub fn source(&self) -> Option<CatalogSource> {
        self.source
    }

    pub fn is_fallback(&self) -> bool {
        self.source == Some(CatalogSource::Fallback)
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn groups(&self) -> &LanguageGroups {
        &self.groups
    }

    /// Language the picker should open on.
    pub fn default_language(&self) -> Option<&str> {
        select_default_language(&self.groups)
    }

    /// Voices usable for `language`, best first.
    pub fn ranked_voices(&self, language: &str) -> Vec<Voice> {
        rank_voices(language, &self.voices)
    }

    /// Best voice for `language`, or the system default when none match.
    pub fn recommended_voice(&self, language: &str) -> VoiceChoice {
        self.ranked_voices(language)
            .into_iter()
            .next()
            .map(VoiceChoice::Voice)
            .unwrap_or_default()
    }

    /// Picker entries for `language`, recommended entry first.
    pub fn voice_options(&self, language: &str) -> Vec<VoiceOption> {
        let ranked = self.ranked_voices(language);
        if ranked.is_empty() {
            return vec![VoiceOption {
                value: DEFAULT_VOICE_VALUE.to_string(),
                label: "Default System Voice".to_string(),
                recommended: true,
                cloud: false,
            }];
        }

        ranked
            .into_iter()
            .enumerate()
            .map(|(i, voice)| {
                let label = if i == 0 {
                    format!("{} ⭐ (Recommended)", voice.name)
                } else if voice.is_cloud() {
                    format!("{} ☁️", voice.name)
                } else {
                    voice.name.clone()
                };
                VoiceOption {
                    cloud: voice.is_cloud(),
                    value: voice.name,
                    label,
                    recommended: i == 0,
                }
            })
            .collect()
    }

    /// Map a picker value back to a voice.
    ///
    /// `"default"`, the empty string and names the catalog does not know all
    /// resolve to the system default.
    pub fn resolve_voice(&self, value: &str) -> VoiceChoice {
        if value.is_empty() || value == DEFAULT_VOICE_VALUE {
            return VoiceChoice::SystemDefault;
        }
        self.voices
            .iter()
            .find(|v| v.name == value)
            .cloned()
            .map(VoiceChoice::Voice)
            .unwrap_or_default()
    }

    /// Build a speech request from picker state.
    ///
    /// The text is trimmed and must not be empty, a language must be
    /// selected, and `voice_value` is resolved with [`Catalog::resolve_voice`].
    pub fn utterance(
        &self,
        text: &str,
        language: &str,
        voice_value: &str,
        pitch: f32,
        rate: f32,
    ) -> Result<Utterance, CatalogError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CatalogError::InvalidUtterance("text is empty".to_string()));
        }
        if language.is_empty() {
            return Err(CatalogError::InvalidUtterance(
                "no language selected".to_string(),
            ));
        }
        Ok(Utterance::builder()
            .text(text)
            .language(language)
            .voice(self.resolve_voice(voice_value))
            .pitch(pitch)
            .rate(rate)
            .build()?)
    }

    /// Recompute everything from a fresh voice list.
    ///
    /// An empty list leaves the catalog untouched.
    pub fn refresh(&mut self, voices: Vec<Voice>) -> bool {
        if voices.is_empty() {
            return false;
        }
        let source = match self.source {
            Some(CatalogSource::Fallback) | None => CatalogSource::Notified,
            Some(source) => source,
        };
        *self = Self::build(voices, source);
        true
    }
}
