use std::collections::BTreeSet;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::catalog::language::{primary_subtag, UNTAGGED_LANGUAGE};
use crate::error::CatalogError;

/// Longest text accepted for a single utterance, in characters.
pub const MAX_UTTERANCE_CHARS: usize = 50_000;

/// Option value standing in for "let the platform pick".
pub const DEFAULT_VOICE_VALUE: &str = "default";

/// A synthetic speaking persona reported by the speech platform.
///
/// Voices are supplied wholesale by the platform and never modified
/// afterwards. `name` is unique within one platform listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Voice {
    /// Platform display name (e.g. `"Samantha"`, `"Google UK English Female"`)
    pub name: String,
    /// BCP-47-like language tag (e.g. `"en-US"`)
    pub language: String,
    /// True for on-device voices, false for network-backed ("cloud") voices
    pub is_local: bool,
    /// Free-text quality markers such as `"premium"` or `"enhanced"`
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub quality_hints: BTreeSet<String>,
}

impl Voice {
    pub fn new(name: impl Into<String>, language: impl Into<String>, is_local: bool) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            is_local,
            quality_hints: BTreeSet::new(),
        }
    }

    /// Attach a quality marker reported alongside the voice.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.quality_hints.insert(hint.into());
        self
    }

    /// Language tag used for grouping and matching.
    ///
    /// Voices that report no tag are treated as [`UNTAGGED_LANGUAGE`].
    pub fn effective_language(&self) -> &str {
        if self.language.is_empty() {
            UNTAGGED_LANGUAGE
        } else {
            &self.language
        }
    }

    /// Language subtag before the first hyphen (`"en"` for `"en-US"`).
    pub fn primary_subtag(&self) -> &str {
        primary_subtag(self.effective_language())
    }

    pub fn is_cloud(&self) -> bool {
        !self.is_local
    }
}

/// The voice an utterance should be spoken with.
///
/// `SystemDefault` is the sentinel used when no platform voice matches the
/// requested language; it is a valid outcome, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoiceChoice {
    #[default]
    SystemDefault,
    Voice(Voice),
}

impl VoiceChoice {
    pub fn voice(&self) -> Option<&Voice> {
        match self {
            VoiceChoice::Voice(voice) => Some(voice),
            VoiceChoice::SystemDefault => None,
        }
    }

    /// Value used for this choice in a voice picker.
    pub fn value(&self) -> &str {
        match self {
            VoiceChoice::Voice(voice) => &voice.name,
            VoiceChoice::SystemDefault => DEFAULT_VOICE_VALUE,
        }
    }
}

/// A single speech request handed to the platform.
///
/// ```rust
/// use voiceforge::Utterance;
///
/// let utterance = Utterance::builder()
///     .text("Hello, world!")
///     .language("en-GB")
///     .rate(1.2)
///     .build()?;
/// assert_eq!(utterance.pitch, 1.0);
/// # Ok::<(), voiceforge::CatalogError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct Utterance {
    /// Text to speak. May be empty (used by the voice-list nudge).
    #[builder(setter(into), default)]
    pub text: String,
    /// Language tag the platform should speak in.
    #[builder(setter(into), default = "\"en-US\".to_string()")]
    pub language: String,
    #[builder(default)]
    pub voice: VoiceChoice,
    /// Range: 0.0–2.0, default 1.0.
    #[builder(default = "1.0")]
    pub pitch: f32,
    /// Range: 0.1–10.0, default 1.0.
    #[builder(default = "1.0")]
    pub rate: f32,
    /// Range: 0.0–1.0, default 1.0.
    #[builder(default = "1.0")]
    pub volume: f32,
}

impl Utterance {
    pub fn builder() -> UtteranceBuilder {
        UtteranceBuilder::default()
    }

    /// Empty, zero-volume request used to coax lazy platforms into
    /// populating their voice list.
    pub fn silent() -> Self {
        Self {
            text: String::new(),
            language: "en-US".to_string(),
            voice: VoiceChoice::SystemDefault,
            pitch: 1.0,
            rate: 1.0,
            volume: 0.0,
        }
    }
}

impl UtteranceBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(text) = &self.text {
            let chars = text.chars().count();
            if chars > MAX_UTTERANCE_CHARS {
                return Err(format!(
                    "text is {chars} characters, limit is {MAX_UTTERANCE_CHARS}"
                ));
            }
        }
        check_range("pitch", self.pitch, 0.0, 2.0)?;
        check_range("rate", self.rate, 0.1, 10.0)?;
        check_range("volume", self.volume, 0.0, 1.0)?;
        Ok(())
    }
}

fn check_range(field: &str, value: Option<f32>, min: f32, max: f32) -> Result<(), String> {
    match value {
        Some(v) if !(min..=max).contains(&v) => {
            Err(format!("{field} {v} outside {min}..={max}"))
        }
        _ => Ok(()),
    }
}

impl From<UtteranceBuilderError> for CatalogError {
    fn from(err: UtteranceBuilderError) -> Self {
        CatalogError::InvalidUtterance(err.to_string())
    }
}
