use std::cmp::Ordering;

use crate::voice::Voice;

use super::language::primary_subtag;

/// Quality tier inferred from a voice's name and hints. Lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VoiceTier {
    Premium,
    Enhanced,
    Standard,
}

impl VoiceTier {
    pub fn of(voice: &Voice) -> Self {
        if has_marker(voice, "premium") {
            VoiceTier::Premium
        } else if has_marker(voice, "enhanced") {
            VoiceTier::Enhanced
        } else {
            VoiceTier::Standard
        }
    }
}

fn has_marker(voice: &Voice, marker: &str) -> bool {
    voice.name.to_lowercase().contains(marker)
        || voice
            .quality_hints
            .iter()
            .any(|hint| hint.to_lowercase().contains(marker))
}

/// Total order used to rank voices, best first.
///
/// Cloud voices come before local ones, then premium before enhanced before
/// everything else, then names in ordinal order.
pub fn compare_voices(a: &Voice, b: &Voice) -> Ordering {
    a.is_local
        .cmp(&b.is_local)
        .then_with(|| VoiceTier::of(a).cmp(&VoiceTier::of(b)))
        .then_with(|| a.name.cmp(&b.name))
}

/// Voices usable for `language`, ranked best first.
///
/// A voice qualifies when its tag matches exactly or shares the primary
/// subtag, so `"en-GB"` also offers `"en-US"` voices. An empty result means
/// the caller should fall back to the system default voice.
pub fn rank_voices(language: &str, voices: &[Voice]) -> Vec<Voice> {
    let primary = primary_subtag(language);
    let mut ranked: Vec<Voice> = voices
        .iter()
        .filter(|v| v.effective_language() == language || v.primary_subtag() == primary)
        .cloned()
        .collect();
    ranked.sort_by(compare_voices);
    ranked
}
