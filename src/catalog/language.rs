use std::collections::HashMap;

use crate::voice::Voice;

use super::ranking::compare_voices;

/// Tag used for voices that report no language at all.
pub const UNTAGGED_LANGUAGE: &str = "en-US";

/// Display names for the language tags most platforms ship voices for.
const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("en-US", "English (US)"),
    ("en-GB", "English (UK)"),
    ("en-AU", "English (Australia)"),
    ("en-CA", "English (Canada)"),
    ("es-ES", "Spanish (Spain)"),
    ("es-MX", "Spanish (Mexico)"),
    ("fr-FR", "French (France)"),
    ("fr-CA", "French (Canada)"),
    ("de-DE", "German"),
    ("it-IT", "Italian"),
    ("pt-BR", "Portuguese (Brazil)"),
    ("pt-PT", "Portuguese (Portugal)"),
    ("ru-RU", "Russian"),
    ("zh-CN", "Chinese (Mandarin)"),
    ("ja-JP", "Japanese"),
    ("ko-KR", "Korean"),
    ("ar-SA", "Arabic"),
    ("hi-IN", "Hindi"),
    ("nl-NL", "Dutch"),
    ("sv-SE", "Swedish"),
    ("da-DK", "Danish"),
    ("no-NO", "Norwegian"),
    ("fi-FI", "Finnish"),
    ("pl-PL", "Polish"),
    ("tr-TR", "Turkish"),
];

/// Languages offered when the platform never reports any voices.
pub const FALLBACK_LANGUAGES: [(&str, &str); 10] = [
    ("en-US", "English (US)"),
    ("en-GB", "English (UK)"),
    ("es-ES", "Spanish"),
    ("fr-FR", "French"),
    ("de-DE", "German"),
    ("it-IT", "Italian"),
    ("pt-PT", "Portuguese"),
    ("ru-RU", "Russian"),
    ("zh-CN", "Chinese"),
    ("ja-JP", "Japanese"),
];

/// Language subtag before the first hyphen (`"en"` for `"en-US"`).
pub fn primary_subtag(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}

/// Human-readable name for a language tag.
///
/// Unknown tags fall back to the upper-cased primary subtag, so `"xx-YY"`
/// becomes `"XX"`.
pub fn get_language_name(tag: &str) -> String {
    LANGUAGE_NAMES
        .iter()
        .find(|(known, _)| *known == tag)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| primary_subtag(tag).to_uppercase())
}

/// Voices sharing one exact language tag, ranked best first.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageGroup {
    pub language: String,
    pub display_name: String,
    pub voices: Vec<Voice>,
}

impl LanguageGroup {
    /// Picker label, e.g. `"English (UK) (2 voices)"`.
    ///
    /// Groups without voices (the fallback list) render the bare name.
    pub fn label(&self) -> String {
        match self.voices.len() {
            0 => self.display_name.clone(),
            1 => format!("{} (1 voice)", self.display_name),
            n => format!("{} ({n} voices)", self.display_name),
        }
    }
}

/// Language groups keyed by tag.
///
/// Lookup is by exact tag. `iter()` yields groups sorted by display name,
/// while `first_seen()` keeps the order in which tags first appeared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageGroups {
    groups: Vec<LanguageGroup>,
    index: HashMap<String, usize>,
}

impl LanguageGroups {
    pub(crate) fn push(&mut self, group: LanguageGroup) {
        debug_assert!(!self.index.contains_key(&group.language));
        self.index.insert(group.language.clone(), self.groups.len());
        self.groups.push(group);
    }

    pub fn get(&self, tag: &str) -> Option<&LanguageGroup> {
        self.index.get(tag).map(|&i| &self.groups[i])
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.index.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups in the order their tags were first encountered.
    pub fn first_seen(&self) -> impl Iterator<Item = &LanguageGroup> {
        self.groups.iter()
    }

    /// Groups sorted by display name (ordinal compare).
    pub fn iter(&self) -> impl Iterator<Item = &LanguageGroup> {
        let mut sorted: Vec<&LanguageGroup> = self.groups.iter().collect();
        sorted.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        sorted.into_iter()
    }

    /// Total number of voices across all groups.
    pub fn voice_count(&self) -> usize {
        self.groups.iter().map(|g| g.voices.len()).sum()
    }
}

/// Partition voices by exact language tag.
///
/// Every voice lands in exactly one group. Voices without a tag are filed
/// under [`UNTAGGED_LANGUAGE`]. Each group's voices are ranked with
/// [`compare_voices`].
pub fn group_by_language(voices: &[Voice]) -> LanguageGroups {
    let mut order: Vec<&str> = Vec::new();
    let mut buckets: HashMap<&str, Vec<Voice>> = HashMap::new();

    for voice in voices {
        let tag = voice.effective_language();
        buckets
            .entry(tag)
            .or_insert_with(|| {
                order.push(tag);
                Vec::new()
            })
            .push(voice.clone());
    }

    let mut groups = LanguageGroups::default();
    for tag in order {
        let mut members = buckets.remove(tag).unwrap_or_default();
        members.sort_by(compare_voices);
        groups.push(LanguageGroup {
            language: tag.to_string(),
            display_name: get_language_name(tag),
            voices: members,
        });
    }
    groups
}

/// Voice-less groups for the canned fallback languages.
pub fn fallback_groups() -> LanguageGroups {
    let mut groups = LanguageGroups::default();
    for (tag, name) in FALLBACK_LANGUAGES {
        groups.push(LanguageGroup {
            language: tag.to_string(),
            display_name: name.to_string(),
            voices: Vec::new(),
        });
    }
    groups
}

/// Pick the language a picker should open on.
///
/// Prefers `en-US`, then `en-GB`, then any English tag, then the first tag
/// encountered. Returns `None` only for an empty set of groups.
pub fn select_default_language(groups: &LanguageGroups) -> Option<&str> {
    ["en-US", "en-GB"]
        .into_iter()
        .find_map(|tag| groups.get(tag))
        .or_else(|| groups.first_seen().find(|g| primary_subtag(&g.language) == "en"))
        .or_else(|| groups.first_seen().next())
        .map(|g| g.language.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voices() -> Vec<Voice> {
        vec![
            Voice::new("Thomas", "fr-FR", true),
            Voice::new("Daniel", "en-GB", true),
            Voice::new("Amelie", "fr-CA", true),
            Voice::new("Google français", "fr-FR", false),
            Voice::new("Kyoko", "ja-JP", true),
        ]
    }

    #[test]
    fn known_and_unknown_language_names() {
        assert_eq!(get_language_name("en-US"), "English (US)");
        assert_eq!(get_language_name("tr-TR"), "Turkish");
        assert_eq!(get_language_name("xx-YY"), "XX");
        assert_eq!(get_language_name("cy"), "CY");
    }

    #[test]
    fn primary_subtags() {
        assert_eq!(primary_subtag("en-US"), "en");
        assert_eq!(primary_subtag("zh-Hant-TW"), "zh");
        assert_eq!(primary_subtag("fil"), "fil");
        assert_eq!(primary_subtag(""), "");
    }

    #[test]
    fn grouping_partitions_every_voice() {
        let input = voices();
        let groups = group_by_language(&input);

        assert_eq!(groups.len(), 4);
        assert_eq!(groups.voice_count(), input.len());
        for voice in &input {
            let hits = groups
                .first_seen()
                .filter(|g| g.voices.contains(voice))
                .count();
            assert_eq!(hits, 1, "{} should be in exactly one group", voice.name);
        }
    }

    #[test]
    fn groups_rank_their_voices() {
        let groups = group_by_language(&voices());
        let french = groups.get("fr-FR").unwrap();
        assert_eq!(french.display_name, "French (France)");
        assert_eq!(french.voices[0].name, "Google français");
        assert_eq!(french.label(), "French (France) (2 voices)");
        assert_eq!(groups.get("ja-JP").unwrap().label(), "Japanese (1 voice)");
    }

    #[test]
    fn iteration_is_sorted_by_display_name() {
        let groups = group_by_language(&voices());
        let names: Vec<&str> = groups.iter().map(|g| g.display_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["English (UK)", "French (Canada)", "French (France)", "Japanese"]
        );

        let seen: Vec<&str> = groups.first_seen().map(|g| g.language.as_str()).collect();
        assert_eq!(seen, vec!["fr-FR", "en-GB", "fr-CA", "ja-JP"]);
    }

    #[test]
    fn untagged_voices_join_en_us() {
        let groups = group_by_language(&[
            Voice::new("Mystery", "", true),
            Voice::new("Alex", "en-US", true),
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.get("en-US").unwrap().voices.len(), 2);
    }

    #[test]
    fn default_language_preference() {
        let groups = group_by_language(&voices());
        assert_eq!(select_default_language(&groups), Some("en-GB"));

        let groups = group_by_language(&[
            Voice::new("Thomas", "fr-FR", true),
            Voice::new("Karen", "en-AU", true),
        ]);
        assert_eq!(select_default_language(&groups), Some("en-AU"));

        let groups = group_by_language(&[
            Voice::new("Thomas", "fr-FR", true),
            Voice::new("Kyoko", "ja-JP", true),
        ]);
        assert_eq!(select_default_language(&groups), Some("fr-FR"));

        let groups = group_by_language(&[Voice::new("Thomas", "fr-FR", true)]);
        assert_eq!(select_default_language(&groups), Some("fr-FR"));

        let groups = group_by_language(&[
            Voice::new("Daniel", "en-GB", true),
            Voice::new("Alex", "en-US", true),
        ]);
        assert_eq!(select_default_language(&groups), Some("en-US"));

        assert_eq!(select_default_language(&LanguageGroups::default()), None);
    }

    #[test]
    fn fallback_has_ten_voiceless_languages() {
        let groups = fallback_groups();
        assert_eq!(groups.len(), 10);
        assert_eq!(groups.voice_count(), 0);
        assert_eq!(groups.get("es-ES").unwrap().label(), "Spanish");
        assert_eq!(select_default_language(&groups), Some("en-US"));
    }
}
