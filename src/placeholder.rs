//! Placeholder audio for the "download" flow.
//!
//! Nothing here encodes speech. A [`PlaceholderAudio`] is a fixed MPEG frame
//! header tagged with an estimated duration, standing in for a real recording
//! until one exists.

use std::path::Path;

use crate::error::CatalogError;
use crate::voice::Utterance;
use crate::SpeechPlatform;

/// Single MPEG-1 Layer III frame header (128 kbit/s, 44.1 kHz) padded to
/// 16 bytes.
pub const MP3_FRAME_HEADER: [u8; 16] = [
    0xFF, 0xFB, 0x90, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00,
];

pub const MIME_TYPE: &str = "audio/mpeg";

/// File stem used when the user gives no name.
pub const DEFAULT_FILE_STEM: &str = "voice-output";

const CHARS_PER_WORD: usize = 5;
const WORDS_PER_MINUTE: usize = 100;

/// Stand-in audio clip for a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderAudio {
    pub bytes: Vec<u8>,
    /// Estimated speaking time in whole seconds, at least 1
    pub duration_secs: u64,
}

impl PlaceholderAudio {
    /// Clip for `text`. Surrounding whitespace does not count towards the
    /// estimate.
    pub fn for_text(text: &str) -> Self {
        Self {
            bytes: MP3_FRAME_HEADER.to_vec(),
            duration_secs: estimate_duration_secs(text.trim().chars().count()),
        }
    }

    /// Speak `utterance` over anything already playing and return the clip
    /// standing in for its audio.
    ///
    /// The clip is only built once the platform has accepted the request.
    pub fn generate<P: SpeechPlatform + ?Sized>(
        platform: &P,
        utterance: &Utterance,
    ) -> Result<Self, CatalogError> {
        if utterance.text.trim().is_empty() {
            return Err(CatalogError::InvalidUtterance("text is empty".to_string()));
        }
        platform.speak_now(utterance)?;
        let clip = Self::for_text(&utterance.text);
        log::info!(
            "Placeholder audio ready: {} characters, about {}",
            utterance.text.trim().chars().count(),
            clip.duration_label()
        );
        Ok(clip)
    }

    pub fn mime_type(&self) -> &'static str {
        MIME_TYPE
    }

    /// Estimated duration rendered as `m:ss`.
    pub fn duration_label(&self) -> String {
        format_time(self.duration_secs as f64)
    }

    /// Write the clip to a file.
    pub fn write_to(&self, path: &Path) -> Result<(), std::io::Error> {
        std::fs::write(path, &self.bytes)
    }
}

/// Estimated speaking time for `chars` characters.
///
/// Assumes five characters per word and a hundred words per minute. Both
/// the word count and the result are floored at one.
pub fn estimate_duration_secs(chars: usize) -> u64 {
    let words = (chars / CHARS_PER_WORD).max(1);
    let secs = words * 60 / WORDS_PER_MINUTE;
    secs.max(1) as u64
}

/// Render seconds as `m:ss`. Non-finite or negative input renders `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Download file name for a user-supplied stem.
pub fn download_filename(stem: &str) -> String {
    let stem = stem.trim();
    let stem = if stem.is_empty() { DEFAULT_FILE_STEM } else { stem };
    format!("{stem}.mp3")
}
