//! OS speech engine backend built on the `tts` crate.
//!
//! Voices come from SAPI/WinRT on Windows, AVFoundation on macOS and Speech
//! Dispatcher on Linux. The OS engines do not report whether a voice is
//! network-backed, so every native voice counts as local.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tts::Tts;

use crate::error::CatalogError;
use crate::voice::{Utterance, Voice, VoiceChoice};
use crate::SpeechPlatform;

pub struct NativePlatform {
    tts: Option<Mutex<Tts>>,
    // never bumped: the OS engines load their voice list synchronously
    changed: watch::Sender<u64>,
}

impl Default for NativePlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl NativePlatform {
    /// Connect to the default OS speech engine.
    ///
    /// A host without one yields an unsupported platform rather than an
    /// error, so the capability check stays in one place.
    pub fn new() -> Self {
        let tts = match Tts::default() {
            Ok(tts) => Some(Mutex::new(tts)),
            Err(e) => {
                log::warn!("No OS speech engine available: {e}");
                None
            }
        };
        let (changed, _) = watch::channel(0);
        Self { tts, changed }
    }

    fn engine(&self) -> Result<MutexGuard<'_, Tts>, CatalogError> {
        self.tts
            .as_ref()
            .map(|tts| tts.lock().unwrap_or_else(PoisonError::into_inner))
            .ok_or(CatalogError::UnsupportedEnvironment)
    }
}

impl SpeechPlatform for NativePlatform {
    fn is_supported(&self) -> bool {
        self.tts.is_some()
    }

    fn voices(&self) -> Vec<Voice> {
        let Ok(tts) = self.engine() else {
            return Vec::new();
        };
        match tts.voices() {
            Ok(voices) => voices
                .iter()
                .map(|v| Voice::new(v.name(), v.language().to_string(), true))
                .collect(),
            Err(e) => {
                log::debug!("Voice listing failed: {e}");
                Vec::new()
            }
        }
    }

    fn voices_changed(&self) -> watch::Receiver<u64> {
        self.changed.subscribe()
    }

    fn speak(&self, utterance: &Utterance) -> Result<(), CatalogError> {
        let mut tts = self.engine()?;
        let features = tts.supported_features();

        if features.voice {
            if let VoiceChoice::Voice(wanted) = &utterance.voice {
                let voices = tts.voices().map_err(platform_error)?;
                if let Some(voice) = voices.iter().find(|v| v.name() == wanted.name) {
                    tts.set_voice(voice).map_err(platform_error)?;
                }
            }
        }
        if features.rate {
            let rate = (tts.normal_rate() * utterance.rate).clamp(tts.min_rate(), tts.max_rate());
            tts.set_rate(rate).map_err(platform_error)?;
        }
        if features.pitch {
            let pitch =
                (tts.normal_pitch() * utterance.pitch).clamp(tts.min_pitch(), tts.max_pitch());
            tts.set_pitch(pitch).map_err(platform_error)?;
        }
        if features.volume {
            let volume =
                tts.min_volume() + utterance.volume * (tts.max_volume() - tts.min_volume());
            tts.set_volume(volume).map_err(platform_error)?;
        }

        tts.speak(utterance.text.as_str(), false)
            .map_err(platform_error)?;
        Ok(())
    }

    fn cancel(&self) {
        let Ok(mut tts) = self.engine() else {
            return;
        };
        if tts.supported_features().stop {
            if let Err(e) = tts.stop() {
                log::debug!("Stopping speech failed: {e}");
            }
        }
    }
}

fn platform_error(err: tts::Error) -> CatalogError {
    CatalogError::Platform(err.to_string())
}
