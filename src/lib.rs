//! # voiceforge
//!
//! A Rust library for discovering, grouping and ranking the voices of a
//! platform speech engine.
//!
//! ## Features
//!
//! - **Voice discovery**: Waits for platforms that populate their voice list
//!   lazily, with a bounded wait and a canned language fallback
//! - **Language grouping**: Voices grouped by language tag with readable names
//! - **Voice ranking**: Cloud, premium and enhanced voices recommended first
//! - **Native backend**: The OS speech engine behind the `native` feature
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! voiceforge = { version = "2026.10", features = ["native"] }
//! ```
//!
//! ```ignore
//! use voiceforge::{platforms::native::NativePlatform, Discovery};
//!
//! let discovery = Discovery::new(NativePlatform::new())?;
//! let catalog = discovery.discover().await;
//!
//! if let Some(language) = catalog.default_language() {
//!     for option in catalog.voice_options(language) {
//!         println!("{}", option.label);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod catalog;
pub mod error;
pub mod placeholder;
pub mod platforms;
pub mod voice;

use std::sync::Arc;

use tokio::sync::watch;

pub use catalog::{Catalog, CatalogSource, Discovery, DiscoveryParams, VoiceOption};
pub use error::CatalogError;
pub use placeholder::PlaceholderAudio;
pub use voice::{Utterance, Voice, VoiceChoice};

/// Common interface for host speech engines.
///
/// This trait covers the handful of platform operations voice discovery
/// depends on. Implementations are expected to be cheap to query repeatedly.
pub trait SpeechPlatform {
    /// Whether the host offers speech synthesis at all.
    fn is_supported(&self) -> bool;

    /// Current voice list. May be empty while the platform is still loading.
    fn voices(&self) -> Vec<Voice>;

    /// Subscribe to "voice list changed" notifications.
    ///
    /// Every change of the watched value is one notification. A closed
    /// channel means no further notifications will arrive.
    fn voices_changed(&self) -> watch::Receiver<u64>;

    /// Queue an utterance.
    fn speak(&self, utterance: &Utterance) -> Result<(), CatalogError>;

    /// Stop current speech and drop anything queued.
    fn cancel(&self);

    /// Cancel whatever is playing, then queue `utterance`.
    fn speak_now(&self, utterance: &Utterance) -> Result<(), CatalogError> {
        self.cancel();
        self.speak(utterance)
    }

    /// Speak a silent utterance and cancel it straight away.
    ///
    /// Some engines only populate their voice list after the first speech
    /// request. Default implementation calls `speak(&Utterance::silent())`
    /// then `cancel()`.
    fn nudge(&self) -> Result<(), CatalogError> {
        let result = self.speak(&Utterance::silent());
        self.cancel();
        result
    }
}

impl<P: SpeechPlatform + ?Sized> SpeechPlatform for Arc<P> {
    fn is_supported(&self) -> bool {
        (**self).is_supported()
    }

    fn voices(&self) -> Vec<Voice> {
        (**self).voices()
    }

    fn voices_changed(&self) -> watch::Receiver<u64> {
        (**self).voices_changed()
    }

    fn speak(&self, utterance: &Utterance) -> Result<(), CatalogError> {
        (**self).speak(utterance)
    }

    fn cancel(&self) {
        (**self).cancel()
    }

    fn speak_now(&self, utterance: &Utterance) -> Result<(), CatalogError> {
        (**self).speak_now(utterance)
    }

    fn nudge(&self) -> Result<(), CatalogError> {
        (**self).nudge()
    }
}
