use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::error::CatalogError;
use crate::voice::{Utterance, Voice};
use crate::SpeechPlatform;

/// Something the platform was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedEvent {
    Spoke(Utterance),
    Cancelled,
}

/// In-memory speech platform.
///
/// The voice list is whatever the owner last set. Spoken utterances are
/// recorded instead of played, which makes this the platform of choice for
/// tests and demos.
///
/// ```rust
/// use voiceforge::{platforms::scripted::ScriptedPlatform, SpeechPlatform, Voice};
///
/// let platform = ScriptedPlatform::new();
/// assert!(platform.voices().is_empty());
///
/// platform.set_voices(vec![Voice::new("Alex", "en-US", true)]);
/// assert_eq!(platform.voices().len(), 1);
/// ```
pub struct ScriptedPlatform {
    supported: bool,
    voices: Mutex<Vec<Voice>>,
    changed: Mutex<Option<watch::Sender<u64>>>,
    events: Mutex<Vec<ScriptedEvent>>,
    fail_speech: AtomicBool,
    polls: AtomicUsize,
    cancels: AtomicUsize,
}

impl Default for ScriptedPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedPlatform {
    /// A supported platform whose voice list starts empty.
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0);
        Self {
            supported: true,
            voices: Mutex::new(Vec::new()),
            changed: Mutex::new(Some(sender)),
            events: Mutex::new(Vec::new()),
            fail_speech: AtomicBool::new(false),
            polls: AtomicUsize::new(0),
            cancels: AtomicUsize::new(0),
        }
    }

    /// A supported platform that already knows its voices.
    pub fn with_voices(voices: Vec<Voice>) -> Self {
        let platform = Self::new();
        *lock(&platform.voices) = voices;
        platform
    }

    /// A host without speech synthesis.
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    /// Replace the voice list and fire a change notification.
    pub fn set_voices(&self, voices: Vec<Voice>) {
        self.set_voices_silently(voices);
        self.notify_voices_changed();
    }

    /// Replace the voice list without notifying anyone.
    pub fn set_voices_silently(&self, voices: Vec<Voice>) {
        *lock(&self.voices) = voices;
    }

    /// Fire a change notification without touching the list.
    pub fn notify_voices_changed(&self) {
        if let Some(sender) = lock(&self.changed).as_ref() {
            sender.send_modify(|generation| *generation += 1);
        }
    }

    /// Stop delivering change notifications for good.
    pub fn close_notifications(&self) {
        lock(&self.changed).take();
    }

    /// Make every subsequent `speak` call fail.
    pub fn fail_speech(&self, fail: bool) {
        self.fail_speech.store(fail, Ordering::SeqCst);
    }

    /// Utterances accepted so far, oldest first.
    pub fn spoken(&self) -> Vec<Utterance> {
        lock(&self.events)
            .iter()
            .filter_map(|event| match event {
                ScriptedEvent::Spoke(utterance) => Some(utterance.clone()),
                ScriptedEvent::Cancelled => None,
            })
            .collect()
    }

    /// Speak and cancel requests in the order they arrived.
    pub fn events(&self) -> Vec<ScriptedEvent> {
        lock(&self.events).clone()
    }

    /// How many times the voice list was read.
    pub fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

impl SpeechPlatform for ScriptedPlatform {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn voices(&self) -> Vec<Voice> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        lock(&self.voices).clone()
    }

    fn voices_changed(&self) -> watch::Receiver<u64> {
        match lock(&self.changed).as_ref() {
            Some(sender) => sender.subscribe(),
            // sender dropped on return, so the receiver starts out closed
            None => watch::channel(0).1,
        }
    }

    fn speak(&self, utterance: &Utterance) -> Result<(), CatalogError> {
        if self.fail_speech.load(Ordering::SeqCst) {
            return Err(CatalogError::Platform("speech rejected".to_string()));
        }
        lock(&self.events).push(ScriptedEvent::Spoke(utterance.clone()));
        Ok(())
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        lock(&self.events).push(ScriptedEvent::Cancelled);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
