use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::MissedTickBehavior;

use crate::error::CatalogError;
use crate::voice::Voice;
use crate::SpeechPlatform;

use super::{Catalog, CatalogSource};

/// Parameters for the voice discovery wait.
///
/// Loads from JSON such as `{"poll_interval_ms": 250, "max_attempts": 20}`;
/// missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryParams {
    /// Delay between two reads of the platform voice list. Default 100 ms.
    #[serde(rename = "poll_interval_ms", with = "millis")]
    pub poll_interval: Duration,
    /// Number of reads before giving up and using the fallback languages.
    /// Default 50. Zero behaves like one.
    pub max_attempts: u32,
    /// Issue a silent utterance before waiting. Some platforms only populate
    /// their list after the first speech request.
    pub nudge: bool,
}

impl Default for DiscoveryParams {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            max_attempts: 50,
            nudge: true,
        }
    }
}

impl DiscoveryParams {
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(json)
            .map_err(|e| CatalogError::Config(format!("Failed to parse JSON: {e}")))
    }

    /// Load parameters from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Upper bound on how long discovery can wait.
    pub fn max_wait(&self) -> Duration {
        self.interval() * (self.attempts() - 1)
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    fn interval(&self) -> Duration {
        // tokio intervals panic on a zero period
        self.poll_interval.max(Duration::from_millis(1))
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Fail fast when the platform has no speech synthesis at all.
pub fn ensure_supported<P: SpeechPlatform + ?Sized>(platform: &P) -> Result<(), CatalogError> {
    if platform.is_supported() {
        Ok(())
    } else {
        Err(CatalogError::UnsupportedEnvironment)
    }
}

/// Waits for a platform's voice list and turns it into a [`Catalog`].
///
/// The capability check runs once, in the constructor. After that,
/// discovery itself cannot fail: an empty list after the bounded wait yields
/// [`Catalog::fallback`].
pub struct Discovery<P> {
    platform: P,
    params: DiscoveryParams,
}

impl<P: SpeechPlatform> Discovery<P> {
    pub fn new(platform: P) -> Result<Self, CatalogError> {
        Self::with_params(platform, DiscoveryParams::default())
    }

    pub fn with_params(platform: P, params: DiscoveryParams) -> Result<Self, CatalogError> {
        ensure_supported(&platform)?;
        Ok(Self { platform, params })
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn params(&self) -> &DiscoveryParams {
        &self.params
    }

    /// Wait for the platform to report voices.
    ///
    /// The list is read immediately and then once per poll interval. A
    /// "voices changed" notification also triggers a read. Whichever read
    /// first sees a non-empty list produces the catalog; later signals are
    /// never observed because the loop has already returned.
    pub async fn discover(&self) -> Catalog {
        let mut changed = self.platform.voices_changed();
        let mut listening = true;

        if self.params.nudge {
            if let Err(e) = self.platform.nudge() {
                log::debug!("Could not nudge voice loading: {e}");
            }
        }

        let max_attempts = self.params.attempts();
        let mut ticker = tokio::time::interval(self.params.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut attempts = 0u32;

        loop {
            tokio::select! {
                biased;
                _ = ticker.tick() => {
                    attempts += 1;
                    let voices = self.platform.voices();
                    log::debug!("Voice poll {attempts}/{max_attempts}: {} voices", voices.len());
                    if !voices.is_empty() {
                        return ready(voices, CatalogSource::Polled);
                    }
                    if attempts >= max_attempts {
                        log::warn!("No voices after {attempts} attempts, using fallback languages");
                        return Catalog::fallback();
                    }
                }
                result = changed.changed(), if listening => {
                    match result {
                        Ok(()) => {
                            let voices = self.platform.voices();
                            if !voices.is_empty() {
                                return ready(voices, CatalogSource::Notified);
                            }
                            log::debug!("Voices changed but the list is still empty");
                        }
                        Err(_) => {
                            log::debug!("Voice change notifications closed, polling only");
                            listening = false;
                        }
                    }
                }
            }
        }
    }

    /// Recompute `catalog` after the platform reported a changed list.
    ///
    /// Returns false and leaves the catalog alone if the list is empty.
    pub fn refresh(&self, catalog: &mut Catalog) -> bool {
        let refreshed = catalog.refresh(self.platform.voices());
        if refreshed {
            log::info!(
                "Voice catalog refreshed: {} voices in {} languages",
                catalog.voices().len(),
                catalog.groups().len()
            );
        }
        refreshed
    }
}

fn ready(voices: Vec<Voice>, source: CatalogSource) -> Catalog {
    let catalog = Catalog::build(voices, source);
    log::info!(
        "Voice catalog ready ({source:?}): {} voices in {} languages",
        catalog.voices().len(),
        catalog.groups().len()
    );
    catalog
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::time::{sleep, Instant};

    use super::*;
    use crate::platforms::scripted::ScriptedPlatform;

    fn voices() -> Vec<Voice> {
        vec![
            Voice::new("Sam", "en-US", true),
            Voice::new("Ava Premium", "en-US", false),
        ]
    }

    #[test]
    fn unsupported_platform_is_rejected_up_front() {
        let platform = ScriptedPlatform::unsupported();
        assert!(matches!(
            Discovery::new(platform),
            Err(CatalogError::UnsupportedEnvironment)
        ));
    }

    #[test]
    fn params_from_json() {
        let params =
            DiscoveryParams::from_json_str(r#"{"poll_interval_ms": 250, "nudge": false}"#).unwrap();
        assert_eq!(params.poll_interval, Duration::from_millis(250));
        assert_eq!(params.max_attempts, 50);
        assert!(!params.nudge);

        assert_eq!(
            DiscoveryParams::default().max_wait(),
            Duration::from_millis(4900)
        );
        assert!(matches!(
            DiscoveryParams::from_json_str("{"),
            Err(CatalogError::Config(_))
        ));
    }

    #[test]
    fn params_load_from_file() {
        let path = std::env::temp_dir().join("voiceforge-discovery-params.json");
        std::fs::write(&path, r#"{"max_attempts": 3}"#).unwrap();
        let params = DiscoveryParams::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(params.max_attempts, 3);
        assert_eq!(params.poll_interval, Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_voices_resolve_on_first_poll() {
        let platform = Arc::new(ScriptedPlatform::with_voices(voices()));
        let discovery = Discovery::new(platform.clone()).unwrap();

        let start = Instant::now();
        let catalog = discovery.discover().await;

        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(catalog.source(), Some(CatalogSource::Polled));
        assert_eq!(catalog.voices().len(), 2);
        assert_eq!(platform.poll_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_list_falls_back_after_bounded_wait() {
        let platform = Arc::new(ScriptedPlatform::new());
        let discovery = Discovery::new(platform.clone()).unwrap();

        let start = Instant::now();
        let catalog = discovery.discover().await;

        assert!(catalog.is_fallback());
        assert!(catalog.is_ready());
        assert_eq!(catalog.groups().len(), 10);
        assert_eq!(platform.poll_count(), 50);
        assert_eq!(start.elapsed(), Duration::from_millis(4900));
    }

    #[tokio::test(start_paused = true)]
    async fn voices_appearing_later_are_polled() {
        let platform = Arc::new(ScriptedPlatform::new());
        let discovery = Discovery::new(platform.clone()).unwrap();

        let late = platform.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(350)).await;
            late.set_voices_silently(voices());
        });

        let start = Instant::now();
        let catalog = discovery.discover().await;

        assert_eq!(catalog.source(), Some(CatalogSource::Polled));
        assert_eq!(start.elapsed(), Duration::from_millis(400));
        assert_eq!(platform.poll_count(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn notification_short_circuits_the_wait() {
        let platform = Arc::new(ScriptedPlatform::new());
        let discovery = Discovery::new(platform.clone()).unwrap();

        let late = platform.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(250)).await;
            late.set_voices(voices());
        });

        let start = Instant::now();
        let catalog = discovery.discover().await;

        assert_eq!(catalog.source(), Some(CatalogSource::Notified));
        assert_eq!(start.elapsed(), Duration::from_millis(250));
        assert_eq!(catalog.default_language(), Some("en-US"));
    }

    #[tokio::test(start_paused = true)]
    async fn notification_with_empty_list_keeps_polling() {
        let platform = Arc::new(ScriptedPlatform::new());
        let params = DiscoveryParams {
            max_attempts: 5,
            ..Default::default()
        };
        let discovery = Discovery::with_params(platform.clone(), params).unwrap();

        let noisy = platform.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(150)).await;
            noisy.notify_voices_changed();
        });

        let catalog = discovery.discover().await;
        assert!(catalog.is_fallback());
        assert_eq!(platform.poll_count(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_notifications_fall_back_to_polling() {
        let platform = Arc::new(ScriptedPlatform::new());
        platform.close_notifications();
        let params = DiscoveryParams {
            max_attempts: 3,
            ..Default::default()
        };
        let discovery = Discovery::with_params(platform.clone(), params).unwrap();

        let start = Instant::now();
        let catalog = discovery.discover().await;

        assert!(catalog.is_fallback());
        assert_eq!(start.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn discovery_nudges_the_platform_once() {
        let platform = Arc::new(ScriptedPlatform::with_voices(voices()));
        Discovery::new(platform.clone()).unwrap().discover().await;

        let spoken = platform.spoken();
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].volume, 0.0);
        assert!(spoken[0].text.is_empty());
        assert_eq!(platform.cancel_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_nudge_does_not_stop_discovery() {
        let platform = Arc::new(ScriptedPlatform::with_voices(voices()));
        platform.fail_speech(true);
        let catalog = Discovery::new(platform.clone()).unwrap().discover().await;
        assert_eq!(catalog.source(), Some(CatalogSource::Polled));
    }

    #[tokio::test(start_paused = true)]
    async fn nudge_can_be_disabled() {
        let platform = Arc::new(ScriptedPlatform::with_voices(voices()));
        let params = DiscoveryParams {
            nudge: false,
            ..Default::default()
        };
        Discovery::with_params(platform.clone(), params)
            .unwrap()
            .discover()
            .await;
        assert!(platform.spoken().is_empty());
        assert_eq!(platform.cancel_count(), 0);
    }

    #[test]
    fn refresh_reads_the_platform_again() {
        let platform = Arc::new(ScriptedPlatform::new());
        let discovery = Discovery::new(platform.clone()).unwrap();
        let mut catalog = Catalog::fallback();

        assert!(!discovery.refresh(&mut catalog));
        assert!(catalog.is_fallback());

        platform.set_voices(vec![Voice::new("Anna", "de-DE", true)]);
        assert!(discovery.refresh(&mut catalog));
        assert_eq!(catalog.default_language(), Some("de-DE"));
    }
}
