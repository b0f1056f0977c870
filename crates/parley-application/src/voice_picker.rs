//! Voice picker.
//!
//! Fetches the available voices once per mount and resolves a selected id to
//! the concrete `Voice` record. Persona creation only accepts resolved voices.

use std::sync::{Arc, Mutex, PoisonError};

use parley_core::voice::{SAMPLE_TEXT, Voice, VoiceRepository, VoiceSample};
use parley_core::{ParleyError, Result};

use crate::resource::{LoadState, Resource};

#[derive(Clone)]
pub struct VoicePicker {
    api: Arc<dyn VoiceRepository>,
    voices: Resource<Vec<Voice>>,
    previewing: Arc<Mutex<Option<String>>>,
}

impl VoicePicker {
    pub fn new(api: Arc<dyn VoiceRepository>) -> Self {
        Self {
            api,
            voices: Resource::new("voices"),
            previewing: Arc::new(Mutex::new(None)),
        }
    }

    pub fn mount(&self) {
        self.voices.mount();
    }

    pub fn unmount(&self) {
        self.voices.unmount();
    }

    /// Fetches the voice list for this mount. No automatic retry.
    pub async fn load(&self) -> bool {
        let api = Arc::clone(&self.api);
        self.voices.load_with(|| async move { api.list().await }).await
    }

    pub fn state(&self) -> LoadState<Vec<Voice>> {
        self.voices.state()
    }

    pub fn is_loading(&self) -> bool {
        self.voices.is_loading()
    }

    /// The last fetched voices; empty while loading or after a failure.
    pub fn voices(&self) -> Vec<Voice> {
        self.voices.state().ready().cloned().unwrap_or_default()
    }

    pub fn error(&self) -> Option<String> {
        self.voices.state().error().map(str::to_string)
    }

    /// Resolves `voice_id` against the last fetched list.
    pub fn resolve(&self, voice_id: &str) -> Result<Voice> {
        let voice = self
            .voices()
            .into_iter()
            .find(|voice| voice.id == voice_id);

        match voice {
            Some(voice) => {
                tracing::debug!(voice_id, voice_name = %voice.name, "[VoicePicker] Voice resolved");
                Ok(voice)
            }
            None => {
                tracing::warn!(voice_id, "[VoicePicker] Selected voice is not in the fetched list");
                Err(ParleyError::not_found("voice", voice_id))
            }
        }
    }

    /// Voice currently being previewed, if any.
    pub fn previewing(&self) -> Option<String> {
        self.previewing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Synthesizes the fixed sample sentence with a resolved voice.
    ///
    /// Only one preview runs at a time. The slot is released when the
    /// preview finishes or its future is dropped.
    pub async fn preview(&self, voice_id: &str) -> Result<VoiceSample> {
        let voice = self.resolve(voice_id)?;
        let _slot = PreviewSlot::claim(&self.previewing, &voice.id)?;

        tracing::info!(voice_id = %voice.id, "[VoicePicker] Preview requested");
        let result = self.api.generate_sample(&voice.id, SAMPLE_TEXT).await;

        if let Err(e) = &result {
            tracing::warn!(voice_id = %voice.id, error = %e, "[VoicePicker] Preview failed");
        }
        result
    }
}

/// Holds the single preview slot; frees it on drop.
struct PreviewSlot<'a> {
    previewing: &'a Mutex<Option<String>>,
}

impl<'a> PreviewSlot<'a> {
    fn claim(previewing: &'a Mutex<Option<String>>, voice_id: &str) -> Result<Self> {
        let mut current = previewing.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(current) = current.as_ref() {
            return Err(ParleyError::validation(format!(
                "A preview of voice '{}' is already playing",
                current
            )));
        }
        *current = Some(voice_id.to_string());
        Ok(Self { previewing })
    }
}

impl Drop for PreviewSlot<'_> {
    fn drop(&mut self) {
        *self.previewing.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct MockVoiceRepository {
        fail: bool,
        // When set, sample generation signals `entered` and waits for `release`.
        gate: Option<(Arc<Notify>, Arc<Notify>)>,
    }

    #[async_trait]
    impl VoiceRepository for MockVoiceRepository {
        async fn list(&self) -> Result<Vec<Voice>> {
            if self.fail {
                return Err(ParleyError::network("connection refused"));
            }
            Ok(vec![Voice {
                id: "v1".into(),
                name: "Warm".into(),
            }])
        }

        async fn generate_sample(&self, voice_id: &str, text: &str) -> Result<VoiceSample> {
            assert_eq!(text, SAMPLE_TEXT);
            if let Some((entered, release)) = &self.gate {
                entered.notify_one();
                release.notified().await;
            }
            Ok(VoiceSample {
                voice_id: voice_id.to_string(),
                content_type: "audio/wav".into(),
                audio: vec![1, 2, 3],
            })
        }
    }

    async fn loaded(repo: MockVoiceRepository) -> VoicePicker {
        let picker = VoicePicker::new(Arc::new(repo));
        picker.mount();
        picker.load().await;
        picker
    }

    fn gated() -> (MockVoiceRepository, Arc<Notify>, Arc<Notify>) {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let repo = MockVoiceRepository {
            fail: false,
            gate: Some((entered.clone(), release.clone())),
        };
        (repo, entered, release)
    }

    #[tokio::test]
    async fn test_failed_fetch_reports_empty_list_and_error() {
        let picker = loaded(MockVoiceRepository {
            fail: true,
            ..Default::default()
        })
        .await;
        assert!(picker.voices().is_empty());
        assert_eq!(
            picker.error().as_deref(),
            Some("Network error: connection refused")
        );
        assert!(picker.resolve("v1").unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_resolve_returns_fetched_voice() {
        let picker = loaded(MockVoiceRepository::default()).await;
        let voice = picker.resolve("v1").unwrap();
        assert_eq!(voice.name, "Warm");
    }

    #[tokio::test]
    async fn test_second_preview_is_rejected_while_one_runs() {
        let (repo, entered, release) = gated();
        let picker = loaded(repo).await;

        let running = picker.clone();
        let first = tokio::spawn(async move { running.preview("v1").await });
        entered.notified().await;
        assert_eq!(picker.previewing().as_deref(), Some("v1"));

        let err = picker.preview("v1").await.unwrap_err();
        assert!(err.is_validation());

        release.notify_one();
        let sample = first.await.unwrap().unwrap();
        assert_eq!(sample.file_extension(), "wav");
        assert!(picker.previewing().is_none());

        // The slot is free again once the first preview finished.
        release.notify_one();
        assert!(picker.preview("v1").await.is_ok());
    }

    #[tokio::test]
    async fn test_cancelled_preview_releases_slot() {
        let (repo, _entered, release) = gated();
        let picker = loaded(repo).await;

        let timed_out =
            tokio::time::timeout(Duration::from_millis(20), picker.preview("v1")).await;
        assert!(timed_out.is_err());
        assert!(picker.previewing().is_none());

        release.notify_one();
        let sample = picker.preview("v1").await.unwrap();
        assert_eq!(sample.voice_id, "v1");
    }
}
