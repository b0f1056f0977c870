use super::model::{Voice, VoiceSample};
use crate::error::Result;

/// Read-only access to the voices offered by the remote API.
#[async_trait::async_trait]
pub trait VoiceRepository: Send + Sync {
    /// Lists the available voices in API order.
    async fn list(&self) -> Result<Vec<Voice>>;

    /// Synthesizes `text` with the given voice.
    async fn generate_sample(&self, voice_id: &str, text: &str) -> Result<VoiceSample>;
}
