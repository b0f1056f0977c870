use serde::{Deserialize, Serialize};

/// Text spoken when previewing a voice.
pub const SAMPLE_TEXT: &str = "Hello, this is a sample of my voice. How do I sound?";

/// A speech-synthesis voice offered by the remote API.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub id: String,
    pub name: String,
}

/// Synthesized audio returned when previewing a voice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceSample {
    pub voice_id: String,
    /// Content type reported by the API (e.g. `audio/mpeg`)
    pub content_type: String,
    pub audio: Vec<u8>,
}

impl VoiceSample {
    /// File extension matching the content type, for saving the sample.
    pub fn file_extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
            "audio/ogg" => "ogg",
            _ => "mp3",
        }
    }
}
