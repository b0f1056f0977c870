//! Voice domain module.
//!
//! Voices are read-only reference data used when assigning a voice to a new
//! persona.

mod model;
mod repository;

pub use model::{Voice, VoiceSample, SAMPLE_TEXT};
pub use repository::VoiceRepository;
