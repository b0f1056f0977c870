//! Session assembly and chat handoff.
//!
//! - `config`: `SessionConfiguration`, its policy defaults and the assembler
//! - `handoff`: the navigation value passed from the selection flow to chat

pub mod config;
pub mod handoff;

pub use config::{
    DEFAULT_INTERRUPTABLE, DEFAULT_MODEL_ID, DEFAULT_PARALLEL_LISTENING,
    DEFAULT_SPEECH_SYNTHESIS_ENABLED, DEFAULT_STREAM_TRANSCRIPT, InputPolicy, OutputPolicy,
    SessionAssembler, SessionConfiguration, SessionPolicy,
};
pub use handoff::{
    ChatDestination, DEFAULT_PLACEHOLDER_VOICE_ID, PLACEHOLDER_PERSONA_NAME, PersonaHandoff,
    placeholder_persona,
};
