//! Domain layer for the Parley client.
//!
//! Holds the persona, voice and scenario models, the repository traits for the
//! remote API, the selection state machine and the session assembler.

pub mod config;
pub mod error;
pub mod persona;
pub mod scenario;
pub mod selection;
pub mod session;
pub mod token;
pub mod voice;

// Re-export common error type
pub use error::{ParleyError, Result};
