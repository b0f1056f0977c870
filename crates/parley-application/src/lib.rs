//! Application layer for the Parley client.
//!
//! Views that fetch from the remote API once per mount, the persona creation
//! form, the selection flow controller that composes them, and the chat entry
//! that hands an assembled session to the real-time engine.

pub mod api_context;
pub mod chat_host;
pub mod persona_creator;
pub mod persona_view;
pub mod resource;
pub mod scenario_view;
pub mod selection_flow;
pub mod voice_picker;

pub use api_context::ApiContext;
pub use chat_host::{ChatEntry, ChatSessionHost, RealtimeEngine};
pub use persona_creator::{PersonaCreator, PersonaForm};
pub use persona_view::{NO_PERSONAS_MESSAGE, PersonaListView};
pub use resource::{LoadState, Listing};
pub use scenario_view::{NO_SCENARIOS_MESSAGE, ScenarioListView};
pub use selection_flow::{FlowHandoff, Screen, SelectionFlow};
pub use voice_picker::VoicePicker;
