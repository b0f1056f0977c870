//! Selection flow state machine.
//!
//! Tracks which sub-flow of the persona/scenario selection is active:
//! browsing personas, browsing the scenarios of a selected persona, or
//! creating a new persona. Exactly one sub-flow is active at a time.

mod state;

pub use state::{ScenarioChoice, SelectionAction, SelectionMode, SelectionState, Transition};
