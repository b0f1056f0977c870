use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ParleyError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    #[default]
    Browsing,
    Creating,
}

/// A user action driving the selection flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionAction {
    SelectPersona(String),
    SelectScenario(String),
    Back,
    StartCreating,
    FinishCreating,
}

impl SelectionAction {
    pub fn name(&self) -> &'static str {
        match self {
            SelectionAction::SelectPersona(_) => "select_persona",
            SelectionAction::SelectScenario(_) => "select_scenario",
            SelectionAction::Back => "back",
            SelectionAction::StartCreating => "start_creating",
            SelectionAction::FinishCreating => "finish_creating",
        }
    }
}

/// The persona/scenario pair emitted when a scenario is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioChoice {
    pub persona_id: String,
    pub scenario_id: String,
}

/// Outcome of an accepted action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The state changed in place.
    Updated,
    /// A scenario was chosen; the flow ends in a handoff to chat.
    Handoff(ScenarioChoice),
}

/// Client-local selection state.
///
/// Invariant: `selected_scenario_id` is only ever set while
/// `selected_persona_id` is set, and both are cleared in `Creating` mode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionState {
    mode: SelectionMode,
    selected_persona_id: Option<String>,
    selected_scenario_id: Option<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn selected_persona_id(&self) -> Option<&str> {
        self.selected_persona_id.as_deref()
    }

    pub fn selected_scenario_id(&self) -> Option<&str> {
        self.selected_scenario_id.as_deref()
    }

    /// True while the scenario list for a persona is showing.
    pub fn is_choosing_scenario(&self) -> bool {
        self.mode == SelectionMode::Browsing && self.selected_persona_id.is_some()
    }

    /// Applies `action`, returning the transition or rejecting the action.
    ///
    /// A rejected action leaves the state untouched.
    pub fn apply(&mut self, action: SelectionAction) -> Result<Transition> {
        let name = action.name();
        match (self.mode, action) {
            (SelectionMode::Browsing, SelectionAction::SelectPersona(id)) => {
                if id.trim().is_empty() {
                    return Err(ParleyError::validation("Persona id cannot be empty"));
                }
                if self.selected_persona_id.is_some() {
                    return Err(self.reject(name));
                }
                self.selected_persona_id = Some(id);
                self.selected_scenario_id = None;
                Ok(Transition::Updated)
            }
            (SelectionMode::Browsing, SelectionAction::SelectScenario(scenario_id)) => {
                let Some(persona_id) = self.selected_persona_id.clone() else {
                    return Err(self.reject(name));
                };
                if scenario_id.trim().is_empty() {
                    return Err(ParleyError::validation("Scenario id cannot be empty"));
                }
                // Record of the emitted pair; no later transition reads it.
                self.selected_scenario_id = Some(scenario_id.clone());
                Ok(Transition::Handoff(ScenarioChoice {
                    persona_id,
                    scenario_id,
                }))
            }
            (SelectionMode::Browsing, SelectionAction::Back) => {
                if self.selected_persona_id.is_none() {
                    return Err(self.reject(name));
                }
                self.clear();
                Ok(Transition::Updated)
            }
            (SelectionMode::Browsing, SelectionAction::StartCreating) => {
                self.mode = SelectionMode::Creating;
                self.clear();
                Ok(Transition::Updated)
            }
            (SelectionMode::Creating, SelectionAction::FinishCreating)
            | (SelectionMode::Creating, SelectionAction::Back) => {
                self.mode = SelectionMode::Browsing;
                self.clear();
                Ok(Transition::Updated)
            }
            _ => Err(self.reject(name)),
        }
    }

    fn clear(&mut self) {
        self.selected_persona_id = None;
        self.selected_scenario_id = None;
    }

    fn reject(&self, action: &'static str) -> ParleyError {
        ParleyError::invalid_transition(action, self.to_string())
    }
}

impl fmt::Display for SelectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.mode, &self.selected_persona_id) {
            (SelectionMode::Creating, _) => write!(f, "creating"),
            (SelectionMode::Browsing, None) => write!(f, "browsing personas"),
            (SelectionMode::Browsing, Some(id)) => {
                write!(f, "browsing scenarios for persona '{}'", id)
            }
        }
    }
}
