//! Selection flow controller.
//!
//! Composes the persona list, the scenario list and the creation form around
//! `SelectionState`. Exactly one view is mounted at a time; every transition
//! unmounts the view being left before mounting the next, so late results
//! for the old view are dropped.

use std::sync::Arc;

use parley_core::persona::Persona;
use parley_core::selection::{
    ScenarioChoice, SelectionAction, SelectionMode, SelectionState, Transition,
};
use parley_core::session::ChatDestination;
use parley_core::{ParleyError, Result};

use crate::api_context::ApiContext;
use crate::persona_creator::PersonaCreator;
use crate::persona_view::PersonaListView;
use crate::scenario_view::ScenarioListView;
use crate::voice_picker::VoicePicker;

/// Which screen the flow is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Personas,
    Scenarios,
    Creating,
    /// A scenario was chosen and the flow handed off to chat.
    Finished,
}

/// Emitted when the user picks a scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowHandoff {
    pub destination: ChatDestination,
    /// The persona selected in the flow, carried through to chat.
    pub persona: Persona,
}

pub struct SelectionFlow {
    context: Arc<ApiContext>,
    state: SelectionState,
    persona_list: PersonaListView,
    scenario_list: Option<ScenarioListView>,
    creator: Option<PersonaCreator>,
    selected_persona: Option<Persona>,
    finished: bool,
}

impl SelectionFlow {
    /// Starts the flow on the persona list, already mounted.
    pub fn new(context: Arc<ApiContext>) -> Self {
        let persona_list = PersonaListView::new(context.personas());
        persona_list.mount();
        tracing::info!("[SelectionFlow] Entered persona list");

        Self {
            context,
            state: SelectionState::new(),
            persona_list,
            scenario_list: None,
            creator: None,
            selected_persona: None,
            finished: false,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn screen(&self) -> Screen {
        if self.finished {
            Screen::Finished
        } else if self.state.mode() == SelectionMode::Creating {
            Screen::Creating
        } else if self.state.is_choosing_scenario() {
            Screen::Scenarios
        } else {
            Screen::Personas
        }
    }

    pub fn persona_list(&self) -> &PersonaListView {
        &self.persona_list
    }

    pub fn scenario_list(&self) -> Option<&ScenarioListView> {
        self.scenario_list.as_ref()
    }

    pub fn creator(&self) -> Option<&PersonaCreator> {
        self.creator.as_ref()
    }

    pub fn creator_mut(&mut self) -> Option<&mut PersonaCreator> {
        self.creator.as_mut()
    }

    pub fn selected_persona(&self) -> Option<&Persona> {
        self.selected_persona.as_ref()
    }

    /// Runs the fetch of whichever view is mounted.
    pub async fn load_current(&self) -> bool {
        match self.screen() {
            Screen::Personas => self.persona_list.load().await,
            Screen::Scenarios => match &self.scenario_list {
                Some(view) => view.load().await,
                None => false,
            },
            Screen::Creating => match &self.creator {
                Some(creator) => creator.load().await,
                None => false,
            },
            Screen::Finished => false,
        }
    }

    /// Selects a persona from the loaded list and opens its scenarios.
    pub fn select_persona(&mut self, persona_id: &str) -> Result<()> {
        self.ensure_active()?;
        if self.state.mode() == SelectionMode::Browsing && !self.state.is_choosing_scenario() {
            let persona = self
                .persona_list
                .find(persona_id)
                .ok_or_else(|| ParleyError::not_found("persona", persona_id))?;
            self.apply(SelectionAction::SelectPersona(persona_id.to_string()))?;

            self.persona_list.unmount();
            let view = ScenarioListView::new(self.context.scenarios(), persona_id);
            view.mount();
            self.scenario_list = Some(view);
            self.selected_persona = Some(persona);
            return Ok(());
        }
        // Let the state machine produce the rejection.
        self.apply(SelectionAction::SelectPersona(persona_id.to_string()))
            .map(|_| ())
    }

    /// Leaves the scenario list or the creation form for the persona list.
    pub fn back(&mut self) -> Result<()> {
        self.ensure_active()?;
        self.apply(SelectionAction::Back)?;
        self.return_to_personas();
        Ok(())
    }

    /// Opens the creation form, clearing any selection.
    pub fn start_creating(&mut self) -> Result<()> {
        self.ensure_active()?;
        self.apply(SelectionAction::StartCreating)?;

        self.persona_list.unmount();
        if let Some(view) = self.scenario_list.take() {
            view.unmount();
        }
        self.selected_persona = None;

        let creator = PersonaCreator::new(
            self.context.personas(),
            VoicePicker::new(self.context.voices()),
        );
        creator.mount();
        self.creator = Some(creator);
        Ok(())
    }

    /// Submits the creation form.
    ///
    /// On success the flow returns to the persona list (re-fetched, with no
    /// selection). On failure it stays on the form with its values intact.
    pub async fn submit_creation(&mut self) -> Result<Persona> {
        self.ensure_active()?;
        let creator = self.creator.as_mut().ok_or_else(|| {
            ParleyError::invalid_transition("submit_creation", self.state.to_string())
        })?;

        let persona = creator.submit().await?;
        self.apply(SelectionAction::FinishCreating)?;
        self.return_to_personas();
        Ok(persona)
    }

    /// Picks a scenario from the loaded list, ending the flow.
    pub fn select_scenario(&mut self, scenario_id: &str) -> Result<FlowHandoff> {
        self.ensure_active()?;
        if let Some(view) = &self.scenario_list
            && !view.contains(scenario_id)
        {
            return Err(ParleyError::not_found("scenario", scenario_id));
        }

        let choice = match self.apply(SelectionAction::SelectScenario(scenario_id.to_string()))? {
            Transition::Handoff(choice) => choice,
            Transition::Updated => {
                return Err(ParleyError::internal(
                    "Scenario selection did not produce a handoff",
                ));
            }
        };
        let ScenarioChoice {
            persona_id,
            scenario_id,
        } = choice;

        let persona = self
            .selected_persona
            .clone()
            .ok_or_else(|| ParleyError::not_found("persona", persona_id.clone()))?;

        if let Some(view) = self.scenario_list.take() {
            view.unmount();
        }
        self.finished = true;

        let destination = ChatDestination {
            persona_id,
            scenario_id,
            voice_id: Some(persona.voice_id.clone()).filter(|v| !v.is_empty()),
        };
        tracing::info!(
            destination = %destination.to_path(),
            "[SelectionFlow] Handing off to chat"
        );
        Ok(FlowHandoff {
            destination,
            persona,
        })
    }

    fn ensure_active(&self) -> Result<()> {
        if self.finished {
            return Err(ParleyError::invalid_transition(
                "action",
                "handed off to chat",
            ));
        }
        Ok(())
    }

    fn apply(&mut self, action: SelectionAction) -> Result<Transition> {
        let name = action.name();
        let before = self.state.to_string();
        match self.state.apply(action) {
            Ok(transition) => {
                tracing::info!(
                    action = name,
                    from = %before,
                    to = %self.state,
                    "[SelectionFlow] Transition"
                );
                Ok(transition)
            }
            Err(e) => {
                tracing::warn!(action = name, state = %before, error = %e, "[SelectionFlow] Rejected");
                Err(e)
            }
        }
    }

    fn return_to_personas(&mut self) {
        if let Some(view) = self.scenario_list.take() {
            view.unmount();
        }
        if let Some(creator) = self.creator.take() {
            creator.unmount();
        }
        self.selected_persona = None;
        self.persona_list.mount();
    }
}

impl Drop for SelectionFlow {
    fn drop(&mut self) {
        self.persona_list.unmount();
        if let Some(view) = &self.scenario_list {
            view.unmount();
        }
        if let Some(creator) = &self.creator {
            creator.unmount();
        }
    }
}
