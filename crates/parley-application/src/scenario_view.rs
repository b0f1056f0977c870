//! Scenario list view for one persona.

use std::sync::Arc;

use parley_core::scenario::{Scenario, ScenarioRepository};

use crate::resource::{LoadState, Listing, Resource};

pub const NO_SCENARIOS_MESSAGE: &str = "No scenarios available";

#[derive(Clone)]
pub struct ScenarioListView {
    api: Arc<dyn ScenarioRepository>,
    persona_id: String,
    scenarios: Resource<Vec<Scenario>>,
}

impl ScenarioListView {
    pub fn new(api: Arc<dyn ScenarioRepository>, persona_id: impl Into<String>) -> Self {
        Self {
            api,
            persona_id: persona_id.into(),
            scenarios: Resource::new("scenarios"),
        }
    }

    pub fn persona_id(&self) -> &str {
        &self.persona_id
    }

    pub fn mount(&self) {
        self.scenarios.mount();
    }

    pub fn unmount(&self) {
        self.scenarios.unmount();
    }

    pub async fn load(&self) -> bool {
        let api = Arc::clone(&self.api);
        let persona_id = self.persona_id.clone();
        self.scenarios
            .load_with(|| async move { api.list(&persona_id).await })
            .await
    }

    pub fn state(&self) -> LoadState<Vec<Scenario>> {
        self.scenarios.state()
    }

    pub fn render(&self) -> Listing<Scenario> {
        Listing::from_state(&self.scenarios.state(), NO_SCENARIOS_MESSAGE)
    }

    pub fn contains(&self, scenario_id: &str) -> bool {
        self.scenarios
            .state()
            .ready()
            .is_some_and(|scenarios| scenarios.iter().any(|s| s.id == scenario_id))
    }
}
