//! Persona list view.

use std::sync::Arc;

use parley_core::persona::{Persona, PersonaRepository};

use crate::resource::{LoadState, Listing, Resource};

pub const NO_PERSONAS_MESSAGE: &str = "No personas found";

/// Lists personas in the order the API returns them.
#[derive(Clone)]
pub struct PersonaListView {
    api: Arc<dyn PersonaRepository>,
    personas: Resource<Vec<Persona>>,
}

impl PersonaListView {
    pub fn new(api: Arc<dyn PersonaRepository>) -> Self {
        Self {
            api,
            personas: Resource::new("personas"),
        }
    }

    pub fn mount(&self) {
        self.personas.mount();
    }

    pub fn unmount(&self) {
        self.personas.unmount();
    }

    pub fn is_mounted(&self) -> bool {
        self.personas.is_mounted()
    }

    pub async fn load(&self) -> bool {
        let api = Arc::clone(&self.api);
        self.personas
            .load_with(|| async move { api.list().await })
            .await
    }

    pub fn state(&self) -> LoadState<Vec<Persona>> {
        self.personas.state()
    }

    pub fn render(&self) -> Listing<Persona> {
        Listing::from_state(&self.personas.state(), NO_PERSONAS_MESSAGE)
    }

    /// Looks up a persona in the loaded list.
    pub fn find(&self, persona_id: &str) -> Option<Persona> {
        self.personas
            .state()
            .ready()
            .and_then(|personas| personas.iter().find(|p| p.id == persona_id).cloned())
    }
}
