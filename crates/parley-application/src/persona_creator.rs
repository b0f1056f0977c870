//! Persona creation form.
//!
//! The form only builds a `CreatePersonaRequest` once the selected voice id
//! resolves to a voice from the picker's last fetch. Invalid drafts never
//! reach the API, and a failed submission keeps everything the user entered.

use std::sync::Arc;

use parley_core::persona::{CreatePersonaRequest, Gender, Persona, PersonaRepository};
use parley_core::{ParleyError, Result};

use crate::voice_picker::VoicePicker;

/// Values entered into the creation form.
///
/// `description` is `None` until the user fills the field; an explicitly
/// empty description is `Some(String::new())`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaForm {
    pub name: String,
    pub description: Option<String>,
    pub gender: Gender,
    pub voice_id: Option<String>,
}

impl Default for PersonaForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            gender: Gender::Male,
            voice_id: None,
        }
    }
}

pub struct PersonaCreator {
    api: Arc<dyn PersonaRepository>,
    voice_picker: VoicePicker,
    form: PersonaForm,
    last_error: Option<String>,
}

impl PersonaCreator {
    pub fn new(api: Arc<dyn PersonaRepository>, voice_picker: VoicePicker) -> Self {
        Self {
            api,
            voice_picker,
            form: PersonaForm::default(),
            last_error: None,
        }
    }

    pub fn mount(&self) {
        self.voice_picker.mount();
    }

    pub fn unmount(&self) {
        self.voice_picker.unmount();
    }

    /// Fetches the voices the form offers.
    pub async fn load(&self) -> bool {
        self.voice_picker.load().await
    }

    pub fn voice_picker(&self) -> &VoicePicker {
        &self.voice_picker
    }

    pub fn form(&self) -> &PersonaForm {
        &self.form
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.form.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.form.description = Some(description.into());
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.form.gender = gender;
    }

    pub fn select_voice(&mut self, voice_id: impl Into<String>) {
        self.form.voice_id = Some(voice_id.into());
    }

    /// Validates the form and builds the request with the resolved voice.
    pub fn build_request(&self) -> Result<CreatePersonaRequest> {
        if self.form.name.trim().is_empty() {
            return Err(ParleyError::validation(
                "Name is required and cannot be empty",
            ));
        }
        let Some(description) = self.form.description.clone() else {
            return Err(ParleyError::validation("Description is required"));
        };
        let Some(voice_id) = self.form.voice_id.as_deref() else {
            return Err(ParleyError::validation("A voice must be selected"));
        };
        let voice = self.voice_picker.resolve(voice_id).map_err(|_| {
            ParleyError::validation(format!(
                "Selected voice '{}' is not one of the available voices",
                voice_id
            ))
        })?;

        let request = CreatePersonaRequest {
            name: self.form.name.clone(),
            description,
            gender: self.form.gender,
            voice_id: voice.id,
        };
        request.validate()?;
        Ok(request)
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.voice_picker.is_loading() && self.build_request().is_ok()
    }

    /// Submits the form.
    ///
    /// On success the form is reset and the created persona returned. On
    /// failure the form is left untouched and the error recorded.
    pub async fn submit(&mut self) -> Result<Persona> {
        let request = match self.build_request() {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "[PersonaCreator] Submission blocked");
                self.last_error = Some(e.to_string());
                return Err(e);
            }
        };

        tracing::info!(name = %request.name, voice_id = %request.voice_id, "[PersonaCreator] Request issued");
        match self.api.create(&request).await {
            Ok(persona) => {
                tracing::info!(persona_id = %persona.id, "[PersonaCreator] Request resolved");
                self.form = PersonaForm::default();
                self.last_error = None;
                Ok(persona)
            }
            Err(e) => {
                tracing::warn!(error = %e, "[PersonaCreator] Request failed");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}
