//! Navigation handoff from the selection flow to the chat destination.

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{ParleyError, Result};
use crate::persona::{Gender, Persona};

/// Display name of the stand-in persona used by the legacy handoff.
pub const PLACEHOLDER_PERSONA_NAME: &str = "AI Assistant";
/// Voice used by the stand-in persona when the destination carries none.
pub const DEFAULT_PLACEHOLDER_VOICE_ID: &str = "0b6c25ce-cc8d-4558-844e-4f61c00cc264";

const CHAT_PATH: &str = "/chat";
const BASE: &str = "parley://app";

/// How chat entry obtains the Persona it hands to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaHandoff {
    /// Pass the Persona selected in the flow through unchanged.
    #[default]
    CarrySelected,
    /// Rebuild a stand-in Persona from the destination parameters only.
    Placeholder,
}

/// Builds the legacy stand-in Persona for direct navigation.
pub fn placeholder_persona(persona_id: &str, voice_id: Option<&str>) -> Persona {
    Persona {
        id: persona_id.to_string(),
        name: PLACEHOLDER_PERSONA_NAME.to_string(),
        description: String::new(),
        gender: Gender::Female,
        voice_id: voice_id.unwrap_or(DEFAULT_PLACEHOLDER_VOICE_ID).to_string(),
    }
}

/// Parameters of the chat destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatDestination {
    pub persona_id: String,
    pub scenario_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
}

impl ChatDestination {
    /// Validates raw navigation parameters.
    ///
    /// Missing or blank ids produce `MissingParameters` naming each one.
    pub fn from_params(
        persona_id: Option<&str>,
        scenario_id: Option<&str>,
        voice_id: Option<&str>,
    ) -> Result<Self> {
        let persona_id = non_blank(persona_id);
        let scenario_id = non_blank(scenario_id);

        match (persona_id, scenario_id) {
            (Some(persona_id), Some(scenario_id)) => Ok(Self {
                persona_id: persona_id.to_string(),
                scenario_id: scenario_id.to_string(),
                voice_id: non_blank(voice_id).map(str::to_string),
            }),
            (p, s) => {
                let mut missing = Vec::new();
                if p.is_none() {
                    missing.push("personaId");
                }
                if s.is_none() {
                    missing.push("scenarioId");
                }
                Err(ParleyError::MissingParameters(missing))
            }
        }
    }

    /// Parses a `/chat?personaId=..&scenarioId=..&voiceId=..` path.
    pub fn parse_path(path: &str) -> Result<Self> {
        let url = Url::parse(BASE)
            .and_then(|base| base.join(path))
            .map_err(|e| ParleyError::validation(format!("Invalid chat path '{}': {}", path, e)))?;

        if url.path() != CHAT_PATH {
            return Err(ParleyError::validation(format!(
                "Not a chat destination: {}",
                url.path()
            )));
        }

        let (mut persona_id, mut scenario_id, mut voice_id) = (None, None, None);
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "personaId" => persona_id = Some(value.into_owned()),
                "scenarioId" => scenario_id = Some(value.into_owned()),
                "voiceId" => voice_id = Some(value.into_owned()),
                _ => {}
            }
        }

        Self::from_params(
            persona_id.as_deref(),
            scenario_id.as_deref(),
            voice_id.as_deref(),
        )
    }

    /// Renders the destination as a percent-encoded path with query.
    pub fn to_path(&self) -> String {
        let mut url = match Url::parse(BASE).and_then(|base| base.join(CHAT_PATH)) {
            Ok(url) => url,
            Err(_) => return CHAT_PATH.to_string(),
        };
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("personaId", &self.persona_id);
            query.append_pair("scenarioId", &self.scenario_id);
            if let Some(voice_id) = &self.voice_id {
                query.append_pair("voiceId", voice_id);
            }
        }
        match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
