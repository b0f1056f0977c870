//! Chat entry and session host.
//!
//! Chat entry turns a `ChatDestination` plus the usage token into either a
//! ready session or a blocking missing-parameters state. The host then hands
//! the configuration and persona to the real-time engine unchanged.

use std::sync::Arc;

use async_trait::async_trait;
use parley_core::config::ChatConfig;
use parley_core::persona::Persona;
use parley_core::session::{
    ChatDestination, PersonaHandoff, SessionAssembler, SessionConfiguration, placeholder_persona,
};
use parley_core::token::UsageToken;
use parley_core::{ParleyError, Result};

/// The external real-time conversation engine.
#[async_trait]
pub trait RealtimeEngine: Send + Sync {
    /// Opens a session with the given configuration and persona.
    async fn open(&self, config: &SessionConfiguration, persona: &Persona) -> Result<()>;
}

/// Outcome of entering the chat page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEntry {
    /// Blocking state; no session is started.
    MissingParameters(Vec<&'static str>),
    Ready {
        config: SessionConfiguration,
        persona: Persona,
    },
}

impl ChatEntry {
    pub fn is_ready(&self) -> bool {
        matches!(self, ChatEntry::Ready { .. })
    }
}

pub struct ChatSessionHost {
    assembler: SessionAssembler,
    handoff: PersonaHandoff,
    placeholder_voice_id: String,
    engine: Arc<dyn RealtimeEngine>,
}

impl ChatSessionHost {
    pub fn new(
        assembler: SessionAssembler,
        chat: &ChatConfig,
        engine: Arc<dyn RealtimeEngine>,
    ) -> Self {
        Self {
            assembler,
            handoff: chat.persona_handoff,
            placeholder_voice_id: chat.placeholder_voice_id.clone(),
            engine,
        }
    }

    pub fn handoff(&self) -> PersonaHandoff {
        self.handoff
    }

    /// Validates raw navigation parameters and prepares the session.
    ///
    /// Missing ids yield `ChatEntry::MissingParameters`. Other failures,
    /// such as an expired token, are returned as errors.
    pub fn prepare(
        &self,
        persona_id: Option<&str>,
        scenario_id: Option<&str>,
        voice_id: Option<&str>,
        selected: Option<&Persona>,
        usage_token: &UsageToken,
    ) -> Result<ChatEntry> {
        match ChatDestination::from_params(persona_id, scenario_id, voice_id) {
            Ok(destination) => self.prepare_destination(&destination, selected, usage_token),
            Err(ParleyError::MissingParameters(missing)) => {
                tracing::warn!(missing = ?missing, "[ChatHost] Missing required parameters");
                Ok(ChatEntry::MissingParameters(missing))
            }
            Err(e) => Err(e),
        }
    }

    /// Prepares the session for an already validated destination.
    pub fn prepare_destination(
        &self,
        destination: &ChatDestination,
        selected: Option<&Persona>,
        usage_token: &UsageToken,
    ) -> Result<ChatEntry> {
        let config = match self.assembler.assemble(
            Some(&destination.persona_id),
            Some(&destination.scenario_id),
            usage_token,
        ) {
            Ok(config) => config,
            Err(ParleyError::MissingParameters(missing)) => {
                return Ok(ChatEntry::MissingParameters(missing));
            }
            Err(e) => return Err(e),
        };
        let persona = self.resolve_persona(destination, selected);

        tracing::info!(
            persona_id = %config.persona_id,
            scenario_id = %config.scenario_id,
            model_id = %config.model_id,
            "[ChatHost] Session configuration assembled"
        );
        Ok(ChatEntry::Ready { config, persona })
    }

    fn resolve_persona(&self, destination: &ChatDestination, selected: Option<&Persona>) -> Persona {
        let voice_id = destination
            .voice_id
            .as_deref()
            .unwrap_or(&self.placeholder_voice_id);

        match self.handoff {
            PersonaHandoff::Placeholder => {
                placeholder_persona(&destination.persona_id, Some(voice_id))
            }
            PersonaHandoff::CarrySelected => match selected {
                Some(persona) if persona.id == destination.persona_id => persona.clone(),
                Some(persona) => {
                    tracing::warn!(
                        selected = %persona.id,
                        requested = %destination.persona_id,
                        "[ChatHost] Selected persona does not match destination, using placeholder"
                    );
                    placeholder_persona(&destination.persona_id, Some(voice_id))
                }
                None => {
                    tracing::debug!(
                        persona_id = %destination.persona_id,
                        "[ChatHost] No persona carried, using placeholder"
                    );
                    placeholder_persona(&destination.persona_id, Some(voice_id))
                }
            },
        }
    }

    /// Starts the session for a ready entry.
    ///
    /// Returns `Ok(false)` without contacting the engine when parameters
    /// were missing.
    pub async fn enter(&self, entry: &ChatEntry) -> Result<bool> {
        match entry {
            ChatEntry::MissingParameters(_) => Ok(false),
            ChatEntry::Ready { config, persona } => {
                tracing::info!(persona = %persona.name, "[ChatHost] Opening realtime session");
                self.engine.open(config, persona).await?;
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use parley_core::persona::Gender;
    use parley_core::session::{DEFAULT_MODEL_ID, PLACEHOLDER_PERSONA_NAME};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockEngine {
        opened: Mutex<Vec<(SessionConfiguration, Persona)>>,
    }

    #[async_trait]
    impl RealtimeEngine for MockEngine {
        async fn open(&self, config: &SessionConfiguration, persona: &Persona) -> Result<()> {
            self.opened
                .lock()
                .unwrap()
                .push((config.clone(), persona.clone()));
            Ok(())
        }
    }

    fn token() -> UsageToken {
        UsageToken::new("tok", Utc::now() + Duration::minutes(10))
    }

    fn persona() -> Persona {
        Persona {
            id: "p1".into(),
            name: "Ava".into(),
            description: "Friendly".into(),
            gender: Gender::Male,
            voice_id: "v1".into(),
        }
    }

    fn host(handoff: PersonaHandoff) -> (ChatSessionHost, Arc<MockEngine>) {
        let engine = Arc::new(MockEngine::default());
        let chat = ChatConfig {
            persona_handoff: handoff,
            ..ChatConfig::default()
        };
        let host = ChatSessionHost::new(SessionAssembler::default(), &chat, engine.clone());
        (host, engine)
    }

    #[tokio::test]
    async fn test_missing_parameters_starts_no_session() {
        let (host, engine) = host(PersonaHandoff::CarrySelected);
        let entry = host
            .prepare(Some("p1"), None, None, None, &token())
            .unwrap();

        assert_eq!(entry, ChatEntry::MissingParameters(vec!["scenarioId"]));
        assert!(!host.enter(&entry).await.unwrap());
        assert!(engine.opened.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_carries_selected_persona_unchanged() {
        let (host, engine) = host(PersonaHandoff::CarrySelected);
        let selected = persona();
        let entry = host
            .prepare(Some("p1"), Some("s1"), Some("v1"), Some(&selected), &token())
            .unwrap();
        assert!(host.enter(&entry).await.unwrap());

        let opened = engine.opened.lock().unwrap();
        let (config, persona) = &opened[0];
        assert_eq!(persona, &selected);
        assert_eq!(config.persona_id, "p1");
        assert_eq!(config.scenario_id, "s1");
        assert_eq!(config.model_id, DEFAULT_MODEL_ID);
    }

    #[test]
    fn test_placeholder_mode_ignores_selected_record() {
        let (host, _) = host(PersonaHandoff::Placeholder);
        let selected = persona();
        let entry = host
            .prepare(Some("p1"), Some("s1"), Some("v9"), Some(&selected), &token())
            .unwrap();

        let ChatEntry::Ready { persona, .. } = entry else {
            panic!("expected ready entry");
        };
        assert_eq!(persona.name, PLACEHOLDER_PERSONA_NAME);
        assert_eq!(persona.description, "");
        assert_eq!(persona.gender, Gender::Female);
        assert_eq!(persona.voice_id, "v9");
    }

    #[test]
    fn test_mismatched_selection_falls_back_to_placeholder() {
        let (host, _) = host(PersonaHandoff::CarrySelected);
        let selected = persona();
        let entry = host
            .prepare(Some("other"), Some("s1"), None, Some(&selected), &token())
            .unwrap();

        let ChatEntry::Ready { persona, .. } = entry else {
            panic!("expected ready entry");
        };
        assert_eq!(persona.id, "other");
        assert_eq!(persona.name, PLACEHOLDER_PERSONA_NAME);
    }

    #[test]
    fn test_expired_token_is_an_error() {
        let (host, _) = host(PersonaHandoff::CarrySelected);
        let expired = UsageToken::new("tok", Utc::now() - Duration::seconds(1));
        let err = host
            .prepare(Some("p1"), Some("s1"), None, None, &expired)
            .unwrap_err();
        assert!(matches!(err, ParleyError::ExpiredToken { .. }));
    }
}
