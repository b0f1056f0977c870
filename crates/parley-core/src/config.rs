//! Client configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer; every field has a
//! default so a missing or partial file is valid.

use serde::{Deserialize, Serialize};

use crate::error::{ParleyError, Result};
use crate::session::{
    DEFAULT_MODEL_ID, DEFAULT_PLACEHOLDER_VOICE_ID, InputPolicy, OutputPolicy, PersonaHandoff,
    SessionPolicy,
};

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionPolicyConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl ClientConfig {
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ParleyError::config("api.base_url cannot be empty"));
        }
        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            return Err(ParleyError::config(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(ParleyError::config("api.timeout_secs must be positive"));
        }
        if self.session.model_id.trim().is_empty() {
            return Err(ParleyError::config("session.model_id cannot be empty"));
        }
        Ok(())
    }
}

/// Remote API connection settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub base_url: String,
    /// Server API key, used only for minting usage tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Overrides for the session policy defaults.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SessionPolicyConfig {
    pub model_id: String,
    pub interruptable: bool,
    pub parallel_listening: bool,
    pub stream_transcript: bool,
    pub speech_synthesis_enabled: bool,
}

impl Default for SessionPolicyConfig {
    fn default() -> Self {
        let policy = SessionPolicy::default();
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            interruptable: policy.input.interruptable,
            parallel_listening: policy.input.parallel_listening,
            stream_transcript: policy.output.stream_transcript,
            speech_synthesis_enabled: policy.output.speech_synthesis_enabled,
        }
    }
}

impl SessionPolicyConfig {
    pub fn to_policy(&self) -> SessionPolicy {
        SessionPolicy {
            model_id: self.model_id.clone(),
            input: InputPolicy {
                interruptable: self.interruptable,
                parallel_listening: self.parallel_listening,
            },
            output: OutputPolicy {
                stream_transcript: self.stream_transcript,
                speech_synthesis_enabled: self.speech_synthesis_enabled,
            },
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ChatConfig {
    pub persona_handoff: PersonaHandoff,
    pub placeholder_voice_id: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            persona_handoff: PersonaHandoff::default(),
            placeholder_voice_id: DEFAULT_PLACEHOLDER_VOICE_ID.to_string(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.session.to_policy(), SessionPolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config: ClientConfig = toml::from_str(
            r#"
            [api]
            base_url = "http://localhost:4000"

            [session]
            speech_synthesis_enabled = false

            [chat]
            persona_handoff = "placeholder"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://localhost:4000");
        assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(!config.session.to_policy().output.speech_synthesis_enabled);
        assert!(config.session.to_policy().input.interruptable);
        assert_eq!(config.chat.persona_handoff, PersonaHandoff::Placeholder);
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = ClientConfig::default();
        config.api.base_url = "ftp://example".into();
        assert!(config.validate().is_err());
    }
}
