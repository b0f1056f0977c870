//! Session configuration handed to the real-time engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{ParleyError, Result};
use crate::token::UsageToken;

/// Model used for generation unless configured otherwise.
pub const DEFAULT_MODEL_ID: &str = "21892bb9-9809-4b6f-8c3e-e40093069f04";
pub const DEFAULT_INTERRUPTABLE: bool = true;
pub const DEFAULT_PARALLEL_LISTENING: bool = true;
pub const DEFAULT_STREAM_TRANSCRIPT: bool = true;
pub const DEFAULT_SPEECH_SYNTHESIS_ENABLED: bool = true;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPolicy {
    /// User speech may interrupt the assistant mid-utterance.
    pub interruptable: bool,
    /// Keep listening while the assistant speaks.
    pub parallel_listening: bool,
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self {
            interruptable: DEFAULT_INTERRUPTABLE,
            parallel_listening: DEFAULT_PARALLEL_LISTENING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPolicy {
    pub stream_transcript: bool,
    pub speech_synthesis_enabled: bool,
}

impl Default for OutputPolicy {
    fn default() -> Self {
        Self {
            stream_transcript: DEFAULT_STREAM_TRANSCRIPT,
            speech_synthesis_enabled: DEFAULT_SPEECH_SYNTHESIS_ENABLED,
        }
    }
}

/// The policy part of a session configuration: everything that does not
/// depend on the user's selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPolicy {
    pub model_id: String,
    pub input: InputPolicy,
    pub output: OutputPolicy,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            input: InputPolicy::default(),
            output: OutputPolicy::default(),
        }
    }
}

/// Parameters needed to open one real-time session.
///
/// Produced fresh for every chat entry; never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionConfiguration {
    pub persona_id: String,
    pub scenario_id: String,
    #[serde(skip)]
    pub usage_token: UsageToken,
    pub model_id: String,
    pub input_policy: InputPolicy,
    pub output_policy: OutputPolicy,
}

impl SessionConfiguration {
    /// Renders the connection options understood by the real-time engine.
    pub fn to_engine_payload(&self) -> Value {
        json!({
            "token": self.usage_token.token,
            "config": {
                "generative": {
                    "persona": self.persona_id,
                    "scenario": self.scenario_id,
                    "llm": self.model_id,
                },
                "general": {},
                "input": {
                    "interruptable": self.input_policy.interruptable,
                    "parallel_listening": self.input_policy.parallel_listening,
                },
                "output": {
                    "stream_transcript": self.output_policy.stream_transcript,
                    "speech_synthesis_enabled": self.output_policy.speech_synthesis_enabled,
                },
            },
        })
    }
}

/// Builds `SessionConfiguration` values from a selection and a usage token.
#[derive(Debug, Clone, Default)]
pub struct SessionAssembler {
    policy: SessionPolicy,
}

impl SessionAssembler {
    pub fn new(policy: SessionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Assembles a configuration, checking the token against the current time.
    pub fn assemble(
        &self,
        persona_id: Option<&str>,
        scenario_id: Option<&str>,
        usage_token: &UsageToken,
    ) -> Result<SessionConfiguration> {
        self.assemble_at(persona_id, scenario_id, usage_token, Utc::now())
    }

    /// Assembles a configuration as of `now`.
    ///
    /// Fails when either id is absent or blank, or the token has expired.
    pub fn assemble_at(
        &self,
        persona_id: Option<&str>,
        scenario_id: Option<&str>,
        usage_token: &UsageToken,
        now: DateTime<Utc>,
    ) -> Result<SessionConfiguration> {
        let persona_id = persona_id.map(str::trim).filter(|id| !id.is_empty());
        let scenario_id = scenario_id.map(str::trim).filter(|id| !id.is_empty());

        let (persona_id, scenario_id) = match (persona_id, scenario_id) {
            (Some(p), Some(s)) => (p, s),
            (p, s) => {
                let mut missing = Vec::new();
                if p.is_none() {
                    missing.push("personaId");
                }
                if s.is_none() {
                    missing.push("scenarioId");
                }
                return Err(ParleyError::MissingParameters(missing));
            }
        };

        usage_token.valid_at(now)?;

        Ok(SessionConfiguration {
            persona_id: persona_id.to_string(),
            scenario_id: scenario_id.to_string(),
            usage_token: usage_token.clone(),
            model_id: self.policy.model_id.clone(),
            input_policy: self.policy.input,
            output_policy: self.policy.output,
        })
    }
}
