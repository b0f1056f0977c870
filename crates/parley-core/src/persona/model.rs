//! Persona domain model.
//!
//! Represents the AI identity a user talks to: a display name, a personality
//! description, a gender and the voice used for speech synthesis.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParleyError;

/// Gender attached to a persona.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    /// Listings that omit a gender are treated as female.
    #[default]
    Female,
}

impl Gender {
    /// Returns all variants paired with their display labels.
    pub fn all_variants() -> Vec<(Gender, &'static str)> {
        vec![(Gender::Male, "Male"), (Gender::Female, "Female")]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ParleyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(ParleyError::validation(format!(
                "Gender must be 'male' or 'female', got '{}'",
                other
            ))),
        }
    }
}

/// A persona representing the AI's identity in a conversation.
///
/// Personas are owned by the remote API. The id is server-assigned and the
/// record is immutable from the client's point of view.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    /// Opaque server-assigned identifier
    pub id: String,
    /// Display name of the persona
    pub name: String,
    /// Free-text personality description (may be empty)
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub gender: Gender,
    /// Voice used for speech synthesis
    pub voice_id: String,
}
