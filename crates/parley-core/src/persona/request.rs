//! Persona creation request model.

use serde::{Deserialize, Serialize};

use super::{Gender, Persona};
use crate::error::{ParleyError, Result};

/// Request to create a new persona.
///
/// Built by the creation form only after the selected voice has been
/// resolved against the fetched voice list, so `voice_id` always names a
/// voice the user actually saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePersonaRequest {
    /// Display name (required)
    pub name: String,

    /// Personality description. May be empty, never a placeholder.
    pub description: String,

    pub gender: Gender,

    /// Id of a resolved voice (required)
    pub voice_id: String,
}

impl CreatePersonaRequest {
    /// Validate the request and return errors if any.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ParleyError::validation(
                "Name is required and cannot be empty",
            ));
        }

        if self.voice_id.trim().is_empty() {
            return Err(ParleyError::validation("A voice must be assigned"));
        }

        Ok(())
    }

    /// Convert this request into a Persona carrying the given server id.
    pub fn into_persona(self, id: impl Into<String>) -> Persona {
        Persona {
            id: id.into(),
            name: self.name,
            description: self.description,
            gender: self.gender,
            voice_id: self.voice_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, voice_id: &str) -> CreatePersonaRequest {
        CreatePersonaRequest {
            name: name.to_string(),
            description: String::new(),
            gender: Gender::Male,
            voice_id: voice_id.to_string(),
        }
    }

    #[test]
    fn test_validate_success_with_empty_description() {
        assert!(request("Ava", "v1").validate().is_ok());
    }

    #[test]
    fn test_validate_blank_name() {
        let err = request("   ", "v1").validate().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_validate_missing_voice() {
        assert!(request("Ava", "").validate().is_err());
    }

    #[test]
    fn test_into_persona_keeps_fields() {
        let persona = request("Ava", "v1").into_persona("p-9");
        assert_eq!(persona.id, "p-9");
        assert_eq!(persona.name, "Ava");
        assert_eq!(persona.description, "");
        assert_eq!(persona.gender, Gender::Male);
        assert_eq!(persona.voice_id, "v1");
    }
}
