//! Wire DTOs for the remote API.
//!
//! These mirror the JSON the API speaks and convert into domain models.
//! Domain types never see wire quirks (optional genders, `voice` naming).

use chrono::{DateTime, Duration, Utc};
use parley_core::persona::{CreatePersonaRequest, Gender, Persona};
use parley_core::token::UsageToken;
use serde::{Deserialize, Serialize};

/// Token lifetime requested when minting, and assumed when the API omits one.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// Envelope used by every list endpoint: `{"values": [...]}`.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PersonaDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub voice: Option<String>,
}

impl From<PersonaDto> for Persona {
    fn from(dto: PersonaDto) -> Self {
        Persona {
            id: dto.id,
            name: dto.name,
            description: dto.description.unwrap_or_default(),
            gender: dto.gender.unwrap_or_default(),
            voice_id: dto.voice.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePersonaBody<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub gender: Gender,
    pub voice: &'a str,
}

impl<'a> From<&'a CreatePersonaRequest> for CreatePersonaBody<'a> {
    fn from(request: &'a CreatePersonaRequest) -> Self {
        Self {
            name: &request.name,
            description: &request.description,
            gender: request.gender,
            voice: &request.voice_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateVoiceBody<'a> {
    pub voice_id: &'a str,
    pub text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct MintTokenBody {
    pub ttl_seconds: i64,
}

impl Default for MintTokenBody {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TOKEN_TTL_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ttl_seconds: Option<i64>,
}

impl TokenResponse {
    /// Resolves the expiry: explicit instant, else `now + ttl`, else the default TTL.
    ///
    /// A TTL that does not fit in a timestamp falls back to the default TTL.
    pub fn into_token(self, now: DateTime<Utc>) -> UsageToken {
        let expires_at = self.expires_at.unwrap_or_else(|| {
            let ttl_seconds = self.ttl_seconds.unwrap_or(DEFAULT_TOKEN_TTL_SECS);
            Duration::try_seconds(ttl_seconds)
                .and_then(|ttl| now.checked_add_signed(ttl))
                .unwrap_or_else(|| {
                    tracing::warn!(ttl_seconds, "[TokenResponse] TTL out of range, using default");
                    now + Duration::seconds(DEFAULT_TOKEN_TTL_SECS)
                })
        });
        UsageToken::new(self.token, expires_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::scenario::Scenario;
    use parley_core::voice::Voice;

    #[test]
    fn test_persona_list_fills_defaults() {
        let body = r#"{"values":[
            {"id":"p1","name":"Ava","description":"calm","gender":"male","voice":"v1"},
            {"id":"p2","name":"Bo"}
        ]}"#;
        let response: ListResponse<PersonaDto> = serde_json::from_str(body).unwrap();
        let personas: Vec<Persona> = response.values.into_iter().map(Into::into).collect();

        assert_eq!(personas[0].gender, Gender::Male);
        assert_eq!(personas[0].voice_id, "v1");
        assert_eq!(personas[1].gender, Gender::Female);
        assert_eq!(personas[1].description, "");
    }

    #[test]
    fn test_missing_values_is_empty_list() {
        let response: ListResponse<Voice> = serde_json::from_str("{}").unwrap();
        assert!(response.values.is_empty());
    }

    #[test]
    fn test_scenario_description_optional() {
        let response: ListResponse<Scenario> =
            serde_json::from_str(r#"{"values":[{"id":"s1","name":"Interview"}]}"#).unwrap();
        assert_eq!(response.values[0].description, None);
    }

    #[test]
    fn test_create_body_uses_voice_field() {
        let request = CreatePersonaRequest {
            name: "Ava".into(),
            description: String::new(),
            gender: Gender::Female,
            voice_id: "v1".into(),
        };
        let value = serde_json::to_value(CreatePersonaBody::from(&request)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"name":"Ava","description":"","gender":"female","voice":"v1"})
        );
    }

    #[test]
    fn test_token_expiry_resolution() {
        let now = Utc::now();
        let explicit: TokenResponse = serde_json::from_str(
            r#"{"token":"t","expires_at":"2030-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(
            explicit.into_token(now).expires_at.to_rfc3339(),
            "2030-01-01T00:00:00+00:00"
        );

        let relative: TokenResponse =
            serde_json::from_str(r#"{"token":"t","ttl_seconds":60}"#).unwrap();
        assert_eq!(relative.into_token(now).expires_at, now + Duration::seconds(60));

        let bare: TokenResponse = serde_json::from_str(r#"{"token":"t"}"#).unwrap();
        assert_eq!(
            bare.into_token(now).expires_at,
            now + Duration::seconds(DEFAULT_TOKEN_TTL_SECS)
        );
    }

    #[test]
    fn test_out_of_range_ttl_uses_default() {
        let now = Utc::now();
        let huge: TokenResponse =
            serde_json::from_str(r#"{"token":"t","ttl_seconds":9223372036854775807}"#).unwrap();
        let token = huge.into_token(now);
        assert_eq!(token.expires_at, now + Duration::seconds(DEFAULT_TOKEN_TTL_SECS));
        assert!(!token.is_expired_at(now));

        // Fits in a Duration but overflows the timestamp.
        let far: TokenResponse = serde_json::from_str(
            r#"{"token":"t","ttl_seconds":9000000000000}"#,
        )
        .unwrap();
        assert_eq!(
            far.into_token(now).expires_at,
            now + Duration::seconds(DEFAULT_TOKEN_TTL_SECS)
        );
    }
}
