//! HTTP adapter for the remote persona/voice/scenario API.
//!
//! Every call is authorized with the usage token minted for the current page
//! entry. The token is read-only here; a fresh client is built per entry.

use std::time::Duration;

use chrono::Utc;
use parley_core::config::ApiConfig;
use parley_core::persona::{CreatePersonaRequest, Persona, PersonaRepository};
use parley_core::scenario::{Scenario, ScenarioRepository};
use parley_core::token::{TokenMinter, UsageToken};
use parley_core::voice::{Voice, VoiceRepository, VoiceSample};
use parley_core::{ParleyError, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::dto::{
    CreatePersonaBody, GenerateVoiceBody, ListResponse, MintTokenBody, PersonaDto, TokenResponse,
};

const PERSONA_LIST_PATH: &str = "/api/v1/persona/list";
const PERSONA_CREATE_PATH: &str = "/api/v1/persona";
const VOICE_LIST_PATH: &str = "/api/v1/voice/list";
const VOICE_GENERATE_PATH: &str = "/api/v1/voice/generate";
const SCENARIO_LIST_PATH: &str = "/api/v1/scenario/list";
const USAGE_TOKEN_PATH: &str = "/api/v1/usage/token";

fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ParleyError::internal(format!("Failed to build HTTP client: {}", e)))
}

fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Sends a request and maps transport and status failures into `ParleyError`.
async fn send(request: RequestBuilder) -> Result<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| ParleyError::network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ParleyError::api(status.as_u16(), error_text));
    }

    Ok(response)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ParleyError::network(format!("Failed to read response: {}", e)))?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Client for the remote API, authorized by a usage token.
#[derive(Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
    usage_token: UsageToken,
}

impl HttpApiClient {
    pub fn new(
        base_url: impl Into<String>,
        usage_token: UsageToken,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into(),
            usage_token,
        })
    }

    pub fn from_config(config: &ApiConfig, usage_token: UsageToken) -> Result<Self> {
        Self::new(
            config.base_url.clone(),
            usage_token,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn usage_token(&self) -> &UsageToken {
        &self.usage_token
    }

    /// Attaches the bearer token, refusing to send an expired one.
    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.usage_token.valid_at(Utc::now())?;
        Ok(request.bearer_auth(token))
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let url = join_url(&self.base_url, path);
        tracing::debug!(%url, "[HttpApiClient] GET");

        let request = self.authorized(self.client.get(&url).query(query))?;
        let response = send(request).await?;
        let list: ListResponse<T> = read_json(response).await?;
        Ok(list.values)
    }
}

#[async_trait::async_trait]
impl PersonaRepository for HttpApiClient {
    async fn list(&self) -> Result<Vec<Persona>> {
        let personas: Vec<PersonaDto> = self.get_list(PERSONA_LIST_PATH, &[]).await?;
        Ok(personas.into_iter().map(Persona::from).collect())
    }

    async fn create(&self, request: &CreatePersonaRequest) -> Result<Persona> {
        request.validate()?;

        let url = join_url(&self.base_url, PERSONA_CREATE_PATH);
        tracing::debug!(%url, "[HttpApiClient] POST");

        let body = CreatePersonaBody::from(request);
        let response = send(self.authorized(self.client.post(&url).json(&body))?).await?;
        let created: PersonaDto = read_json(response).await?;
        Ok(created.into())
    }
}

#[async_trait::async_trait]
impl VoiceRepository for HttpApiClient {
    async fn list(&self) -> Result<Vec<Voice>> {
        self.get_list(VOICE_LIST_PATH, &[]).await
    }

    async fn generate_sample(&self, voice_id: &str, text: &str) -> Result<VoiceSample> {
        let url = join_url(&self.base_url, VOICE_GENERATE_PATH);
        tracing::debug!(%url, voice_id, "[HttpApiClient] POST");

        let body = GenerateVoiceBody { voice_id, text };
        let response = send(self.authorized(self.client.post(&url).json(&body))?).await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("audio/mpeg")
            .to_string();
        let audio = response
            .bytes()
            .await
            .map_err(|e| ParleyError::network(format!("Failed to read audio: {}", e)))?;

        Ok(VoiceSample {
            voice_id: voice_id.to_string(),
            content_type,
            audio: audio.to_vec(),
        })
    }
}

#[async_trait::async_trait]
impl ScenarioRepository for HttpApiClient {
    async fn list(&self, persona_id: &str) -> Result<Vec<Scenario>> {
        self.get_list(SCENARIO_LIST_PATH, &[("persona", persona_id)])
            .await
    }
}

/// Mints usage tokens with the server API key.
#[derive(Clone)]
pub struct HttpTokenMinter {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpTokenMinter {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Builds a minter from config; fails when no API key is configured.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ParleyError::config("api.api_key (or PARLEY_API_KEY) is required to mint tokens")
            })?;
        Self::new(
            config.base_url.clone(),
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait::async_trait]
impl TokenMinter for HttpTokenMinter {
    async fn mint(&self) -> Result<UsageToken> {
        let url = join_url(&self.base_url, USAGE_TOKEN_PATH);
        tracing::debug!(%url, "[HttpTokenMinter] POST");

        let request = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(&MintTokenBody::default());
        let response = send(request).await?;
        let minted: TokenResponse = read_json(response).await?;
        Ok(minted.into_token(Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url_trims_trailing_slash() {
        assert_eq!(
            join_url("http://localhost:8080/", PERSONA_LIST_PATH),
            "http://localhost:8080/api/v1/persona/list"
        );
    }

    #[test]
    fn test_minter_requires_api_key() {
        let config = ApiConfig::default();
        assert!(matches!(
            HttpTokenMinter::from_config(&config),
            Err(ParleyError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_token_is_not_sent() {
        let expired = UsageToken::new("tok", Utc::now() - chrono::Duration::seconds(1));
        // Port 9 (discard) is never contacted because authorization fails first.
        let client =
            HttpApiClient::new("http://127.0.0.1:9", expired, Duration::from_secs(1)).unwrap();
        let err = PersonaRepository::list(&client).await.unwrap_err();
        assert!(matches!(err, ParleyError::ExpiredToken { .. }));
    }
}
