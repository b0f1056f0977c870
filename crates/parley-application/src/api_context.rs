//! Explicit API context for one page entry.
//!
//! Holds the usage token minted for the entry and the repositories every
//! view talks to. It is created once per entry and shared by `Arc`; dropping
//! the last handle ends the entry.

use std::sync::Arc;

use parley_core::Result;
use parley_core::persona::PersonaRepository;
use parley_core::scenario::ScenarioRepository;
use parley_core::token::{TokenMinter, UsageToken};
use parley_core::voice::VoiceRepository;

pub struct ApiContext {
    usage_token: UsageToken,
    personas: Arc<dyn PersonaRepository>,
    voices: Arc<dyn VoiceRepository>,
    scenarios: Arc<dyn ScenarioRepository>,
}

impl ApiContext {
    pub fn new(
        usage_token: UsageToken,
        personas: Arc<dyn PersonaRepository>,
        voices: Arc<dyn VoiceRepository>,
        scenarios: Arc<dyn ScenarioRepository>,
    ) -> Self {
        Self {
            usage_token,
            personas,
            voices,
            scenarios,
        }
    }

    /// Builds a context from one client implementing every repository.
    pub fn from_client<C>(usage_token: UsageToken, client: Arc<C>) -> Self
    where
        C: PersonaRepository + VoiceRepository + ScenarioRepository + 'static,
    {
        Self::new(usage_token, client.clone(), client.clone(), client)
    }

    /// Enters a page: mints the usage token once and connects a client with it.
    pub async fn enter<C, F>(minter: &dyn TokenMinter, connect: F) -> Result<Arc<Self>>
    where
        C: PersonaRepository + VoiceRepository + ScenarioRepository + 'static,
        F: FnOnce(&UsageToken) -> Result<C>,
    {
        let usage_token = minter.mint().await?;
        tracing::info!(
            expires_at = %usage_token.expires_at,
            "[ApiContext] Usage token minted"
        );
        let client = connect(&usage_token)?;
        Ok(Arc::new(Self::from_client(usage_token, Arc::new(client))))
    }

    pub fn usage_token(&self) -> &UsageToken {
        &self.usage_token
    }

    pub fn personas(&self) -> Arc<dyn PersonaRepository> {
        Arc::clone(&self.personas)
    }

    pub fn voices(&self) -> Arc<dyn VoiceRepository> {
        Arc::clone(&self.voices)
    }

    pub fn scenarios(&self) -> Arc<dyn ScenarioRepository> {
        Arc::clone(&self.scenarios)
    }
}

impl Drop for ApiContext {
    fn drop(&mut self) {
        tracing::debug!("[ApiContext] Page entry ended");
    }
}
