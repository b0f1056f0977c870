pub mod chat;
pub mod config;
pub mod select;

use std::sync::Arc;

use anyhow::Result;
use parley_application::{ApiContext, ChatSessionHost};
use parley_core::config::ClientConfig;
use parley_core::session::SessionAssembler;
use parley_core::token::{TokenMinter, UsageToken};
use parley_infrastructure::{HttpApiClient, HttpTokenMinter};

use crate::engine::ConsoleEngine;

/// Mints the usage token for a page entry and connects the API client.
pub async fn enter_page(config: &ClientConfig) -> Result<Arc<ApiContext>> {
    let minter = HttpTokenMinter::from_config(&config.api)?;
    let api = config.api.clone();
    let context =
        ApiContext::enter(&minter, |token| HttpApiClient::from_config(&api, token.clone())).await?;
    Ok(context)
}

/// Mints a usage token for a page that needs no API client.
pub async fn mint_token(config: &ClientConfig) -> parley_core::Result<UsageToken> {
    HttpTokenMinter::from_config(&config.api)?.mint().await
}

pub fn chat_host(config: &ClientConfig) -> ChatSessionHost {
    ChatSessionHost::new(
        SessionAssembler::new(config.session.to_policy()),
        &config.chat,
        Arc::new(ConsoleEngine),
    )
}
