//! Direct navigation to the chat page.

use anyhow::Result;
use colored::Colorize;
use parley_application::ChatEntry;
use parley_core::ParleyError;
use parley_core::config::ClientConfig;
use parley_core::session::ChatDestination;

pub enum ChatTarget {
    Params {
        persona_id: Option<String>,
        scenario_id: Option<String>,
        voice_id: Option<String>,
    },
    Path(String),
}

impl ChatTarget {
    fn destination(&self) -> parley_core::Result<ChatDestination> {
        match self {
            ChatTarget::Params {
                persona_id,
                scenario_id,
                voice_id,
            } => ChatDestination::from_params(
                persona_id.as_deref(),
                scenario_id.as_deref(),
                voice_id.as_deref(),
            ),
            ChatTarget::Path(path) => ChatDestination::parse_path(path),
        }
    }
}

pub async fn run(config: &ClientConfig, target: ChatTarget) -> Result<()> {
    // Parameters are checked before any token is minted.
    let destination = match target.destination() {
        Ok(destination) => destination,
        Err(ParleyError::MissingParameters(missing)) => {
            print_missing(&missing);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let token = super::mint_token(config).await?;
    let host = super::chat_host(config);
    let entry = host.prepare_destination(&destination, None, &token)?;
    open(&host, &entry).await
}

/// Hands a prepared entry to the engine, or shows the blocking state.
pub async fn open(host: &parley_application::ChatSessionHost, entry: &ChatEntry) -> Result<()> {
    match entry {
        ChatEntry::MissingParameters(missing) => {
            print_missing(missing);
            Ok(())
        }
        ChatEntry::Ready { .. } => {
            host.enter(entry).await?;
            Ok(())
        }
    }
}

fn print_missing(missing: &[&'static str]) {
    println!(
        "{}",
        ParleyError::MissingParameters(missing.to_vec())
            .to_string()
            .red()
    );
}
