//! Terminal stand-in for the real-time engine.

use async_trait::async_trait;
use colored::Colorize;
use parley_application::RealtimeEngine;
use parley_core::Result;
use parley_core::persona::Persona;
use parley_core::session::SessionConfiguration;
use serde_json::Value;

/// Prints the connection payload instead of opening a live session.
pub struct ConsoleEngine;

#[async_trait]
impl RealtimeEngine for ConsoleEngine {
    async fn open(&self, config: &SessionConfiguration, persona: &Persona) -> Result<()> {
        println!(
            "{}",
            format!("Starting chat with {} ({})", persona.name, persona.gender).bright_green()
        );
        let payload = serde_json::to_string_pretty(&redacted_payload(config))?;
        for line in payload.lines() {
            println!("{}", line.bright_black());
        }
        Ok(())
    }
}

/// The engine payload with the usage token masked.
pub fn redacted_payload(config: &SessionConfiguration) -> Value {
    let mut payload = config.to_engine_payload();
    if let Some(token) = payload.get_mut("token") {
        *token = Value::String("***".to_string());
    }
    payload
}
