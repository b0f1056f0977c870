use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use parley_core::config::ClientConfig;
use parley_infrastructure::{ConfigService, ParleyPaths};

mod commands;
mod engine;
mod logging;

#[derive(Parser)]
#[command(name = "parley")]
#[command(about = "Parley - pick a persona and a scenario, then start a voice chat", long_about = None)]
struct Cli {
    /// Directory holding config.toml and logs (defaults to the platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Base URL of the remote API, overriding config and environment
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Server API key used to mint usage tokens
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse personas and scenarios interactively (default)
    Select,
    /// Open a chat session directly from navigation parameters
    Chat {
        #[arg(long)]
        persona_id: Option<String>,
        #[arg(long)]
        scenario_id: Option<String>,
        #[arg(long)]
        voice_id: Option<String>,
        /// A `/chat?personaId=..&scenarioId=..` path instead of the flags
        #[arg(long, conflicts_with_all = ["persona_id", "scenario_id", "voice_id"])]
        path: Option<String>,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a config file with default values if none exists
    Init,
}

impl Cli {
    fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(key) = &self.api_key {
            config.api.api_key = Some(key.clone());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = ParleyPaths::new(cli.config_dir.as_deref());

    let logs_dir = paths
        .logs_dir()
        .context("Failed to resolve the log directory")?;
    let _log_guard = logging::init(&logs_dir)?;

    let config_service = ConfigService::new(&paths)?;

    if let Some(Commands::Config { action }) = &cli.command {
        return match action {
            ConfigAction::Show => commands::config::show(&config_service),
            ConfigAction::Init => commands::config::init(&config_service),
        };
    }

    let mut config = config_service
        .get_config()
        .with_context(|| format!("Failed to load {}", config_service.path().display()))?;
    cli.apply_overrides(&mut config);
    config.validate()?;
    tracing::info!(base_url = %config.api.base_url, "[Parley] Starting");

    match cli.command {
        None | Some(Commands::Select) => commands::select::run(&config).await?,
        Some(Commands::Chat {
            persona_id,
            scenario_id,
            voice_id,
            path,
        }) => {
            let target = match path {
                Some(path) => commands::chat::ChatTarget::Path(path),
                None => commands::chat::ChatTarget::Params {
                    persona_id,
                    scenario_id,
                    voice_id,
                },
            };
            commands::chat::run(&config, target).await?;
        }
        Some(Commands::Config { .. }) => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_loaded_config() {
        let cli = Cli::try_parse_from([
            "parley",
            "--api-url",
            "https://api.example.test",
            "--api-key",
            "k",
            "select",
        ])
        .unwrap();

        let mut config = ClientConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.api.base_url, "https://api.example.test");
        assert_eq!(config.api.api_key.as_deref(), Some("k"));
        assert!(matches!(cli.command, Some(Commands::Select)));
    }

    #[test]
    fn test_chat_path_conflicts_with_ids() {
        let result = Cli::try_parse_from([
            "parley",
            "chat",
            "--persona-id",
            "p1",
            "--path",
            "/chat?personaId=p1&scenarioId=s1",
        ]);
        assert!(result.is_err());
    }
}
