use anyhow::Result;
use colored::Colorize;
use parley_core::config::ClientConfig;
use parley_infrastructure::ConfigService;

pub fn show(service: &ConfigService) -> Result<()> {
    let mut config = service.get_config()?;
    if config.api.api_key.is_some() {
        config.api.api_key = Some("***".to_string());
    }

    println!(
        "{}",
        format!("# {}", service.path().display()).bright_black()
    );
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

pub fn init(service: &ConfigService) -> Result<()> {
    if service.path().exists() {
        println!(
            "{}",
            format!("Config already exists at {}", service.path().display()).yellow()
        );
        return Ok(());
    }

    service.save(&ClientConfig::default())?;
    tracing::info!(path = %service.path().display(), "[Config] Wrote default config");
    println!(
        "{}",
        format!("Wrote default config to {}", service.path().display()).bright_green()
    );
    Ok(())
}
