pub mod ask;
pub mod chat;
pub mod config;

use clap::{Parser, Subcommand};

/// chatwidget: lead-capturing website chat widget host.
#[derive(Debug, Parser)]
#[command(name = "chatwidget", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP host (default when no subcommand is given).
    Serve,
    /// Run one widget conversation interactively in the terminal.
    Chat,
    /// Answer a single question from the topic table and exit.
    Ask {
        /// The visitor's question.
        question: String,
    },
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and topic table and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path specified by `CW_CONFIG` (or
/// `config.toml` by default). A missing file yields the defaults.
/// Returns the parsed [`Config`](cw_domain::config::Config) and the path
/// that was used.
pub fn load_config() -> anyhow::Result<(cw_domain::config::Config, String)> {
    let config_path = std::env::var("CW_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let config = load_config_from(std::path::Path::new(&config_path))?;
    Ok((config, config_path))
}

pub fn load_config_from(path: &std::path::Path) -> anyhow::Result<cw_domain::config::Config> {
    if !path.exists() {
        return Ok(cw_domain::config::Config::default());
    }
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("reading {}: {e}", path.display()))?;
    toml::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing {}: {e}", path.display()))
}
