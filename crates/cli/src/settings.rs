//! `vaudit config` and config-file resolution.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use vaudit_recon::AuditConfig;

use crate::exit_codes::{audit_exit_code, EXIT_INVALID_CONFIG};
use crate::CliError;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Check a config file without running any audit
    #[command(after_help = "\
Examples:
  vaudit config validate audit.toml")]
    Validate {
        /// Path to the audit TOML file
        path: PathBuf,
    },

    /// Print the effective config as TOML
    #[command(after_help = "\
Examples:
  vaudit config show
  vaudit config show --config audit.toml > my-audit.toml")]
    Show {
        /// Config file (default: <config dir>/vaudit/audit.toml, else built-in)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

pub fn cmd_config(cmd: ConfigCommands) -> Result<(), CliError> {
    match cmd {
        ConfigCommands::Validate { path } => {
            let config = read_config(&path)?;
            eprintln!(
                "valid: duplicate names resolved as {}, key-join {}",
                config.mapping.duplicate_names,
                if config.key_join.is_configured() { "configured" } else { "off" },
            );
            Ok(())
        }
        ConfigCommands::Show { config } => {
            let (config, source) = resolve_config(config.as_deref())?;
            let text = config.to_toml().map_err(|e| CliError::audit(&e))?;
            eprintln!("# source: {source}");
            print!("{text}");
            Ok(())
        }
    }
}

/// Per-user config location: `<config dir>/vaudit/audit.toml`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vaudit")
        .join("audit.toml")
}

fn read_config(path: &Path) -> Result<AuditConfig, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| CliError {
        code: EXIT_INVALID_CONFIG,
        message: format!("cannot read config {}: {e}", path.display()),
        hint: None,
    })?;
    AuditConfig::from_toml(&text).map_err(|e| CliError {
        code: audit_exit_code(&e),
        message: format!("{}: {e}", path.display()),
        hint: Some("run `vaudit config show` for the full list of settings".into()),
    })
}

/// `--config` wins; then the per-user file if present; then built-in
/// defaults. Returns the config and a label naming where it came from.
pub fn resolve_config(explicit: Option<&Path>) -> Result<(AuditConfig, String), CliError> {
    if let Some(path) = explicit {
        return Ok((read_config(path)?, path.display().to_string()));
    }

    let user = default_config_path();
    if user.is_file() {
        log::debug!("using config {}", user.display());
        return Ok((read_config(&user)?, user.display().to_string()));
    }

    Ok((AuditConfig::standard(), "built-in defaults".to_string()))
}
