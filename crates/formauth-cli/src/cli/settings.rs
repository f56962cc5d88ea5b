//! Resolve the login configuration from a config file and command-line
//! overrides.

use anyhow::{Context, Result};
use clap::Args;
use formauth::{AutocompleteConfig, ConfigFile, TransportConfig};
use std::path::PathBuf;

/// Where the login configuration comes from.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// JSON config file with the login options.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override one option, e.g. `-o password=s3cret`. Repeatable.
    #[arg(short = 'o', long = "option", value_name = "NAME=VALUE")]
    pub overrides: Vec<String>,

    /// Per-request timeout in milliseconds.
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

/// Load, override and validate.
pub fn resolve(args: &ConfigArgs) -> Result<(AutocompleteConfig, TransportConfig)> {
    let mut file = match &args.config {
        Some(path) => ConfigFile::load(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => ConfigFile::default(),
    };

    for pair in &args.overrides {
        file.options
            .apply_override(pair)
            .with_context(|| format!("invalid --option {pair}"))?;
    }

    if let Some(ms) = args.timeout_ms {
        file.transport.timeout_ms = ms;
    }

    let config = file
        .options
        .validate()
        .context("invalid login configuration")?;

    Ok((config, file.transport))
}
