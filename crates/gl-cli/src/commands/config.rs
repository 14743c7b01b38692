use std::path::Path;

use anyhow::Context;
use gl_core::config::{Config, ConfigError};

/// Load `path` if it exists. A missing file means defaults; a broken one also
/// falls back to defaults but hands the error back so it can be reported.
pub fn load_with_fallback(path: &Path) -> (Config, Option<ConfigError>) {
    match Config::load_or_default(path) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    }
}

/// Run the `config` subcommand: print the effective config, or write the
/// defaults to `path` with `--init`.
pub fn run(config: &Config, init: bool, path: &Path) -> anyhow::Result<String> {
    if !init {
        return Ok(config.to_toml()?);
    }

    if path.exists() {
        anyhow::bail!(
            "{} already exists; remove it first or edit it in place",
            path.display()
        );
    }
    Config::default()
        .save_to(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote default config");
    Ok(format!("Wrote default config to {}\n", path.display()))
}
