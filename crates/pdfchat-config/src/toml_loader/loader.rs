//! Reading `config.toml` into a [`PdfChatConfig`].

use std::path::Path;

use pdfchat_common::ConfigError;
use tracing::{info, warn};

use crate::schema::PdfChatConfig;
use crate::validation;

use super::paths::{create_default_config, default_config_path};

/// Parse the pdfchat config at `path`.
///
/// Missing sections and keys take their defaults, so a file holding only
/// `[api] key_env = "..."` is enough. Out-of-range values are reported
/// with a warning but returned untouched; callers decide whether to
/// repair them.
pub fn load_from_path(path: &Path) -> Result<PdfChatConfig, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("cannot read {}: {e}", path.display())))?;

    let config: PdfChatConfig = toml::from_str(&content).map_err(|e| {
        ConfigError::ParseError(format!("{} is not valid pdfchat TOML: {e}", path.display()))
    })?;

    if let Err(e) = validation::validate(&config) {
        warn!(path = %path.display(), "{e}");
    }

    info!(path = %path.display(), base_url = %config.api.base_url, "Config loaded");
    Ok(config)
}

/// Load `config.toml` from the pdfchat config directory.
///
/// On first run the commented template is written there and the defaults
/// are returned, so the user has a file showing `key_env`, the timeouts
/// and the export naming to edit.
pub fn load_default() -> Result<PdfChatConfig, ConfigError> {
    let path = default_config_path()?;
    if path.exists() {
        return load_from_path(&path);
    }

    create_default_config(&path)?;
    info!(path = %path.display(), "Wrote default pdfchat config");
    Ok(PdfChatConfig::default())
}
