//! Where pdfchat keeps its config file.

use std::path::{Path, PathBuf};

use pdfchat_common::ConfigError;

use super::template::default_config_toml;

const APP_DIR: &str = "pdfchat";
const CONFIG_FILE: &str = "config.toml";

/// `<platform config dir>/pdfchat/config.toml`, e.g.
/// `~/.config/pdfchat/config.toml` on Linux.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let base = dirs::config_dir().ok_or_else(|| {
        ConfigError::ParseError("no platform config directory for pdfchat".into())
    })?;
    Ok(base.join(APP_DIR).join(CONFIG_FILE))
}

/// Write the commented pdfchat template to `path`, creating its directory.
///
/// An existing file is overwritten; callers check for one first.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let write_failed =
        |e: std::io::Error| ConfigError::ParseError(format!("cannot write {}: {e}", path.display()));

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(write_failed)?;
    }
    std::fs::write(path, default_config_toml()).map_err(write_failed)
}
