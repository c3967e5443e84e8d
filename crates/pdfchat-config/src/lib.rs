//! pdfchat configuration system.
//!
//! TOML-based configuration with validation. All sections use sensible
//! defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pdfchat_config::load_config;
//!
//! let loaded = load_config().expect("failed to load config");
//! if let Some(problems) = &loaded.repaired {
//!     eprintln!("{problems}");
//! }
//! println!("{}", loaded.config.api.base_url);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{PdfChatConfig, CONFIG_SCHEMA_VERSION};

use std::path::Path;

use pdfchat_common::ConfigError;

/// A config as loaded from disk.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: PdfChatConfig,
    /// Fields that failed validation and were reset to their defaults.
    pub repaired: Option<ConfigError>,
}

impl LoadedConfig {
    fn repair(mut config: PdfChatConfig) -> Self {
        let repaired = validation::repair(&mut config);
        Self { config, repaired }
    }
}

/// Load config from the platform default path.
///
/// Creates a documented default `config.toml` if none exists. Invalid
/// values are reset to their defaults; everything else is kept.
pub fn load_config() -> Result<LoadedConfig, ConfigError> {
    Ok(LoadedConfig::repair(toml_loader::load_default()?))
}

/// Load config from an explicit path, resetting invalid values like
/// [`load_config`].
pub fn load_config_from(path: &Path) -> Result<LoadedConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    Ok(LoadedConfig::repair(toml_loader::load_from_path(path)?))
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &PdfChatConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let config = PdfChatConfig::default();
        let json = config_to_json(&config);
        assert!(json.contains("\"api\""));
        assert!(json.contains("\"export\""));
        assert!(json.contains("\"logging\""));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let config = PdfChatConfig::default();
        let json = config_to_json(&config);
        let parsed: PdfChatConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.api.base_url, "https://api.chatpdf.com/v1");
        assert_eq!(parsed.api.key_env, "CHAT_PDF_KEY");
        assert_eq!(parsed.export.suffix, "_chat");
    }

    #[test]
    fn load_config_from_missing_path_is_file_not_found() {
        let err = load_config_from(std::path::Path::new("/tmp/pdfchat_no_such_config.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn load_config_from_keeps_valid_fields_when_one_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\nkey_env = \"MY_KEY\"\nupload_timeout_secs = 3600\n\n[export]\nsuffix = \"_notes\"\n",
        )
        .unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert!(matches!(loaded.repaired, Some(ConfigError::ValidationError(ref m)) if m.contains("upload_timeout_secs")));
        assert_eq!(loaded.config.api.key_env, "MY_KEY");
        assert_eq!(loaded.config.export.suffix, "_notes");
        assert_eq!(loaded.config.api.upload_timeout_secs, 300);
    }

    #[test]
    fn load_config_from_valid_file_has_nothing_repaired() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nrequest_timeout_secs = 30\n").unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert!(loaded.repaired.is_none());
        assert_eq!(loaded.config.api.request_timeout_secs, 30);
    }
}
