//! Configuration schema types for pdfchat.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod api;
mod export;
mod system;

pub use api::*;
pub use export::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for pdfchat.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PdfChatConfig {
    pub api: ApiConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_correct_api() {
        let config = PdfChatConfig::default();
        assert_eq!(config.api.base_url, "https://api.chatpdf.com/v1");
        assert_eq!(config.api.key_env, "CHAT_PDF_KEY");
        assert_eq!(config.api.connect_timeout_secs, 10);
        assert_eq!(config.api.request_timeout_secs, 120);
        assert_eq!(config.api.upload_timeout_secs, 300);
    }

    #[test]
    fn default_config_has_correct_export() {
        let config = PdfChatConfig::default();
        assert_eq!(config.export.suffix, "_chat");
        assert_eq!(config.export.extension, "txt");
    }

    #[test]
    fn default_logging_is_info() {
        let config = PdfChatConfig::default();
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.level.directive(), "info");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: PdfChatConfig = toml::from_str(
            r#"
[api]
key_env = "MY_KEY"
"#,
        )
        .unwrap();
        assert_eq!(config.api.key_env, "MY_KEY");
        assert_eq!(config.api.base_url, "https://api.chatpdf.com/v1");
        assert_eq!(config.export.suffix, "_chat");
    }

    #[test]
    fn log_level_parses_uppercase() {
        let config: PdfChatConfig = toml::from_str(
            r#"
[logging]
level = "WARNING"
"#,
        )
        .unwrap();
        assert_eq!(config.logging.level, LogLevel::Warning);
        assert_eq!(config.logging.level.directive(), "warn");
    }
}
