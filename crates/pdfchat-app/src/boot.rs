//! Process startup: environment, logging, configuration, and client setup.

use std::path::Path;
use std::time::Duration;

use pdfchat_api::{ChatPdfConfig, Credential};
use pdfchat_common::ConfigError;
use pdfchat_config::schema::ApiConfig;
use pdfchat_config::PdfChatConfig;
use tracing_subscriber::EnvFilter;

use crate::cli::Args;

/// Load environment variables from a `.env` file (KEY=VALUE lines).
///
/// Variables already set in the environment win over the file.
pub fn load_dotenv(path: &Path) {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return;
    };
    for (key, value) in parse_dotenv(&contents) {
        if std::env::var(key).is_err() {
            std::env::set_var(key, value);
        }
    }
}

fn parse_dotenv(contents: &str) -> Vec<(&str, &str)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let key = key.trim();
            let key = key.strip_prefix("export ").unwrap_or(key).trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            (key, value)
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// Crates whose log output is controlled by the level setting.
const LOG_TARGETS: &[&str] = &["pdfchat", "pdfchat_api", "pdfchat_config"];

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` is honored; each comma-separated entry of `directives` is
/// added on top of it.
pub fn init_logging(directives: &str) {
    let mut filter = EnvFilter::from_default_env();
    for part in directives.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => eprintln!("ignoring invalid log directive {part:?}: {e}"),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// The log directives from `--log-level`, else from the config.
///
/// A bare level applies to every pdfchat crate; anything containing `=`
/// is passed through as written.
pub fn log_directive(args: &Args, config: &PdfChatConfig) -> String {
    let level = match args.log_level.as_deref() {
        Some(custom) if custom.contains('=') => return custom.to_string(),
        Some(level) => level,
        None => config.logging.level.directive(),
    };
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Load the config from `--config` or the platform default path.
///
/// Fields that fail validation are reset to their defaults and reported
/// in the returned error; the rest of the file is kept. Only an unreadable
/// or unparsable file falls back to full defaults. The error is returned
/// so it can be logged once logging is up.
pub fn load_configuration(args: &Args) -> (PdfChatConfig, Option<ConfigError>) {
    let loaded = match args.config.as_deref() {
        Some(path) => pdfchat_config::load_config_from(path),
        None => pdfchat_config::load_config(),
    };
    let (mut config, err) = match loaded {
        Ok(loaded) => (loaded.config, loaded.repaired),
        Err(e) => (PdfChatConfig::default(), Some(e)),
    };

    if let Some(ref key_env) = args.key_env {
        config.api.key_env = key_env.clone();
    }
    if let Some(ref base_url) = args.base_url {
        config.api.base_url = base_url.clone();
    }
    (config, err)
}

/// Build the HTTP client configuration from the `[api]` section.
pub fn client_config(api: &ApiConfig, credential: Credential) -> ChatPdfConfig {
    ChatPdfConfig::new(credential)
        .with_base_url(api.base_url.clone())
        .with_connect_timeout(Duration::from_secs(api.connect_timeout_secs.into()))
        .with_request_timeout(Duration::from_secs(api.request_timeout_secs.into()))
        .with_upload_timeout(Duration::from_secs(api.upload_timeout_secs.into()))
}
