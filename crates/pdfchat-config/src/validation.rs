//! Full configuration validation.
//!
//! Checks numeric ranges and string formats, collecting every problem
//! into a single `ConfigError`. [`repair`] runs the same checks field by
//! field and resets each failing field to its default.

use crate::schema::PdfChatConfig;
use pdfchat_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &PdfChatConfig) -> Result<(), ConfigError> {
    let mut scratch = config.clone();
    collect(&mut scratch, &PdfChatConfig::default(), false)
}

/// Reset every invalid field to its default value.
///
/// Valid fields are kept as loaded. Returns the validation error
/// describing what was reset, if anything was.
pub fn repair(config: &mut PdfChatConfig) -> Option<ConfigError> {
    collect(config, &PdfChatConfig::default(), true).err()
}

fn collect(
    config: &mut PdfChatConfig,
    defaults: &PdfChatConfig,
    reset: bool,
) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    let (api, d) = (&mut config.api, &defaults.api);
    let problem = check_base_url(&api.base_url);
    check_field(&mut errors, reset, &mut api.base_url, &d.base_url, problem);
    let problem = check_key_env(&api.key_env);
    check_field(&mut errors, reset, &mut api.key_env, &d.key_env, problem);

    let timeouts = [
        ("api.connect_timeout_secs", &mut api.connect_timeout_secs, d.connect_timeout_secs, 120),
        ("api.request_timeout_secs", &mut api.request_timeout_secs, d.request_timeout_secs, 600),
        ("api.upload_timeout_secs", &mut api.upload_timeout_secs, d.upload_timeout_secs, 1800),
    ];
    for (name, value, default, max) in timeouts {
        let problem = check_range(name, *value, 1, max);
        check_field(&mut errors, reset, value, &default, problem);
    }

    let (export, d) = (&mut config.export, &defaults.export);
    let problem = check_suffix(&export.suffix);
    check_field(&mut errors, reset, &mut export.suffix, &d.suffix, problem);
    let problem = check_extension(&export.extension);
    check_field(&mut errors, reset, &mut export.extension, &d.extension, problem);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

/// Record `problem`, resetting `value` to `default` when repairing.
fn check_field<T: Clone>(
    errors: &mut Vec<String>,
    reset: bool,
    value: &mut T,
    default: &T,
    problem: Option<String>,
) {
    if let Some(problem) = problem {
        errors.push(problem);
        if reset {
            *value = default.clone();
        }
    }
}

fn check_range(name: &str, value: u32, min: u32, max: u32) -> Option<String> {
    (value < min || value > max).then(|| format!("{name} = {value} is out of range [{min}, {max}]"))
}

fn check_base_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        Some("api.base_url is empty".into())
    } else if !(url.starts_with("https://") || url.starts_with("http://")) {
        Some(format!("api.base_url = {url} must start with http:// or https://"))
    } else {
        None
    }
}

fn check_key_env(key_env: &str) -> Option<String> {
    if key_env.trim().is_empty() {
        Some("api.key_env is empty".into())
    } else if key_env.contains('=') || key_env.contains('\0') {
        Some(format!("api.key_env = {key_env} is not a valid variable name"))
    } else {
        None
    }
}

fn check_suffix(suffix: &str) -> Option<String> {
    if suffix.is_empty() {
        Some("export.suffix is empty".into())
    } else if suffix.contains(['/', '\\']) {
        Some(format!("export.suffix = {suffix} must not contain path separators"))
    } else {
        None
    }
}

fn check_extension(extension: &str) -> Option<String> {
    if extension.is_empty() {
        Some("export.extension is empty".into())
    } else if !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(format!("export.extension = {extension} must be alphanumeric"))
    } else {
        None
    }
}
