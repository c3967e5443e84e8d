//! API key resolution from the process environment.

use std::fmt;

use pdfchat_common::PdfChatError;

/// The API key sent with every request. Immutable once resolved.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw key, for placing in a request header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// Read the credential named `name` from the environment.
///
/// Fails with `MissingCredential` if the variable is unset, empty, or not
/// valid unicode. Callers treat that as fatal.
pub fn resolve(name: &str) -> Result<Credential, PdfChatError> {
    resolve_with(name, |key| std::env::var(key).ok())
}

/// Like [`resolve`], with the lookup supplied by the caller.
pub fn resolve_with(
    name: &str,
    lookup: impl FnOnce(&str) -> Option<String>,
) -> Result<Credential, PdfChatError> {
    match lookup(name) {
        Some(value) if !value.is_empty() => Ok(Credential(value)),
        _ => Err(PdfChatError::MissingCredential(name.to_string())),
    }
}
