use std::fmt;
use std::path::PathBuf;

/// Maximum number of body characters shown in an error's display text.
/// The full body is kept on the error value.
const BODY_PREVIEW_CHARS: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Why a remote call did not produce a usable result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The service answered with a status other than 200.
    HttpStatus,
    /// The request never completed (DNS, connect, reset, ...).
    Network(String),
    /// The configured timeout elapsed before a response arrived.
    TimedOut,
    /// The service answered 200 but the body was not the expected JSON.
    MalformedBody(String),
    /// The local file could not be read before uploading.
    FileRead(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpStatus => write!(f, "unexpected status"),
            Self::Network(e) => write!(f, "network error: {e}"),
            Self::TimedOut => write!(f, "timed out"),
            Self::MalformedBody(e) => write!(f, "malformed response: {e}"),
            Self::FileRead(e) => write!(f, "could not read file: {e}"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PdfChatError {
    #[error("{0} key not found")]
    MissingCredential(String),

    #[error("upload failed: {}", describe(.status, .reason, .body))]
    UploadFailed {
        status: Option<u16>,
        body: String,
        reason: FailureReason,
    },

    #[error("exchange failed: {}", describe(.status, .reason, .body))]
    ExchangeFailed {
        status: Option<u16>,
        body: String,
        reason: FailureReason,
    },

    #[error("no active document session; analyze a PDF first")]
    NoActiveSession,

    #[error("prompt is empty")]
    EmptyPrompt,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PdfChatError {
    /// HTTP status observed by a failed upload or exchange, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UploadFailed { status, .. } | Self::ExchangeFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// Failure reason of a failed upload or exchange.
    pub fn reason(&self) -> Option<&FailureReason> {
        match self {
            Self::UploadFailed { reason, .. } | Self::ExchangeFailed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

fn describe(status: &Option<u16>, reason: &FailureReason, body: &str) -> String {
    let mut out = match status {
        Some(code) => format!("HTTP {code}, {reason}"),
        None => reason.to_string(),
    };
    let body = body.trim();
    if !body.is_empty() {
        let preview: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
        out.push_str(": ");
        out.push_str(&preview);
    }
    out
}
