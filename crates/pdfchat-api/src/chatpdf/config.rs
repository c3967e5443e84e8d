//! ChatPDF client configuration.

use std::fmt;
use std::time::Duration;

use crate::Credential;

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.chatpdf.com/v1";

/// ChatPDF API client configuration.
#[derive(Clone)]
pub struct ChatPdfConfig {
    pub credential: Credential,
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub upload_timeout: Duration,
}

impl fmt::Debug for ChatPdfConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatPdfConfig")
            .field("credential", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("upload_timeout", &self.upload_timeout)
            .finish()
    }
}

impl ChatPdfConfig {
    pub fn new(credential: Credential) -> Self {
        Self {
            credential,
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            upload_timeout: Duration::from_secs(300),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_upload_timeout(mut self, timeout: Duration) -> Self {
        self.upload_timeout = timeout;
        self
    }
}
