//! Remote service configuration.

use serde::{Deserialize, Serialize};

/// Where and how to reach the document-chat service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL the endpoint paths are appended to.
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub key_env: String,
    /// TCP connect timeout in seconds (valid range: 1-120).
    pub connect_timeout_secs: u32,
    /// Timeout for a chat exchange in seconds (valid range: 1-600).
    pub request_timeout_secs: u32,
    /// Timeout for a document upload in seconds (valid range: 1-1800).
    pub upload_timeout_secs: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.chatpdf.com/v1".into(),
            key_env: "CHAT_PDF_KEY".into(),
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
            upload_timeout_secs: 300,
        }
    }
}
