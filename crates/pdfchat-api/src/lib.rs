//! Document-chat engine for pdfchat.
//!
//! Provides the pieces needed to talk to the ChatPDF service:
//! - Credential resolution from the environment
//! - Document upload, producing a `DocumentSession`
//! - Prompt exchange against an uploaded document
//! - An ordered `Transcript` of conversation turns with plain-text export

pub mod chatpdf;
pub mod credential;
pub mod transcript;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pdfchat_common::PdfChatError;

pub use chatpdf::{ChatPdfClient, ChatPdfConfig};
pub use credential::{resolve, resolve_with, Credential};
pub use transcript::{ConversationTurn, Reply, Transcript, TurnId};

/// A remote service that can ingest a document and answer prompts about it.
///
/// Each call is a single stateless round trip. The only state carried
/// between calls is the `DocumentSession` returned by `upload`.
#[async_trait]
pub trait DocumentChat: Send + Sync {
    /// Upload the file at `path` and return the session identifying it remotely.
    async fn upload(&self, path: &Path) -> Result<DocumentSession, PdfChatError>;

    /// Send `prompt` about the session's document and return the reply verbatim.
    async fn exchange(
        &self,
        session: &DocumentSession,
        prompt: &str,
    ) -> Result<String, PdfChatError>;
}

/// Remote-side identity of one uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DocumentSession {
    #[serde(rename = "sourceId")]
    source_id: String,
    local_path: PathBuf,
}

impl DocumentSession {
    pub fn new(source_id: impl Into<String>, local_path: impl Into<PathBuf>) -> Self {
        Self {
            source_id: source_id.into(),
            local_path: local_path.into(),
        }
    }

    /// Opaque identifier assigned by the service.
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// The local file that was uploaded.
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_accessors() {
        let session = DocumentSession::new("src_42", "/tmp/paper.pdf");
        assert_eq!(session.source_id(), "src_42");
        assert_eq!(session.local_path(), Path::new("/tmp/paper.pdf"));
    }

    #[test]
    fn session_serializes_source_id_in_wire_case() {
        let session = DocumentSession::new("abc123", "paper.pdf");
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["sourceId"], "abc123");
    }

    #[test]
    fn message_roles_serialize_lowercase() {
        let msg = Message::user("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "hello"}));
    }
}
