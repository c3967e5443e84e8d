//! DocumentChat trait implementation for ChatPdfClient (upload + exchange).

use std::path::Path;

use async_trait::async_trait;
use pdfchat_common::{FailureReason, PdfChatError};
use tracing::{debug, info, warn};

use crate::{DocumentChat, DocumentSession};

use super::client::{ChatPdfClient, Failure, ADD_FILE_PATH, CHAT_MESSAGE_PATH};

const UPLOAD_MIME: &str = "application/octet-stream";

#[async_trait]
impl DocumentChat for ChatPdfClient {
    async fn upload(&self, path: &Path) -> Result<DocumentSession, PdfChatError> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| Failure::local(FailureReason::FileRead(e.to_string())).into_upload())?;

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());

        debug!(path = %path.display(), size = data.len(), "ChatPDF upload request");

        let file_part = reqwest::multipart::Part::bytes(data)
            .file_name(filename)
            .mime_str(UPLOAD_MIME)
            .map_err(|e| PdfChatError::InvalidConfig(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", file_part);

        let request = self
            .http
            .post(self.endpoint(ADD_FILE_PATH))
            .timeout(self.config.upload_timeout)
            .multipart(form);

        let source_id = match self.round_trip(request).await.and_then(Self::parse_add_file) {
            Ok(id) => id,
            Err(failure) => {
                warn!(status = ?failure.status, reason = %failure.reason, "ChatPDF upload failed");
                return Err(failure.into_upload());
            }
        };

        info!(source_id = %source_id, "Document uploaded");
        Ok(DocumentSession::new(source_id, path))
    }

    async fn exchange(
        &self,
        session: &DocumentSession,
        prompt: &str,
    ) -> Result<String, PdfChatError> {
        let body = self.build_chat_request(session.source_id(), prompt);

        debug!(source_id = %session.source_id(), len = prompt.len(), "ChatPDF message request");

        let request = self
            .http
            .post(self.endpoint(CHAT_MESSAGE_PATH))
            .timeout(self.config.request_timeout)
            .json(&body);

        match self.round_trip(request).await.and_then(Self::parse_chat) {
            Ok(content) => {
                debug!(len = content.len(), "ChatPDF reply received");
                Ok(content)
            }
            Err(failure) => {
                warn!(status = ?failure.status, reason = %failure.reason, "ChatPDF exchange failed");
                Err(failure.into_exchange())
            }
        }
    }
}
