//! ChatPDF client struct, request building, and response parsing.

use pdfchat_common::{FailureReason, PdfChatError};
use serde::{Deserialize, Serialize};

use crate::Message;

use super::config::ChatPdfConfig;

pub(crate) const API_KEY_HEADER: &str = "x-api-key";
pub(crate) const ADD_FILE_PATH: &str = "/sources/add-file";
pub(crate) const CHAT_MESSAGE_PATH: &str = "/chats/message";

/// ChatPDF API client.
pub struct ChatPdfClient {
    pub(crate) config: ChatPdfConfig,
    pub(crate) http: reqwest::Client,
}

/// Body of `POST /chats/message`.
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    #[serde(rename = "sourceId")]
    pub source_id: &'a str,
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddFileResponse {
    #[serde(rename = "sourceId")]
    pub source_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    pub content: String,
}

/// A failed round trip, before it is labelled as an upload or an exchange.
#[derive(Debug)]
pub(crate) struct Failure {
    pub status: Option<u16>,
    pub body: String,
    pub reason: FailureReason,
}

impl Failure {
    pub(crate) fn local(reason: FailureReason) -> Self {
        Self {
            status: None,
            body: String::new(),
            reason,
        }
    }

    pub(crate) fn transport(status: Option<u16>, err: &reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            FailureReason::TimedOut
        } else {
            FailureReason::Network(err.to_string())
        };
        Self {
            status,
            body: String::new(),
            reason,
        }
    }

    pub(crate) fn into_upload(self) -> PdfChatError {
        PdfChatError::UploadFailed {
            status: self.status,
            body: self.body,
            reason: self.reason,
        }
    }

    pub(crate) fn into_exchange(self) -> PdfChatError {
        PdfChatError::ExchangeFailed {
            status: self.status,
            body: self.body,
            reason: self.reason,
        }
    }
}

impl ChatPdfClient {
    pub fn new(config: ChatPdfConfig) -> Result<Self, PdfChatError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| PdfChatError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ChatPdfConfig {
        &self.config
    }

    /// Join an endpoint path onto the configured base URL.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    pub(crate) fn build_chat_request<'a>(&self, source_id: &'a str, prompt: &str) -> ChatRequest<'a> {
        ChatRequest {
            source_id,
            messages: vec![Message::user(prompt)],
        }
    }

    /// Send a prepared request and read the whole body as text.
    ///
    /// Any status other than 200 is a failure carrying the body.
    pub(crate) async fn round_trip(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<String, Failure> {
        let response = request
            .header(API_KEY_HEADER, self.config.credential.expose())
            .send()
            .await
            .map_err(|e| Failure::transport(None, &e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Failure::transport(Some(status.as_u16()), &e))?;

        if status != reqwest::StatusCode::OK {
            return Err(Failure {
                status: Some(status.as_u16()),
                body,
                reason: FailureReason::HttpStatus,
            });
        }

        Ok(body)
    }

    pub(crate) fn parse_add_file(body: String) -> Result<String, Failure> {
        match serde_json::from_str::<AddFileResponse>(&body) {
            Ok(parsed) if !parsed.source_id.is_empty() => Ok(parsed.source_id),
            Ok(_) => Err(Failure {
                status: Some(200),
                body,
                reason: FailureReason::MalformedBody("empty sourceId".into()),
            }),
            Err(e) => Err(Failure {
                status: Some(200),
                body,
                reason: FailureReason::MalformedBody(e.to_string()),
            }),
        }
    }

    pub(crate) fn parse_chat(body: String) -> Result<String, Failure> {
        match serde_json::from_str::<ChatResponse>(&body) {
            Ok(parsed) => Ok(parsed.content),
            Err(e) => Err(Failure {
                status: Some(200),
                body,
                reason: FailureReason::MalformedBody(e.to_string()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Credential;

    fn client(base_url: &str) -> ChatPdfClient {
        ChatPdfClient::new(ChatPdfConfig::new(Credential::new("KEY1")).with_base_url(base_url))
            .unwrap()
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        assert_eq!(
            client("https://api.chatpdf.com/v1/").endpoint(ADD_FILE_PATH),
            "https://api.chatpdf.com/v1/sources/add-file"
        );
        assert_eq!(
            client("https://api.chatpdf.com/v1").endpoint(CHAT_MESSAGE_PATH),
            "https://api.chatpdf.com/v1/chats/message"
        );
    }

    #[test]
    fn chat_request_has_wire_shape() {
        let c = client("http://localhost");
        let body = serde_json::to_value(c.build_chat_request("src_1", "What is X?")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "sourceId": "src_1",
                "messages": [{"role": "user", "content": "What is X?"}]
            })
        );
    }

    #[test]
    fn parse_add_file_extracts_source_id() {
        let id = ChatPdfClient::parse_add_file(r#"{"sourceId":"abc123"}"#.into()).unwrap();
        assert_eq!(id, "abc123");
    }

    #[test]
    fn parse_add_file_rejects_empty_id() {
        let failure = ChatPdfClient::parse_add_file(r#"{"sourceId":""}"#.into()).unwrap_err();
        assert_eq!(failure.status, Some(200));
        assert!(matches!(failure.reason, FailureReason::MalformedBody(_)));
    }

    #[test]
    fn parse_chat_keeps_content_verbatim() {
        let reply =
            ChatPdfClient::parse_chat(r#"{"content":"  Paris is the capital.\n"}"#.into()).unwrap();
        assert_eq!(reply, "  Paris is the capital.\n");
    }

    #[test]
    fn parse_chat_failure_keeps_raw_body() {
        let failure = ChatPdfClient::parse_chat("<html>oops</html>".into()).unwrap_err();
        assert_eq!(failure.body, "<html>oops</html>");
        assert!(matches!(failure.reason, FailureReason::MalformedBody(_)));
    }

    #[test]
    fn failure_labels_map_to_variants() {
        let upload = Failure::local(FailureReason::FileRead("gone".into())).into_upload();
        assert!(matches!(upload, PdfChatError::UploadFailed { status: None, .. }));

        let exchange = Failure::local(FailureReason::TimedOut).into_exchange();
        assert!(matches!(
            exchange,
            PdfChatError::ExchangeFailed {
                reason: FailureReason::TimedOut,
                ..
            }
        ));
    }
}
