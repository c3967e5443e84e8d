//! Toolkit-agnostic controller: owns the session, the transcript, and the
//! bookkeeping for requests in flight on the background worker.
//!
//! Only the thread that owns the `Controller` mutates this state. Network
//! work goes out as `WorkerRequest`s and comes back as `WorkerEvent`s,
//! which the owner feeds to [`Controller::handle_event`].

pub mod export;
pub mod input;
pub mod types;
pub mod worker;


use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use pdfchat_api::{DocumentSession, Reply, Transcript, TurnId};
use pdfchat_common::{PdfChatError, Ticket};
use pdfchat_config::schema::ExportConfig;
use tracing::{debug, info, warn};

pub use input::PromptInput;
pub use types::{Notice, WorkerEvent, WorkerRequest};
pub use worker::{EventSink, Worker};

/// Errors raised locally by the controller, before anything is sent.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("Please select a PDF to analyze")]
    NoDocument,
    #[error("an upload is already in progress")]
    UploadInProgress,
    #[error("no failed prompt to retry")]
    NothingToRetry,
    #[error("background worker has stopped")]
    WorkerStopped,
    #[error(transparent)]
    Chat(#[from] PdfChatError),
}

/// A prompt waiting for its reply.
#[derive(Debug)]
struct PendingExchange {
    turn: TurnId,
    prompt: String,
}

pub struct Controller {
    requests: Sender<WorkerRequest>,
    export: ExportConfig,
    /// Document chosen by the user; not uploaded until `analyze`.
    document: Option<PathBuf>,
    /// Set only by a successful upload.
    session: Option<DocumentSession>,
    /// Ticket of the upload in flight. While set, `analyze` is refused.
    upload: Option<Ticket>,
    transcript: Transcript,
    pending: HashMap<Ticket, PendingExchange>,
    last_failed: Option<String>,
}

impl Controller {
    pub fn new(requests: Sender<WorkerRequest>, export: ExportConfig) -> Self {
        Self {
            requests,
            export,
            document: None,
            session: None,
            upload: None,
            transcript: Transcript::new(),
            pending: HashMap::new(),
            last_failed: None,
        }
    }

    pub fn select_document(&mut self, path: impl Into<PathBuf>) -> Vec<Notice> {
        let path = path.into();
        let notice = Notice::Status(format!("Selected {}", path.display()));
        self.document = Some(path);
        vec![notice]
    }

    /// Upload the selected document in the background.
    pub fn analyze(&mut self) -> Result<Vec<Notice>, ControllerError> {
        if self.upload.is_some() {
            return Err(ControllerError::UploadInProgress);
        }
        let path = self.document.clone().ok_or(ControllerError::NoDocument)?;

        let ticket = Ticket::new();
        self.requests
            .send(WorkerRequest::Upload {
                ticket: ticket.clone(),
                path: path.clone(),
            })
            .map_err(|_| ControllerError::WorkerStopped)?;

        debug!(%ticket, path = %path.display(), "Upload dispatched");
        self.upload = Some(ticket);
        Ok(vec![Notice::Status(format!(
            "Uploading document {}...",
            path.display()
        ))])
    }

    /// Dispatch `prompt` against the current session.
    ///
    /// The prompt is used as given; callers strip input artifacts first.
    pub fn submit_prompt(&mut self, prompt: String) -> Result<Vec<Notice>, ControllerError> {
        if prompt.trim().is_empty() {
            return Err(PdfChatError::EmptyPrompt.into());
        }
        let session = self.session.clone().ok_or(PdfChatError::NoActiveSession)?;

        let ticket = Ticket::new();
        let sent = self.requests.send(WorkerRequest::Exchange {
            ticket: ticket.clone(),
            session,
            prompt: prompt.clone(),
        });
        if sent.is_err() {
            self.transcript.record(
                prompt.clone(),
                Reply::Failed(ControllerError::WorkerStopped.to_string()),
            );
            self.last_failed = Some(prompt);
            return Err(ControllerError::WorkerStopped);
        }

        let turn = self.transcript.begin(prompt.clone());
        debug!(%ticket, turn = turn.index(), "Exchange dispatched");
        self.pending.insert(ticket, PendingExchange { turn, prompt });
        Ok(vec![Notice::Processing])
    }

    /// Resubmit the most recent prompt whose exchange failed.
    pub fn retry(&mut self) -> Result<Vec<Notice>, ControllerError> {
        let prompt = self.last_failed.take().ok_or(ControllerError::NothingToRetry)?;
        match self.submit_prompt(prompt.clone()) {
            Ok(notices) => Ok(notices),
            Err(e) => {
                if self.last_failed.is_none() {
                    self.last_failed = Some(prompt);
                }
                Err(e)
            }
        }
    }

    /// Apply a completed background request.
    pub fn handle_event(&mut self, event: WorkerEvent) -> Vec<Notice> {
        match event {
            WorkerEvent::Uploaded { ticket, result } => self.on_uploaded(ticket, result),
            WorkerEvent::Replied { ticket, result } => self.on_replied(ticket, result),
        }
    }

    fn on_uploaded(
        &mut self,
        ticket: Ticket,
        result: Result<DocumentSession, PdfChatError>,
    ) -> Vec<Notice> {
        if self.upload.as_ref() != Some(&ticket) {
            debug!(%ticket, "Ignoring stale upload result");
            return Vec::new();
        }
        self.upload = None;

        match result {
            Ok(session) => {
                if let Some(old) = &self.session {
                    info!(old = %old.source_id(), new = %session.source_id(), "Replacing document session");
                }
                self.session = Some(session);
                vec![Notice::Status("READY TO CHAT!".into())]
            }
            Err(e) => {
                warn!(error = %e, "Upload failed");
                vec![Notice::Failure(e.to_string())]
            }
        }
    }

    fn on_replied(&mut self, ticket: Ticket, result: Result<String, PdfChatError>) -> Vec<Notice> {
        let Some(pending) = self.pending.remove(&ticket) else {
            debug!(%ticket, "Ignoring reply for unknown ticket");
            return Vec::new();
        };

        match result {
            Ok(text) => {
                self.transcript.complete(pending.turn, Reply::Text(text.clone()));
                vec![Notice::Reply {
                    prompt: pending.prompt,
                    text,
                }]
            }
            Err(e) => {
                warn!(error = %e, "Exchange failed");
                let message = e.to_string();
                self.transcript
                    .complete(pending.turn, Reply::Failed(message.clone()));
                self.last_failed = Some(pending.prompt);
                vec![
                    Notice::Failure(message),
                    Notice::Status("Type /retry to resend the prompt".into()),
                ]
            }
        }
    }

    /// Reset the conversation and re-enable `analyze`.
    ///
    /// The current session is kept. Results for requests dispatched before
    /// the clear are dropped when they arrive.
    pub fn clear(&mut self) -> Vec<Notice> {
        self.transcript.clear();
        self.pending.clear();
        self.upload = None;
        self.last_failed = None;
        vec![Notice::Status("Cleared".into())]
    }

    /// Write the transcript to `target`, or to a fresh name next to the
    /// selected document.
    pub fn export(&self, target: Option<PathBuf>) -> Result<(PathBuf, Vec<Notice>), ControllerError> {
        let path = match target {
            Some(path) => path,
            None => export::output_filename(
                &self.export_dir(),
                self.document.as_deref(),
                &self.export.suffix,
                &self.export.extension,
            ),
        };
        export::write_transcript(&path, &self.transcript).map_err(PdfChatError::from)?;
        Ok((
            path.clone(),
            vec![Notice::Status(format!("Chat exported! ({})", path.display()))],
        ))
    }

    fn export_dir(&self) -> PathBuf {
        self.document
            .as_deref()
            .and_then(Path::parent)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn status(&self) -> Vec<Notice> {
        let document = self
            .document
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "none".into());
        let session = self
            .session
            .as_ref()
            .map(|s| s.source_id().to_string())
            .unwrap_or_else(|| "none".into());
        vec![Notice::Status(format!(
            "document: {document}; session: {session}; uploading: {}; turns: {}; pending: {}",
            if self.is_uploading() { "yes" } else { "no" },
            self.transcript.len(),
            self.pending.len(),
        ))]
    }

    pub fn session(&self) -> Option<&DocumentSession> {
        self.session.as_ref()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_uploading(&self) -> bool {
        self.upload.is_some()
    }

    /// Whether any upload or exchange is still outstanding.
    pub fn has_in_flight(&self) -> bool {
        self.upload.is_some() || !self.pending.is_empty()
    }
}
