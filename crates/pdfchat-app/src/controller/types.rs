//! Messages exchanged between the controller and the background worker.

use std::path::PathBuf;

use pdfchat_api::DocumentSession;
use pdfchat_common::{PdfChatError, Ticket};

/// Work the controller hands to the background worker.
#[derive(Debug)]
pub enum WorkerRequest {
    Upload {
        ticket: Ticket,
        path: PathBuf,
    },
    Exchange {
        ticket: Ticket,
        session: DocumentSession,
        prompt: String,
    },
}

/// Completed work delivered back to the controller's thread.
#[derive(Debug)]
pub enum WorkerEvent {
    Uploaded {
        ticket: Ticket,
        result: Result<DocumentSession, PdfChatError>,
    },
    Replied {
        ticket: Ticket,
        result: Result<String, PdfChatError>,
    },
}

/// Something the surface should show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Progress or state change ("READY TO CHAT!").
    Status(String),
    /// A prompt was dispatched and awaits its reply.
    Processing,
    /// The reply to `prompt`.
    Reply { prompt: String, text: String },
    /// An operation failed; shown instead of its result.
    Failure(String),
}
