pub mod errors;
pub mod id;

pub use errors::{ConfigError, FailureReason, PdfChatError};
pub use id::Ticket;
