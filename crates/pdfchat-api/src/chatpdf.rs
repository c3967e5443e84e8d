//! ChatPDF API client.
//!
//! Implements the `DocumentChat` trait against the ChatPDF REST API
//! (https://api.chatpdf.com/v1). Both endpoints authenticate with the
//! `x-api-key` header.

mod api;
mod client;
mod config;

pub use client::ChatPdfClient;
pub use config::ChatPdfConfig;
