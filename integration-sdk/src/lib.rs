//! # Integration SDK
//!
//! Typed clients for the external services behind the ad insights gateway.
//!
//! This crate provides:
//!
//! - Collaborator traits the gateway is written against (`TextGenerator`,
//!   `Reranker`, `PdfRenderer`, `MailTransport`)
//! - A Cohere client implementing chat generation and reranking over HTTP
//! - An HTML-to-PDF renderer that drives an external command
//! - An SMTP mailer with attachment support
//! - A normalized error type and configuration providers
//!
//! No client retries. A failed call surfaces as a `ServiceError` and the
//! caller decides what to do with it.

pub mod core;
pub use core::{
    ChatMessage, EmailAttachment, MailTransport, OutgoingEmail, PdfRenderer, RerankRequest,
    RerankResult, Reranker, Role, TextGenerator,
};

pub mod services;
pub use services::{cohere, pdf, smtp};

pub mod error;
pub use error::{ErrorContext, Result, ServiceError};

pub mod config;
pub use config::{ConfigProvider, ConfigProviderExt, EnvConfigProvider, MemoryConfigProvider};

#[cfg(test)]
mod tests;
