//! Service-specific client implementations
//!
//! This module contains client implementations for the external collaborators.

pub mod cohere;
pub mod pdf;
pub mod smtp;
mod common;

pub use common::UserAgent;
