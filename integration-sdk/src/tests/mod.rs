//! Unit tests for the Integration SDK
//!
//! This module contains tests for the clients, errors and configuration.

pub mod cohere_mock_tests;
pub mod error_tests;
pub mod pdf_tests;
pub mod smtp_tests;
