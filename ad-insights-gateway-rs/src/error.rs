//! Error types for the gateway.
//!
//! [`PipelineError`] is what the services return. Handlers turn it into an
//! [`ApiError`], which owns the HTTP status and body. Upstream causes are
//! logged there and never sent to the client.

use std::path::PathBuf;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use integration_sdk::ServiceError;
use serde_json::json;
use shared_types::DataError;
use thiserror::Error;

use crate::prompts::TemplateError;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The request is missing something the caller must supply
    #[error("{0}")]
    InvalidInput(String),

    #[error("prompt template {name}: {source}")]
    Template {
        name: String,
        #[source]
        source: TemplateError,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Upstream(#[from] ServiceError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("failed to render page: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("failed to register template: {0}")]
    TemplateRegistration(#[from] handlebars::TemplateError),
}

impl PipelineError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        PipelineError::InvalidInput(message.into())
    }
}

/// An error ready to be sent as an HTTP response
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400 with `{"error": msg}`
    #[error("bad request: {0}")]
    BadRequest(String),

    /// 404 with `{"error": msg}`
    #[error("not found: {0}")]
    NotFound(String),

    /// 500 with `{"success": false, "error": msg}`; `msg` is fixed per endpoint
    #[error("upstream failure: {0}")]
    Upstream(&'static str),
}

impl ApiError {
    /// Classify a service failure. Input errors keep their message; anything
    /// else is logged with its cause and reported as `public_message`.
    pub fn from_pipeline(err: PipelineError, public_message: &'static str) -> Self {
        match err {
            PipelineError::InvalidInput(message) => ApiError::BadRequest(message),
            other => {
                tracing::error!(error = %other, "{}", public_message);
                ApiError::Upstream(public_message)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::BadRequest(message) | ApiError::NotFound(message) => {
                json!({ "error": message })
            }
            ApiError::Upstream(message) => json!({ "success": false, "error": message }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "rejected request body");
        ApiError::BadRequest(rejection.body_text())
    }
}
