//! PDF alert export and delivery.

use std::sync::Arc;

use integration_sdk::{EmailAttachment, MailTransport, OutgoingEmail, PdfRenderer, ServiceError};

use crate::error::PipelineError;

pub const NO_HTML: &str = "No HTML content provided.";
pub const ALERT_SUBJECT: &str = "ALERT: Ad Render Failure Report";
pub const ALERT_ATTACHMENT_NAME: &str = "ad_failure_report.pdf";
pub const ALERT_BODY: &str = "Please find attached the Ad Render Failure Report. \
This report contains detailed information about a failure event.";

/// Renders alert HTML to PDF and mails it to the alert recipient
pub struct AlertService {
    renderer: Arc<dyn PdfRenderer>,
    mailer: Arc<dyn MailTransport>,
    sender: Option<String>,
    recipient: Option<String>,
}

impl AlertService {
    pub fn new(
        renderer: Arc<dyn PdfRenderer>,
        mailer: Arc<dyn MailTransport>,
        sender: Option<String>,
        recipient: Option<String>,
    ) -> Self {
        Self {
            renderer,
            mailer,
            sender,
            recipient,
        }
    }

    pub async fn send_alert(&self, html: Option<&str>) -> Result<(), PipelineError> {
        let html = html
            .filter(|html| !html.is_empty())
            .ok_or_else(|| PipelineError::invalid_input(NO_HTML))?;

        // Removed when `pdf` drops, on every path out of this function.
        let pdf = tempfile::Builder::new()
            .prefix("ad-alert-")
            .suffix(".pdf")
            .tempfile()
            .map_err(ServiceError::from)?;

        self.renderer.render_to_file(html, pdf.path()).await?;
        let data = tokio::fs::read(pdf.path())
            .await
            .map_err(|source| PipelineError::Io {
                path: pdf.path().to_path_buf(),
                source,
            })?;
        tracing::debug!(bytes = data.len(), path = %pdf.path().display(), "rendered alert PDF");

        let email = OutgoingEmail {
            from: self.sender.clone().ok_or_else(|| {
                ServiceError::configuration(
                    "EMAIL_USERNAME is not set; no sender address for alerts",
                )
            })?,
            to: vec![self.recipient.clone().ok_or_else(|| {
                ServiceError::configuration("ALERT_EMAIL is not set; no alert recipient")
            })?],
            subject: ALERT_SUBJECT.to_string(),
            body: ALERT_BODY.to_string(),
            attachments: vec![EmailAttachment {
                filename: ALERT_ATTACHMENT_NAME.to_string(),
                content_type: "application/pdf".to_string(),
                data,
            }],
        };

        self.mailer.send(email).await?;
        tracing::info!("alert email sent");
        Ok(())
    }
}
