//! Tests for SMTP message construction and credential handling

#[cfg(test)]
mod tests {
    use crate::config::SmtpConfig;
    use crate::core::{EmailAttachment, MailTransport, OutgoingEmail};
    use crate::error::ServiceError;
    use crate::services::smtp::{build_message, SmtpMailer};

    fn alert_email() -> OutgoingEmail {
        OutgoingEmail {
            from: "alerts@example.com".to_string(),
            to: vec!["oncall@example.com".to_string()],
            subject: "ALERT: Ad Render Failure Report".to_string(),
            body: "See attached report.".to_string(),
            attachments: vec![EmailAttachment {
                filename: "ad_failure_report.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                data: b"%PDF-1.4".to_vec(),
            }],
        }
    }

    #[test]
    fn test_build_message_with_attachment() {
        let message = build_message(&alert_email()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Subject: ALERT: Ad Render Failure Report"));
        assert!(raw.contains("To: oncall@example.com"));
        assert!(raw.contains("application/pdf"));
        assert!(raw.contains("ad_failure_report.pdf"));
    }

    #[test]
    fn test_build_message_rejects_bad_addresses() {
        let mut email = alert_email();
        email.to = vec!["nobody".to_string()];
        assert!(matches!(build_message(&email), Err(ServiceError::Validation(_))));

        email.to.clear();
        assert!(matches!(build_message(&email), Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_send_without_credentials_is_configuration_error() {
        let mailer = SmtpMailer::new_with_config(SmtpConfig::default()).unwrap();

        let err = mailer.send(alert_email()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Configuration(_)));
    }
}
