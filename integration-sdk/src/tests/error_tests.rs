//! Tests for error handling functionality

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;

    use crate::error::{mapping, ErrorContext, ServiceError};

    #[test]
    fn test_service_error_messages() {
        assert_eq!(
            ServiceError::network("Connection failed").to_string(),
            "Network error: Connection failed"
        );
        assert_eq!(
            ServiceError::authentication("Invalid credentials").to_string(),
            "Authentication error: Invalid credentials"
        );
        assert_eq!(
            ServiceError::external_service("renderer crashed").to_string(),
            "External service error: renderer crashed"
        );
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::for_service("cohere")
            .status_code(503)
            .endpoint("v2/chat")
            .error_code("overloaded");

        let err = ServiceError::service("upstream unavailable").with_context(context);

        assert_eq!(err.service_name(), Some("cohere"));
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(err.error_code(), Some("overloaded"));
        assert!(matches!(err.root(), ServiceError::Service(_)));
        assert!(err.to_string().contains("upstream unavailable"));
    }

    #[test]
    fn test_classify_http_error() {
        assert_eq!(mapping::classify_http_error(StatusCode::UNAUTHORIZED), "authentication");
        assert_eq!(mapping::classify_http_error(StatusCode::FORBIDDEN), "authorization");
        assert_eq!(mapping::classify_http_error(StatusCode::TOO_MANY_REQUESTS), "rate_limit");
        assert_eq!(mapping::classify_http_error(StatusCode::UNPROCESSABLE_ENTITY), "validation");
        assert_eq!(mapping::classify_http_error(StatusCode::BAD_GATEWAY), "server");
    }

    #[test]
    fn test_map_cohere_error() {
        let mut context = ErrorContext::new();
        let err = mapping::map_cohere_error(
            StatusCode::BAD_REQUEST,
            &json!({"id": "req-9", "message": "invalid model"}),
            &mut context,
        );

        assert!(matches!(err, ServiceError::Validation(ref m) if m == "invalid model"));
        assert_eq!(context.service, "cohere");
        assert_eq!(context.data.get("request_id").map(String::as_str), Some("req-9"));
    }

    #[test]
    fn test_map_http_error_plain_body() {
        let mut context = ErrorContext::for_service("other");
        let err = mapping::map_http_error(StatusCode::BAD_GATEWAY, "upstream down", &mut context);

        assert!(matches!(err, ServiceError::Service(ref m) if m.contains("upstream down")));

        let err = mapping::map_http_error(StatusCode::NOT_FOUND, "", &mut context);
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
        let err: ServiceError = io.into();
        assert!(matches!(err, ServiceError::Io(_)));
    }

    #[test]
    fn test_address_error_conversion() {
        let parsed = "not-an-address".parse::<lettre::Address>();
        let err: ServiceError = parsed.unwrap_err().into();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
