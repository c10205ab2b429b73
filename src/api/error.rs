use serde_json::Value;
use std::error::Error;
use std::fmt;

/// The single failure shape produced by the API boundary.
///
/// Every way an outbound call can fail (connection trouble, a client-side
/// deadline, a non-2xx response, a body that will not decode) ends up as
/// one of these variants. Callers branch on [`ApiError::status`] or on the
/// variant, never on transport internals.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// Network-level failure: the request never produced an HTTP response.
    /// Reported with status 0.
    Network { message: String },

    /// The client-side deadline elapsed before the response arrived.
    /// Reported with status 408.
    Timeout { message: String },

    /// The server answered with a non-2xx status. The message is taken from
    /// the response body when one could be parsed, and `code`/`request_id`
    /// are carried along when the backend included them.
    Status {
        status: u16,
        message: String,
        code: Option<String>,
        request_id: Option<String>,
        body: Option<Value>,
    },

    /// A success-status response carried a body that claimed to be JSON but
    /// failed to parse, or did not match the expected shape.
    Decode { message: String },
}

impl ApiError {
    /// Numeric status code for the failure: 0 for transport and decode
    /// failures, 408 for client-enforced timeouts, otherwise the server's
    /// HTTP status.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Network { .. } | ApiError::Decode { .. } => 0,
            ApiError::Timeout { .. } => 408,
            ApiError::Status { status, .. } => *status,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Network { message }
            | ApiError::Timeout { message }
            | ApiError::Status { message, .. }
            | ApiError::Decode { message } => message,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == 401
    }

    /// Build a [`ApiError::Status`] from a response status and raw body.
    ///
    /// The body is parsed as JSON when possible; the message prefers the
    /// backend's `message` field, then `detail` (the FastAPI convention),
    /// then a templated fallback that always names the status code.
    pub fn from_response(status: u16, body_text: &str) -> Self {
        let body: Value = serde_json::from_str(body_text).unwrap_or(Value::Null);

        let message = body
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| body.get("detail").and_then(Value::as_str))
            .map(str::to_owned)
            .unwrap_or_else(|| format!("Request failed with status {status}"));

        let code = body
            .get("code")
            .and_then(Value::as_str)
            .map(str::to_owned);
        let request_id = body
            .get("request_id")
            .and_then(Value::as_str)
            .map(str::to_owned);

        ApiError::Status {
            status,
            message,
            code,
            request_id,
            body: if body.is_null() { None } else { Some(body) },
        }
    }

    /// Normalize a transport-level rejection into [`ApiError::Network`],
    /// keeping cross-origin failures distinguishable from plain
    /// connectivity trouble.
    pub fn from_transport(message: &str) -> Self {
        let lowered = message.to_lowercase();
        if lowered.contains("cors") || lowered.contains("cross-origin") {
            ApiError::Network {
                message: format!(
                    "Request blocked by cross-origin (CORS) configuration: {message}"
                ),
            }
        } else {
            ApiError::Network {
                message: format!("Network error: {message}"),
            }
        }
    }

    pub fn timeout(deadline: std::time::Duration) -> Self {
        ApiError::Timeout {
            message: format!("Request timed out after {deadline:?}"),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Status {
                status,
                message,
                request_id,
                ..
            } => {
                write!(f, "{message} (status {status}")?;
                if let Some(id) = request_id {
                    write!(f, ", request {id}")?;
                }
                write!(f, ")")
            }
            _ => write!(f, "{}", self.message()),
        }
    }
}

impl Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_prefers_message_field() {
        let err = ApiError::from_response(400, r#"{"message":"bad input","detail":"ignored"}"#);
        assert_eq!(err.status(), 400);
        assert_eq!(err.message(), "bad input");
    }

    #[test]
    fn status_error_falls_back_to_detail() {
        let err = ApiError::from_response(503, r#"{"detail":"RAGEngine inte redo"}"#);
        assert_eq!(err.status(), 503);
        assert_eq!(err.message(), "RAGEngine inte redo");
    }

    #[test]
    fn status_error_synthesizes_message_for_non_json_body() {
        let err = ApiError::from_response(500, "<html>Internal Server Error</html>");
        assert_eq!(err.status(), 500);
        assert_eq!(err.message(), "Request failed with status 500");
        assert!(matches!(err, ApiError::Status { body: None, .. }));
    }

    #[test]
    fn status_error_synthesizes_message_for_empty_body() {
        let err = ApiError::from_response(502, "");
        assert_eq!(err.status(), 502);
        assert!(!err.message().is_empty());
    }

    #[test]
    fn status_error_carries_code_and_request_id() {
        let err = ApiError::from_response(
            429,
            r#"{"message":"rate limited","code":"rate_limit","request_id":"req-17"}"#,
        );
        match err {
            ApiError::Status {
                code, request_id, ..
            } => {
                assert_eq!(code.as_deref(), Some("rate_limit"));
                assert_eq!(request_id.as_deref(), Some("req-17"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn transport_error_flags_cors_failures() {
        let err = ApiError::from_transport("blocked by CORS policy");
        assert_eq!(err.status(), 0);
        assert!(err.message().contains("cross-origin (CORS)"));

        let err = ApiError::from_transport("Cross-Origin request rejected");
        assert!(err.message().contains("cross-origin (CORS)"));
    }

    #[test]
    fn transport_error_defaults_to_generic_network_message() {
        let err = ApiError::from_transport("connection refused");
        assert_eq!(err.status(), 0);
        assert!(err.message().starts_with("Network error:"));
        assert!(!err.message().to_lowercase().contains("cors"));
    }

    #[test]
    fn timeout_error_uses_408() {
        let err = ApiError::timeout(std::time::Duration::from_secs(30));
        assert_eq!(err.status(), 408);
        assert!(err.message().contains("30s"));
    }

    #[test]
    fn display_includes_status_and_request_id() {
        let err = ApiError::from_response(500, r#"{"detail":"boom","request_id":"abc"}"#);
        let rendered = err.to_string();
        assert!(rendered.contains("boom"));
        assert!(rendered.contains("500"));
        assert!(rendered.contains("abc"));
    }
}
