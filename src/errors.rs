use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Error body returned to callers in place of a successful analytics result.
///
/// Mirrors the `{ "error": "<message>" }` shape the HTTP layer forwards as a
/// 400 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error description
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

impl From<&ServiceError> for ErrorResponse {
    fn from(error: &ServiceError) -> Self {
        ErrorResponse::new(error.response_message())
    }
}

#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Not enough data for forecasting: {0}")]
    InsufficientData(String),

    #[error("Unsupported file format")]
    UnsupportedFormat,

    #[error("{0}")]
    ParseFailure(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Other error: {0}")]
    Other(
        #[from]
        #[serde(skip)]
        anyhow::Error,
    ),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl From<csv::Error> for ServiceError {
    fn from(err: csv::Error) -> Self {
        ServiceError::ParseFailure(err.to_string())
    }
}

impl From<calamine::Error> for ServiceError {
    fn from(err: calamine::Error) -> Self {
        ServiceError::ParseFailure(err.to_string())
    }
}

impl ServiceError {
    /// Stable machine-readable error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InsufficientData(_) => "insufficient-data",
            Self::UnsupportedFormat => "unsupported-format",
            Self::ParseFailure(_) => "parse-failure",
            Self::InvalidFormat(_) => "invalid-format",
            Self::ValidationError(_) => "validation",
            Self::InternalError(_) | Self::Other(_) => "internal",
        }
    }

    /// Returns the HTTP status code the calling layer should use for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InsufficientData(_)
            | Self::UnsupportedFormat
            | Self::ParseFailure(_)
            | Self::InvalidFormat(_)
            | Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::InternalError(_) | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to clients.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::InsufficientData(_) => "Not enough data for forecasting".to_string(),
            Self::InvalidFormat(_) => "Invalid format. Use 'excel' or 'pdf'.".to_string(),
            Self::InternalError(_) | Self::Other(_) => "An internal error occurred".to_string(),
            _ => self.to_string(),
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_status_code_mapping() {
        assert_eq!(
            ServiceError::InsufficientData("product 1".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::UnsupportedFormat.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::ParseFailure("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::InvalidFormat("docx".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::InternalError("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_codes_are_kebab_case() {
        assert_eq!(
            ServiceError::InsufficientData(String::new()).code(),
            "insufficient-data"
        );
        assert_eq!(ServiceError::UnsupportedFormat.code(), "unsupported-format");
        assert_eq!(ServiceError::ParseFailure(String::new()).code(), "parse-failure");
        assert_eq!(ServiceError::InvalidFormat(String::new()).code(), "invalid-format");
    }

    #[test]
    fn unsupported_format_response_body() {
        let body = ServiceError::UnsupportedFormat.to_response();
        assert_eq!(body.error, "Unsupported file format");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Unsupported file format" }));
    }

    #[test]
    fn parse_failure_carries_parser_message() {
        let err = ServiceError::ParseFailure("No columns to parse from file".into());
        assert_eq!(err.response_message(), "No columns to parse from file");
    }

    #[test]
    fn response_message_hides_internal_details() {
        let err = ServiceError::InternalError("connection string leaked".into());
        assert!(!err.response_message().contains("leaked"));
    }

    #[test]
    fn foreign_errors_are_internal() {
        let err = ServiceError::from(anyhow::anyhow!("disk full"));
        assert_eq!(err.code(), "internal");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.response_message(), "An internal error occurred");
    }
}
