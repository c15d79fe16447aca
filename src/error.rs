use serde::Deserialize;

/// Failure talking to the board API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    // Connection, DNS, TLS, IO; detail only in Debug output
    #[error("Network Error")]
    Transport(String),

    // Non-2xx response
    #[error("Request failed with status code {status}")]
    Status {
        status: u16,
        message: Option<String>,
    },

    // 2xx response with a body we could not read
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Human-readable reason reported by the server, if the error body had one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Server message, or `fallback` when the server did not supply one.
    pub fn message_or(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// JSON error body returned by the API
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
}

/// Store operation failure surfaced to the caller
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Raw API failure, propagated unchanged.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Normalized failure carrying the server message or a localized fallback.
    #[error("{0}")]
    Rejected(String),
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_or_prefers_server_message() {
        let err = ApiError::Status {
            status: 422,
            message: Some("Name is taken".to_string()),
        };
        assert_eq!(err.message_or("fallback"), "Name is taken");

        let err = ApiError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(err.message_or("fallback"), "fallback");

        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.message_or("fallback"), "fallback");
    }

    #[test]
    fn test_status_error_display() {
        let err = ApiError::Status {
            status: 404,
            message: None,
        };
        assert_eq!(err.to_string(), "Request failed with status code 404");
    }

    #[test]
    fn test_transport_error_display_hides_detail() {
        let err = ApiError::Transport("tcp connect error: Connection refused".to_string());
        assert_eq!(err.to_string(), "Network Error");
        assert_eq!(StoreError::from(err).to_string(), "Network Error");
    }
}
