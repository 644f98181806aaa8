//! Transport error types for the submission endpoint

use std::fmt;

/// Errors that can occur when posting a form to the endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// HTTP client could not be built
    Client { message: String },
    /// Network failure before a response arrived (DNS, connect, TLS, reset)
    Network { endpoint: String, message: String },
    /// Endpoint answered with a non-success status
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },
}

impl TransportError {
    /// Create a client construction error
    pub fn client(message: impl Into<String>) -> Self {
        TransportError::Client {
            message: message.into(),
        }
    }

    /// Create a network error for an endpoint
    pub fn network(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        TransportError::Network {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create a non-success status error for an endpoint
    pub fn status(endpoint: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        TransportError::Status {
            endpoint: endpoint.into(),
            status,
            message: message.into(),
        }
    }

    /// HTTP status code, if the endpoint responded at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the request never reached a response
    pub fn is_network(&self) -> bool {
        matches!(self, TransportError::Network { .. })
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Client { message } => {
                write!(f, "Failed to build HTTP client - {}", message)
            }
            TransportError::Network { endpoint, message } => {
                write!(f, "{}: Network error - {}", endpoint, message)
            }
            TransportError::Status {
                endpoint,
                status,
                message,
            } => {
                write!(f, "{}: HTTP {} - {}", endpoint, status, message)
            }
        }
    }
}

impl std::error::Error for TransportError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code() {
        assert_eq!(
            TransportError::status("https://f.example", 500, "boom").status_code(),
            Some(500)
        );
        assert_eq!(
            TransportError::network("https://f.example", "refused").status_code(),
            None
        );
    }

    #[test]
    fn test_is_network() {
        assert!(TransportError::network("https://f.example", "timeout").is_network());
        assert!(!TransportError::status("https://f.example", 502, "bad gateway").is_network());
        assert!(!TransportError::client("tls").is_network());
    }

    #[test]
    fn test_display() {
        let err = TransportError::status("https://f.example", 422, "email is invalid");
        assert_eq!(
            err.to_string(),
            "https://f.example: HTTP 422 - email is invalid"
        );

        let err = TransportError::network("https://f.example", "connection refused");
        assert_eq!(
            err.to_string(),
            "https://f.example: Network error - connection refused"
        );
    }
}
