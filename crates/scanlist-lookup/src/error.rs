//! # Lookup Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Input             Configuration      Transport          Response       │
//! │  ─────────────     ──────────────     ─────────────      ────────────── │
//! │  InvalidBarcode    InvalidConfig      Transport          Http{status}   │
//! │                                       Timeout            Decode         │
//! │                                                                         │
//! │  retryable: Transport, Timeout, Http 5xx, Http 429                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use scanlist_core::ValidationError;

/// Result type alias for lookup operations.
pub type LookupResult<T> = Result<T, LookupError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The barcode failed validation; no request was made.
    #[error("Invalid barcode: {0}")]
    InvalidBarcode(#[from] ValidationError),

    #[error("Invalid lookup configuration: {0}")]
    InvalidConfig(String),

    /// The service answered with a non-success status.
    #[error("Lookup service returned HTTP {status}")]
    Http { status: u16 },

    /// Connection, DNS or TLS failure.
    #[error("Lookup request failed: {0}")]
    Transport(String),

    #[error("Lookup request timed out")]
    Timeout,

    /// The body was not a lookup document.
    #[error("Malformed lookup response: {0}")]
    Decode(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LookupError::Timeout
        } else if err.is_decode() {
            LookupError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            LookupError::Http {
                status: status.as_u16(),
            }
        } else if err.is_builder() {
            LookupError::InvalidConfig(err.to_string())
        } else {
            LookupError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for LookupError {
    fn from(err: url::ParseError) -> Self {
        LookupError::InvalidConfig(format!("invalid endpoint: {}", err))
    }
}

// =============================================================================
// Error Categorization (for retry logic)
// =============================================================================

impl LookupError {
    /// Returns true if the request may succeed when sent again.
    ///
    /// ## Retryable Errors
    /// - Timeouts and connection failures
    /// - HTTP 5xx
    /// - HTTP 429 (rate limited)
    pub fn is_retryable(&self) -> bool {
        match self {
            LookupError::Transport(_) | LookupError::Timeout => true,
            LookupError::Http { status } => *status >= 500 || *status == 429,
            LookupError::InvalidBarcode(_)
            | LookupError::InvalidConfig(_)
            | LookupError::Decode(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(LookupError::Timeout.is_retryable());
        assert!(LookupError::Transport("connection refused".into()).is_retryable());
        assert!(LookupError::Http { status: 503 }.is_retryable());
        assert!(LookupError::Http { status: 429 }.is_retryable());

        assert!(!LookupError::Http { status: 404 }.is_retryable());
        assert!(!LookupError::Http { status: 401 }.is_retryable());
        assert!(!LookupError::Decode("eof".into()).is_retryable());
        assert!(!LookupError::InvalidConfig("url".into()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            LookupError::Http { status: 500 }.to_string(),
            "Lookup service returned HTTP 500"
        );

        let err: LookupError = ValidationError::Required {
            field: "barcode".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Invalid barcode: barcode is required");
    }

    #[test]
    fn test_json_error_is_decode() {
        let err: LookupError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, LookupError::Decode(_)));
    }
}
