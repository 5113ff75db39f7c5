//! # Error Types
//!
//! Domain-specific error types for scanlist-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  scanlist-core errors (this file)                                      │
//! │  ├── CoreError        - Collection and export outcomes                 │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  scanlist-session errors (separate crate)                              │
//! │  └── SessionError     - Camera, watchdog, torch failures               │
//! │                                                                         │
//! │  scanlist-lookup errors (separate crate)                               │
//! │  └── LookupError      - Transport / parsing failures                   │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError / LookupError → AppError → UI       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these are fatal: the application stays interactive after any of
//! them.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Export was requested with an empty collection.
    ///
    /// Informational: the caller shows "nothing to export" and carries on.
    #[error("No products to export")]
    ExportEmpty,

    /// A product with the same id is already in the collection.
    #[error("Product {0} is already in the list")]
    DuplicateProduct(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns true for outcomes that are reported but are not failures.
    pub fn is_informational(&self) -> bool {
        matches!(self, CoreError::ExportEmpty)
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
