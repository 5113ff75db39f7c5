//! # Validation Module
//!
//! Input rules applied before a value reaches the lookup service.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Manual entry         normalize_manual_code (trim, non-empty) │
//! │  Layer 2: Camera filter        is_likely_retail_barcode (optional)     │
//! │  Layer 3: Before lookup        validate_barcode (THIS MODULE)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::MAX_BARCODE_LENGTH;

// =============================================================================
// Manual Entry
// =============================================================================

/// Trims a typed code. Returns `None` when nothing remains.
///
/// ## Example
/// ```rust
/// use scanlist_core::validation::normalize_manual_code;
///
/// assert_eq!(normalize_manual_code("  012345678905 "), Some("012345678905".to_string()));
/// assert_eq!(normalize_manual_code("   "), None);
/// ```
pub fn normalize_manual_code(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// =============================================================================
// Barcode Validation
// =============================================================================

/// Validates a barcode before lookup.
///
/// ## Rules
/// - Must not be empty
/// - At most [`MAX_BARCODE_LENGTH`] characters
/// - No control characters
pub fn validate_barcode(code: &str) -> Result<(), ValidationError> {
    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }

    if code.chars().count() > MAX_BARCODE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: MAX_BARCODE_LENGTH,
        });
    }

    if code.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "contains control characters".to_string(),
        });
    }

    Ok(())
}

/// True for 12 or 13 ASCII digits (UPC-A / EAN-13).
pub fn is_likely_retail_barcode(code: &str) -> bool {
    let code = code.trim();
    matches!(code.len(), 12 | 13) && code.bytes().all(|b| b.is_ascii_digit())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_manual_code() {
        assert_eq!(normalize_manual_code("abc"), Some("abc".to_string()));
        assert_eq!(normalize_manual_code("\t 7501234567890\n"), Some("7501234567890".to_string()));
        assert_eq!(normalize_manual_code(""), None);
        assert_eq!(normalize_manual_code(" \n "), None);
    }

    #[test]
    fn test_validate_barcode() {
        assert!(validate_barcode("012345678905").is_ok());
        assert!(validate_barcode("ABC-123").is_ok());

        assert!(matches!(
            validate_barcode(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_barcode(&"9".repeat(65)),
            Err(ValidationError::TooLong { max: 64, .. })
        ));
        assert!(matches!(
            validate_barcode("0123\n4567"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_is_likely_retail_barcode() {
        assert!(is_likely_retail_barcode("012345678905"));
        assert!(is_likely_retail_barcode("7501234567890"));
        assert!(!is_likely_retail_barcode("12345678"));
        assert!(!is_likely_retail_barcode("01234567890A"));
        assert!(!is_likely_retail_barcode("https://example.com"));
    }
}
