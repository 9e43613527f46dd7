//! Input validation helpers
//!
//! Centralized text length constants and validation functions. Limits are
//! chosen for reasonable UX on names, notes and addresses; the document
//! store itself enforces no lengths.

use crate::orders::error::PlacementError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: item name, category, customer name
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, reasons
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone numbers, units of measure
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Delivery addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(
    value: &str,
    field: &str,
    max_len: usize,
) -> Result<(), PlacementError> {
    if value.trim().is_empty() {
        return Err(PlacementError::Validation(format!(
            "{field} must not be empty"
        )));
    }
    if value.len() > max_len {
        return Err(PlacementError::Validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), PlacementError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(PlacementError::Validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}
