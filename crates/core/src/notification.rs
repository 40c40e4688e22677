//! Notification type constants and validation.
//!
//! Workflow transitions fan notifications out to the users holding the
//! role that must act next; severity follows the transition outcome
//! (success on advance, warning on rejection).

use crate::error::CoreError;

pub const TYPE_INFO: &str = "info";
pub const TYPE_SUCCESS: &str = "success";
pub const TYPE_WARNING: &str = "warning";
pub const TYPE_ERROR: &str = "error";

/// All valid notification types.
pub const VALID_TYPES: &[&str] = &[TYPE_INFO, TYPE_SUCCESS, TYPE_WARNING, TYPE_ERROR];

/// Validate that a notification type is one of the accepted values.
pub fn validate_type(type_notification: &str) -> Result<(), CoreError> {
    if VALID_TYPES.contains(&type_notification) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid notification type '{type_notification}'. Must be one of: {}",
            VALID_TYPES.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_types_accepted() {
        for t in VALID_TYPES {
            assert!(validate_type(t).is_ok());
        }
    }

    #[test]
    fn test_invalid_type_rejected() {
        let result = validate_type("debug");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid notification type"));
    }

    #[test]
    fn test_empty_type_rejected() {
        assert!(validate_type("").is_err());
    }
}
