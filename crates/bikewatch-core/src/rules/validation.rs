//! Input validation for record creation
//!
//! Runs at the service edge before anything reaches the store, so the
//! assignment engine only ever sees well-formed records.

use crate::errors::{BikeWatchError, Result};

const MAX_NAME_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 2000;

/// Validate a person's display name (officer or citizen)
///
/// # Errors
/// `InvalidInput` if the name is blank or longer than 200 characters.
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(BikeWatchError::InvalidInput {
            field: "name",
            reason: "cannot be empty or whitespace-only".to_string(),
        });
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(BikeWatchError::InvalidInput {
            field: "name",
            reason: format!("longer than {} characters", MAX_NAME_LEN),
        });
    }
    Ok(())
}

/// Validate an email address
///
/// Only the shape is checked: one `@`, non-empty local part, a dot in the
/// domain and no whitespace. Deliverability is not our concern.
///
/// # Errors
/// `InvalidInput` if the address is malformed.
pub fn validate_email(email: &str) -> Result<()> {
    let invalid = |reason: &str| BikeWatchError::InvalidInput {
        field: "email",
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain whitespace"));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| invalid("missing '@'"))?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must have exactly one '@' after a local part"));
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid("domain must contain a dot"));
    }
    Ok(())
}

/// Validate a case description
///
/// # Errors
/// `InvalidInput` if the description is blank or longer than 2000 characters.
pub fn validate_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(BikeWatchError::InvalidInput {
            field: "description",
            reason: "cannot be empty or whitespace-only".to_string(),
        });
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(BikeWatchError::InvalidInput {
            field: "description",
            reason: format!("longer than {} characters", MAX_DESCRIPTION_LEN),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Officer Dibble").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("dibble@pd.example").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@pd.example").is_err());
        assert!(validate_email("a@b@pd.example").is_err());
        assert!(validate_email("a@localhost").is_err());
        assert!(validate_email("a b@pd.example").is_err());
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description("Black fixie, stolen near the station").is_ok());
        assert!(matches!(
            validate_description(""),
            Err(BikeWatchError::InvalidInput {
                field: "description",
                ..
            })
        ));
    }
}
