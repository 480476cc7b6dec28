// Settings validation

use crate::{ConfigError, Result};

/// Implemented by settings types that can check their own invariants
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Field-level validation rules
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn not_empty(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", field)));
        }
        Ok(())
    }

    pub fn in_range<T: PartialOrd + std::fmt::Display>(
        value: T,
        min: T,
        max: T,
        field: &str,
    ) -> Result<()> {
        if value < min || value > max {
            return Err(ConfigError::Validation(format!(
                "{} must be between {} and {}, got {}",
                field, min, max, value
            )));
        }
        Ok(())
    }

    pub fn non_negative_finite(value: f64, field: &str) -> Result<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::Validation(format!(
                "{} must be a finite, non-negative number",
                field
            )));
        }
        Ok(())
    }

    /// Basic shape check only
    pub fn is_email(value: &str, field: &str) -> Result<()> {
        match value.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(ConfigError::Validation(format!(
                "{} must be a valid email",
                field
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_empty() {
        assert!(ConfigValidator::not_empty("quantum-user-", "prefix").is_ok());
        assert!(ConfigValidator::not_empty("  ", "prefix").is_err());
    }

    #[test]
    fn test_range() {
        assert!(ConfigValidator::in_range(50, 1, 10_000, "tick").is_ok());
        assert!(ConfigValidator::in_range(0, 1, 10_000, "tick").is_err());
        assert!(ConfigValidator::in_range(10_001, 1, 10_000, "tick").is_err());
    }

    #[test]
    fn test_non_negative_finite() {
        assert!(ConfigValidator::non_negative_finite(0.0, "amp").is_ok());
        assert!(ConfigValidator::non_negative_finite(-1.0, "amp").is_err());
        assert!(ConfigValidator::non_negative_finite(f64::NAN, "amp").is_err());
    }

    #[test]
    fn test_email() {
        assert!(ConfigValidator::is_email("quantum@example.com", "email").is_ok());
        assert!(ConfigValidator::is_email("@example.com", "email").is_err());
        assert!(ConfigValidator::is_email("quantum", "email").is_err());
    }
}
