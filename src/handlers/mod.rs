pub mod listings;
pub mod orders;

use bigdecimal::{BigDecimal, Zero};
use std::str::FromStr;

use crate::errors::AppError;

/// Parse a required decimal field carried as a string (DTO convention, to
/// avoid floating-point issues), rejecting negatives.
pub(crate) fn non_negative_decimal(raw: &str, field: &str) -> Result<BigDecimal, AppError> {
    let value = BigDecimal::from_str(raw.trim())
        .map_err(|_| AppError::InvalidRequest(format!("{field} must be a decimal number")))?;
    if value < BigDecimal::zero() {
        return Err(AppError::InvalidRequest(format!("{field} must not be negative")));
    }
    Ok(value)
}

pub(crate) fn positive_decimal(raw: &str, field: &str) -> Result<BigDecimal, AppError> {
    let value = non_negative_decimal(raw, field)?;
    if value == BigDecimal::zero() {
        return Err(AppError::InvalidRequest(format!("{field} must be greater than zero")));
    }
    Ok(value)
}

pub(crate) fn optional_non_negative_decimal(
    raw: Option<&str>,
    field: &str,
) -> Result<Option<BigDecimal>, AppError> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| non_negative_decimal(s, field))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_trims_a_plain_decimal() {
        assert_eq!(non_negative_decimal(" 2.5 ", "price").expect("should parse"), BigDecimal::from_str("2.5").expect("valid"));
    }

    #[test]
    fn rejects_garbage_and_negatives() {
        assert!(matches!(non_negative_decimal("abc", "price"), Err(AppError::InvalidRequest(_))));
        assert!(matches!(non_negative_decimal("-1", "price"), Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn positive_rejects_zero() {
        assert!(matches!(positive_decimal("0", "quantity_kg"), Err(AppError::InvalidRequest(_))));
        assert!(positive_decimal("0.1", "quantity_kg").is_ok());
    }

    #[test]
    fn optional_treats_blank_as_absent() {
        assert_eq!(optional_non_negative_decimal(None, "x").expect("ok"), None);
        assert_eq!(optional_non_negative_decimal(Some("  "), "x").expect("ok"), None);
        assert!(optional_non_negative_decimal(Some("3"), "x").expect("ok").is_some());
        assert!(optional_non_negative_decimal(Some("nope"), "x").is_err());
    }
}
