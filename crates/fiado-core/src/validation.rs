//! # Input Validation
//!
//! Small validation helpers shared by the aggregate and the settlement
//! session. All of them fail closed: the first violation aborts the caller
//! before anything is mutated.

use crate::error::ValidationError;
use crate::money::{Money, Quantity};
use crate::{MAX_FREE_TEXT_LEN, MAX_ITEM_QUANTITY};

/// Validates that a reference field (customer, vendor, store, product) is
/// present and non-blank.
pub fn validate_reference(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates an item quantity: positive and within the per-item cap.
pub fn validate_quantity(quantity: Quantity) -> Result<(), ValidationError> {
    if !quantity.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    if quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::QuantityTooLarge {
            requested: quantity,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

/// Validates a tender amount: strictly positive, zero tenders are noise.
pub fn validate_tender_amount(amount: Money) -> Result<(), ValidationError> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "tender amount".to_string(),
        });
    }
    Ok(())
}

/// Validates that a money value is not negative (prices, discounts).
pub fn validate_money_not_negative(field: &str, amount: Money) -> Result<(), ValidationError> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates free text fields (observation, return reason) against the
/// length cap. Content is never interpreted.
pub fn validate_free_text(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > MAX_FREE_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_FREE_TEXT_LEN,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_rejects_blank() {
        assert!(validate_reference("customer_id", "c-1").is_ok());
        assert!(matches!(
            validate_reference("customer_id", "   "),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_reference("customer_id", ""),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_quantity_bounds() {
        assert!(validate_quantity(Quantity::from_millis(1)).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());
        assert!(matches!(
            validate_quantity(Quantity::zero()),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            validate_quantity(MAX_ITEM_QUANTITY + Quantity::from_millis(1)),
            Err(ValidationError::QuantityTooLarge { .. })
        ));
    }

    #[test]
    fn test_tender_amount_must_be_positive() {
        assert!(validate_tender_amount(Money::from_cents(1)).is_ok());
        assert!(validate_tender_amount(Money::zero()).is_err());
        assert!(validate_tender_amount(Money::from_cents(-100)).is_err());
    }

    #[test]
    fn test_money_not_negative() {
        assert!(validate_money_not_negative("discount", Money::zero()).is_ok());
        assert!(matches!(
            validate_money_not_negative("discount", Money::from_cents(-1)),
            Err(ValidationError::MustNotBeNegative { .. })
        ));
    }

    #[test]
    fn test_free_text_length() {
        assert!(validate_free_text("observation", "a short note").is_ok());
        let long = "x".repeat(MAX_FREE_TEXT_LEN + 1);
        assert!(matches!(
            validate_free_text("observation", &long),
            Err(ValidationError::TooLong { .. })
        ));
    }
}
