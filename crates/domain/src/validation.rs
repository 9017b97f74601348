//! Precondition helpers shared by the ledger's decisions.
//!
//! Each helper checks one thing and fails with exactly one tagged error, so
//! the order in which a decision calls them is the order callers observe.

use common::{Amount, Secret};

use crate::ledger::LedgerError;

/// Fails with `error` unless `condition` holds.
pub fn ensure(condition: bool, error: impl FnOnce() -> LedgerError) -> Result<(), LedgerError> {
    if condition { Ok(()) } else { Err(error()) }
}

/// Credentials follow the same rule as plain text: whitespace alone is empty.
pub fn require_secret(secret: &Secret, error: LedgerError) -> Result<(), LedgerError> {
    ensure(!secret.is_blank(), || error)
}

pub fn require_text(text: &str, error: LedgerError) -> Result<(), LedgerError> {
    ensure(!text.trim().is_empty(), || error)
}

/// Rejects value attached to an operation that is not payable.
pub fn require_no_value(operation: &'static str, attached: Amount) -> Result<(), LedgerError> {
    ensure(attached.is_zero(), || LedgerError::NotPayable {
        operation,
        attached,
    })
}

pub fn require_exact_value(expected: Amount, attached: Amount) -> Result<(), LedgerError> {
    ensure(attached == expected, || LedgerError::ValueMismatch {
        expected,
        attached,
    })
}

pub fn require_funds(available: Amount, required: Amount) -> Result<(), LedgerError> {
    ensure(available >= required, || LedgerError::InsufficientFunds {
        available,
        required,
    })
}

pub fn require_overflow_free<T>(value: Option<T>) -> Result<T, LedgerError> {
    value.ok_or(LedgerError::AmountOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_inputs_are_rejected() {
        assert!(require_secret(&Secret::new(""), LedgerError::CustomerIdRequired).is_err());
        assert_eq!(
            require_secret(&Secret::new(" "), LedgerError::CustomerIdRequired),
            Err(LedgerError::CustomerIdRequired)
        );
        assert!(require_secret(&Secret::new("c-1"), LedgerError::CustomerIdRequired).is_ok());
        assert_eq!(
            require_text("  ", LedgerError::EventNameRequired),
            Err(LedgerError::EventNameRequired)
        );
    }

    #[test]
    fn value_checks() {
        assert!(require_no_value("openStore", Amount::ZERO).is_ok());
        assert_eq!(
            require_no_value("openStore", Amount::new(1)).unwrap_err().code(),
            "E039"
        );

        assert!(require_exact_value(Amount::new(5), Amount::new(5)).is_ok());
        assert_eq!(
            require_exact_value(Amount::new(5), Amount::new(6)).unwrap_err().code(),
            "E030"
        );
        assert_eq!(
            require_exact_value(Amount::new(5), Amount::new(4)).unwrap_err().code(),
            "E030"
        );

        assert!(require_funds(Amount::new(5), Amount::new(5)).is_ok());
        assert_eq!(
            require_funds(Amount::new(4), Amount::new(5)).unwrap_err().code(),
            "E031"
        );
    }

    #[test]
    fn overflow_maps_to_tagged_error() {
        assert_eq!(require_overflow_free(Some(3)), Ok(3));
        assert_eq!(
            require_overflow_free::<Amount>(None),
            Err(LedgerError::AmountOverflow)
        );
    }
}
