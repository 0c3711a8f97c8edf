//! Business invariants defined in the domain.
//!
//! Every domain rule is checked through [`invariant`], so a broken rule always
//! surfaces as an [`InvariantViolation`] and never as a parsing or storage error.

/// A domain rule did not hold for an otherwise well-formed value.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct InvariantViolation(pub String);

impl InvariantViolation {
    pub fn message(&self) -> &str {
        &self.0
    }
}

pub type InvariantResult = Result<(), InvariantViolation>;

/// Fails with `message` unless `condition_holds`.
pub fn invariant(message: &str, condition_holds: bool) -> InvariantResult {
    if condition_holds {
        Ok(())
    } else {
        Err(InvariantViolation(message.to_string()))
    }
}

pub fn not_blank(s: &str) -> bool {
    !s.trim().is_empty()
}

pub fn not_empty<T>(items: &[T]) -> bool {
    !items.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_passes_when_condition_holds() {
        assert!(invariant("never raised", true).is_ok());
    }

    #[test]
    fn invariant_carries_message_when_condition_fails() {
        let err = invariant("customerId must not be blank", false).unwrap_err();
        assert_eq!(err.message(), "customerId must not be blank");
        assert_eq!(err.to_string(), "customerId must not be blank");
    }

    #[test]
    fn not_blank_rejects_empty_and_whitespace() {
        for s in ["", " ", "\t", "\n", " \r\n\t "] {
            assert!(!not_blank(s), "expected {s:?} to be blank");
        }
    }

    #[test]
    fn not_blank_accepts_anything_with_content() {
        for s in ["a", " a", "a ", "\tserial123\n", "0"] {
            assert!(not_blank(s), "expected {s:?} to be non-blank");
        }
    }

    #[test]
    fn not_empty_checks_length() {
        assert!(!not_empty::<u8>(&[]));
        assert!(not_empty(&[1]));
        assert!(not_empty(&["a", "b"]));
    }
}
