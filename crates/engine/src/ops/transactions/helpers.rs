use crate::{EngineError, ResultEngine};

use super::super::normalize_optional_text;

/// Amounts are strictly positive; polarity comes from the transaction type.
pub(super) fn validate_amount(amount: i64) -> ResultEngine<()> {
    if amount <= 0 {
        return Err(EngineError::InvalidAmount(
            "amount must be > 0".to_string(),
        ));
    }
    Ok(())
}

pub(super) fn apply_optional_text_patch(
    existing: Option<String>,
    patch: Option<&str>,
) -> Option<String> {
    match patch {
        None => existing,
        Some(value) => normalize_optional_text(Some(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_amounts() {
        assert!(validate_amount(0).is_err());
        assert!(validate_amount(-100).is_err());
        assert!(validate_amount(1).is_ok());
    }

    #[test]
    fn absent_patch_keeps_existing_text() {
        let existing = Some("groceries".to_string());
        assert_eq!(
            apply_optional_text_patch(existing.clone(), None),
            existing
        );
    }

    #[test]
    fn blank_patch_clears_text() {
        let existing = Some("groceries".to_string());
        assert_eq!(apply_optional_text_patch(existing, Some("  ")), None);
    }
}
