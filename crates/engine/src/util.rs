//! Internal helpers for category name normalization.
//!
//! These utilities are **not** part of the public API. Uniqueness of category
//! names is enforced on the normalized key so that "Food ", "food" and
//! "Fóod" cannot coexist as distinct categories.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{EngineError, ResultEngine};

/// Trim and collapse internal whitespace, preserving the user's casing.
pub(crate) fn normalize_category_display(input: &str) -> ResultEngine<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(
            "category name must not be empty".to_string(),
        ));
    }
    let mut out = String::new();
    for token in trimmed.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token);
    }
    Ok(out)
}

/// Reduce a display name to its uniqueness key: NFKD, combining marks
/// stripped, lowercased, non-alphanumeric runs collapsed to single spaces.
pub(crate) fn normalize_category_key(input: &str) -> ResultEngine<String> {
    let mut out = String::new();
    let mut prev_space = false;
    for ch in input.trim().nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
            prev_space = false;
        } else if !out.is_empty() && !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }
    let normalized = out.trim();
    if normalized.is_empty() {
        return Err(EngineError::InvalidName(
            "category name must contain at least one alphanumeric character".to_string(),
        ));
    }
    Ok(normalized.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_collapses_whitespace() {
        assert_eq!(
            normalize_category_display("  Eating   Out ").unwrap(),
            "Eating Out"
        );
    }

    #[test]
    fn key_is_case_and_accent_insensitive() {
        assert_eq!(normalize_category_key("Café  Bars").unwrap(), "cafe bars");
        assert_eq!(normalize_category_key("cafe-bars").unwrap(), "cafe bars");
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(normalize_category_display("   ").is_err());
        assert!(normalize_category_key("--- ---").is_err());
    }
}
