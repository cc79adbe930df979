//! Write-payload normalization.
//!
//! Clients send optional references and dates in half a dozen shapes:
//! absent, null, zero, "0", empty or whitespace-only strings, the literal
//! string "undefined". Every one of those means "no value". These helpers
//! collapse them before validation so a placeholder can never reach the
//! store as a real foreign key or date.

use serde::Deserialize;

/// A foreign-key reference as it appears on the wire: clients send either
/// a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawRef {
    Number(i64),
    Text(String),
}

/// Outcome of cleaning a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefValue {
    /// No usable reference was supplied.
    Absent,
    /// A concrete id. Existence is the validator's problem, not ours.
    Id(i64),
    /// Non-numeric text; kept verbatim for error messages.
    Invalid(String),
}

impl RefValue {
    pub fn id(&self) -> Option<i64> {
        match self {
            RefValue::Id(n) => Some(*n),
            _ => None,
        }
    }
}

/// Collapses the absence placeholders {absent, null, 0, "0", blank} to
/// [`RefValue::Absent`]. Numeric strings become ids; anything else is
/// [`RefValue::Invalid`].
pub fn clean_reference(raw: Option<&RawRef>) -> RefValue {
    match raw {
        None => RefValue::Absent,
        Some(RawRef::Number(0)) => RefValue::Absent,
        Some(RawRef::Number(n)) => RefValue::Id(*n),
        Some(RawRef::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed == "0" {
                return RefValue::Absent;
            }
            match trimmed.parse::<i64>() {
                Ok(0) => RefValue::Absent,
                Ok(n) => RefValue::Id(n),
                Err(_) => RefValue::Invalid(trimmed.to_string()),
            }
        }
    }
}

/// Maps the date absence placeholders (empty, whitespace-only, the literal
/// "undefined") to None; any other value passes through unchanged.
pub fn clean_date(raw: Option<&str>) -> Option<String> {
    let s = raw?;
    if s == "undefined" || s.trim().is_empty() {
        return None;
    }
    Some(s.to_string())
}

/// Maps empty strings to None; other values pass through unchanged.
pub fn clean_string(raw: Option<&str>) -> Option<String> {
    let s = raw?;
    if s.is_empty() {
        return None;
    }
    Some(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawRef {
        RawRef::Text(s.to_string())
    }

    #[test]
    fn reference_absence_placeholders_collapse() {
        assert_eq!(clean_reference(None), RefValue::Absent);
        assert_eq!(clean_reference(Some(&RawRef::Number(0))), RefValue::Absent);
        assert_eq!(clean_reference(Some(&text("0"))), RefValue::Absent);
        assert_eq!(clean_reference(Some(&text(""))), RefValue::Absent);
        assert_eq!(clean_reference(Some(&text("   "))), RefValue::Absent);
        assert_eq!(clean_reference(Some(&text(" 0 "))), RefValue::Absent);
    }

    #[test]
    fn reference_real_ids_survive() {
        assert_eq!(clean_reference(Some(&RawRef::Number(7))), RefValue::Id(7));
        assert_eq!(clean_reference(Some(&text("42"))), RefValue::Id(42));
        assert_eq!(clean_reference(Some(&text(" 42 "))), RefValue::Id(42));
    }

    #[test]
    fn reference_non_numeric_text_is_invalid() {
        assert_eq!(
            clean_reference(Some(&text("abc"))),
            RefValue::Invalid("abc".to_string())
        );
        assert_eq!(
            clean_reference(Some(&text("12abc"))),
            RefValue::Invalid("12abc".to_string())
        );
    }

    #[test]
    fn reference_deserializes_from_number_or_string() {
        let n: RawRef = serde_json::from_str("5").unwrap();
        assert_eq!(n, RawRef::Number(5));
        let s: RawRef = serde_json::from_str("\"5\"").unwrap();
        assert_eq!(s, RawRef::Text("5".to_string()));
    }

    #[test]
    fn date_absence_placeholders_collapse() {
        assert_eq!(clean_date(None), None);
        assert_eq!(clean_date(Some("")), None);
        assert_eq!(clean_date(Some("   ")), None);
        assert_eq!(clean_date(Some("undefined")), None);
    }

    #[test]
    fn date_values_pass_through_unchanged() {
        assert_eq!(
            clean_date(Some("2025-03-10")),
            Some("2025-03-10".to_string())
        );
        assert_eq!(
            clean_date(Some("2025-03-10T14:30:00Z")),
            Some("2025-03-10T14:30:00Z".to_string())
        );
    }

    #[test]
    fn date_cleaning_is_idempotent() {
        for raw in [None, Some(""), Some("   "), Some("undefined"), Some("2025-03-10")] {
            let once = clean_date(raw);
            let twice = clean_date(once.as_deref());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn string_cleaning_keeps_whitespace() {
        assert_eq!(clean_string(None), None);
        assert_eq!(clean_string(Some("")), None);
        assert_eq!(clean_string(Some(" ")), Some(" ".to_string()));
        assert_eq!(clean_string(Some("x")), Some("x".to_string()));
    }
}
