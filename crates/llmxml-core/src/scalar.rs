//! Scalar Coercion — raw tag text into primitive and enumeration values.
//!
//! A failed parse is "no value observed", never an error; default completion
//! later decides what unobserved becomes.

use serde_json::{Number, Value};

use crate::shape::PrimitiveKind;

/// Coerce the raw text of a primitive element.
///
/// Strings are kept verbatim — surrounding whitespace can be significant for
/// opaque content like file bodies. Numeric and boolean text is trimmed and
/// parsed with the host literal rules.
pub(crate) fn coerce_primitive(kind: PrimitiveKind, raw: &str) -> Option<Value> {
    match kind {
        PrimitiveKind::String => Some(Value::String(raw.to_string())),
        PrimitiveKind::Integer => match raw.trim().parse::<i64>() {
            Ok(n) => Some(Value::from(n)),
            Err(_) => {
                tracing::debug!(raw = raw.trim(), "integer text failed to parse");
                None
            }
        },
        PrimitiveKind::Float => match raw.trim().parse::<f64>() {
            // Non-finite floats have no JSON representation.
            Ok(n) => Number::from_f64(n).map(Value::Number),
            Err(_) => {
                tracing::debug!(raw = raw.trim(), "float text failed to parse");
                None
            }
        },
        PrimitiveKind::Boolean => {
            let text = raw.trim();
            if text.eq_ignore_ascii_case("true") {
                Some(Value::Bool(true))
            } else if text.eq_ignore_ascii_case("false") {
                Some(Value::Bool(false))
            } else {
                None
            }
        }
    }
}

/// Coerce the raw text of an enumeration element.
///
/// All-digit text is a 1-based index into the declared variant order;
/// out-of-range or non-positive indexes fall back to the default (first)
/// variant. Anything else must name a variant exactly, otherwise the value
/// counts as unobserved.
pub(crate) fn coerce_variant(variants: &[String], raw: &str) -> Option<Value> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if text.bytes().all(|b| b.is_ascii_digit()) {
        let chosen = match text.parse::<usize>() {
            Ok(i) if i >= 1 && i <= variants.len() => variants.get(i - 1),
            _ => variants.first(),
        };
        return chosen.cloned().map(Value::String);
    }

    match variants.iter().find(|v| v.as_str() == text) {
        Some(v) => Some(Value::String(v.clone())),
        None => {
            tracing::debug!(raw = text, "text names no declared variant");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ops() -> Vec<String> {
        vec!["open".into(), "edit".into(), "create".into()]
    }

    #[test]
    fn test_variant_one_based_index() {
        assert_eq!(coerce_variant(&ops(), "1"), Some(json!("open")));
        assert_eq!(coerce_variant(&ops(), "2"), Some(json!("edit")));
        assert_eq!(coerce_variant(&ops(), " 3 "), Some(json!("create")));
    }

    #[test]
    fn test_variant_out_of_range_defaults() {
        assert_eq!(coerce_variant(&ops(), "0"), Some(json!("open")));
        assert_eq!(coerce_variant(&ops(), "99"), Some(json!("open")));
        // Overflowing digit strings are just another out-of-range index.
        assert_eq!(
            coerce_variant(&ops(), "99999999999999999999999999"),
            Some(json!("open"))
        );
    }

    #[test]
    fn test_variant_direct_name() {
        assert_eq!(coerce_variant(&ops(), "edit"), Some(json!("edit")));
        assert_eq!(coerce_variant(&ops(), "\nopen\n"), Some(json!("open")));
    }

    #[test]
    fn test_variant_unknown_is_unobserved() {
        assert_eq!(coerce_variant(&ops(), "delete"), None);
        assert_eq!(coerce_variant(&ops(), ""), None);
        assert_eq!(coerce_variant(&[], "1"), None);
    }

    #[test]
    fn test_primitive_string_verbatim() {
        assert_eq!(
            coerce_primitive(PrimitiveKind::String, "  keep me  "),
            Some(json!("  keep me  "))
        );
    }

    #[test]
    fn test_primitive_numbers() {
        assert_eq!(coerce_primitive(PrimitiveKind::Integer, " 42 "), Some(json!(42)));
        assert_eq!(coerce_primitive(PrimitiveKind::Integer, "4.2"), None);
        assert_eq!(coerce_primitive(PrimitiveKind::Float, "0.95"), Some(json!(0.95)));
        assert_eq!(coerce_primitive(PrimitiveKind::Float, "NaN"), None);
        assert_eq!(coerce_primitive(PrimitiveKind::Float, "abc"), None);
    }

    #[test]
    fn test_primitive_booleans() {
        assert_eq!(coerce_primitive(PrimitiveKind::Boolean, "true"), Some(json!(true)));
        assert_eq!(coerce_primitive(PrimitiveKind::Boolean, " False "), Some(json!(false)));
        assert_eq!(coerce_primitive(PrimitiveKind::Boolean, "yes"), None);
    }
}
