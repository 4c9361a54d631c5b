//! Canonical ordering and text serialization.
//!
//! The canonical form rewrites mapping keys into lexicographic order so two
//! mappings holding the same entries compare equal regardless of insertion
//! order. Serialization (`stringify`) deliberately keeps insertion order:
//! canonical ordering exists for equality, not for output.

use crate::cycle::simplify;
use crate::value::Value;

/// Rewrite `value` into its canonical form.
///
/// - Mapping keys are sorted lexicographically, recursively.
/// - Sequence element order is preserved (it is semantically significant);
///   elements are canonicalized in place.
/// - Callables are reduced to their source-text string.
/// - Dates pass through unchanged; they are matched by their own variant, so
///   they can never be mistaken for an empty mapping.
///
/// Cyclic operands are legal: the value is run through
/// [`crate::cycle::simplify`] first, so back-edges become the sentinel
/// string before sorting. The input is never mutated; the result is built
/// from fresh nodes. Idempotent.
///
/// # Examples
/// ```
/// use structeq::value::Value;
/// use structeq::canonical::{canonical_sort, stringify};
///
/// let v = Value::map(vec![
///     ("b".to_string(), Value::from(2)),
///     ("a".to_string(), Value::from(1)),
/// ]);
/// let text = stringify(&canonical_sort(&v));
/// assert!(text.find("\"a\"").unwrap() < text.find("\"b\"").unwrap());
/// ```
pub fn canonical_sort(value: &Value) -> Value {
    let safe = simplify(value);
    sorted(&safe)
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Map(map) => {
            let mut pairs: Vec<(String, Value)> = map
                .borrow()
                .iter()
                .map(|(key, child)| (key.clone(), sorted(child)))
                .collect();
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            Value::map(pairs)
        }
        Value::Seq(seq) => Value::seq(seq.borrow().iter().map(sorted).collect()),
        Value::Callable(callable) => Value::Str(callable.source().to_string()),
        other => other.clone(),
    }
}

/// Serialize `value` to JSON text, breaking cycles first.
///
/// Keys appear in their original insertion order. Back-edges show up as the
/// literal string `"[circular reference]"` in place of the referenced
/// subtree; everything else is conventional JSON (dates as RFC 3339 strings,
/// callables as their source text, `Undefined` and non-finite numbers as
/// `null`). The output parses with any standard JSON parser.
pub fn stringify(value: &Value) -> String {
    let safe = simplify(value);
    match serde_json::to_string(&safe) {
        Ok(text) => text,
        Err(err) => {
            // Unreachable for string-keyed values; keep the traversal's
            // best-effort posture instead of panicking.
            log::error!("serialization failed after cycle-breaking: {}", err);
            "null".to_string()
        }
    }
}

/// Canonical JSON text: the serialization of the canonical form. This is
/// the text [`crate::equality::are_equals`] compares.
pub fn canonical_text(value: &Value) -> String {
    let canonical = canonical_sort(value);
    match serde_json::to_string(&canonical) {
        Ok(text) => text,
        Err(err) => {
            log::error!("serialization of canonical form failed: {}", err);
            "null".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::CIRCULAR_SENTINEL;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_sorts_map_keys_recursively() {
        let v = Value::map(vec![
            (
                "z".to_string(),
                Value::map(vec![
                    ("b".to_string(), Value::from(2)),
                    ("a".to_string(), Value::from(1)),
                ]),
            ),
            ("a".to_string(), Value::from(0)),
        ]);

        let text = stringify(&canonical_sort(&v));
        assert!(text.find("\"a\"").unwrap() < text.find("\"z\"").unwrap());
        let inner = &text[text.find("\"z\"").unwrap()..];
        assert!(inner.find("\"a\"").unwrap() < inner.find("\"b\"").unwrap());
    }

    #[test]
    fn test_sequence_order_is_preserved() {
        let v = Value::seq(vec![Value::from(3), Value::from(1), Value::from(2)]);
        let text = stringify(&canonical_sort(&v));
        assert_eq!(text, "[3.0,1.0,2.0]");
    }

    #[test]
    fn test_callable_reduces_to_source_text() {
        let v = Value::callable("() => {}");
        let sorted = canonical_sort(&v);
        assert!(matches!(sorted, Value::Str(s) if s == "() => {}"));
    }

    #[test]
    fn test_date_passes_through_by_tag() {
        let instant = Utc.with_ymd_and_hms(2015, 10, 23, 0, 0, 0).unwrap();
        let sorted = canonical_sort(&Value::Date(instant));
        assert!(matches!(sorted, Value::Date(d) if d == instant));
    }

    #[test]
    fn test_idempotence() {
        let v = Value::map(vec![
            ("b".to_string(), Value::seq(vec![Value::from("x")])),
            ("a".to_string(), Value::callable("fn body")),
        ]);
        let once = canonical_sort(&v);
        let twice = canonical_sort(&once);
        assert_eq!(canonical_text(&once), canonical_text(&twice));
    }

    #[test]
    fn test_does_not_mutate_input() {
        let v = Value::map(vec![
            ("b".to_string(), Value::from(2)),
            ("a".to_string(), Value::from(1)),
        ]);
        let _ = canonical_sort(&v);

        if let Value::Map(map) = &v {
            let keys: Vec<String> = map.borrow().keys().map(String::from).collect();
            assert_eq!(keys, vec!["b", "a"]);
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_stringify_keeps_insertion_order() {
        let v = Value::map(vec![
            ("zeta".to_string(), Value::from(1)),
            ("alpha".to_string(), Value::from(2)),
        ]);
        let text = stringify(&v);
        assert!(text.find("zeta").unwrap() < text.find("alpha").unwrap());
    }

    #[test]
    fn test_stringify_cyclic_value_is_parseable_json() {
        let a = Value::empty_map();
        a.set("a", Value::from(1));
        let c = Value::empty_map();
        c.set("d", a.clone());
        a.set("b", Value::from(2));
        a.set("c", c);

        let text = stringify(&a);
        assert!(text.contains(CIRCULAR_SENTINEL));
        let parsed: serde_json::Value = serde_json::from_str(&text).expect("valid JSON");
        assert!(parsed.is_object());
    }

    #[test]
    fn test_stringify_undefined_and_nan_as_null() {
        let v = Value::seq(vec![Value::Undefined, Value::Number(f64::NAN)]);
        assert_eq!(stringify(&v), "[null,null]");
    }
}
