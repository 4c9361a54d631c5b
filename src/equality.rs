//! Deep structural equality.
//!
//! Equality is decided in a fixed priority order: coarse runtime category,
//! token identity, then canonical-text comparison. The canonical step makes
//! the relation symmetric and insertion-order-blind for mappings.

use crate::canonical::canonical_text;
use crate::value::Value;

/// Coarse runtime category of a value, shaped like a dynamic `typeof`:
/// `Null`, dates, sequences and mappings all land in `Object`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Undefined,
    Boolean,
    Number,
    String,
    Symbol,
    Function,
    Object,
}

impl Value {
    pub fn type_category(&self) -> TypeCategory {
        match self {
            Value::Undefined => TypeCategory::Undefined,
            Value::Bool(_) => TypeCategory::Boolean,
            Value::Number(_) => TypeCategory::Number,
            Value::Str(_) => TypeCategory::String,
            Value::Token(_) => TypeCategory::Symbol,
            Value::Callable(_) => TypeCategory::Function,
            Value::Null | Value::Date(_) | Value::Seq(_) | Value::Map(_) => TypeCategory::Object,
        }
    }
}

/// Deep structural equality between two values.
///
/// Tie-break rules, in priority order:
/// 1. Different coarse categories → `false` (so `null` vs `undefined` is
///    `false`, and a callable never equals the string of its own source).
/// 2. Two opaque tokens → equal only when they are the same token by
///    reference; identical construction parameters do not help.
/// 3. Otherwise both operands are canonicalized (cycles broken first, map
///    keys sorted, callables reduced to source text) and their JSON texts
///    compared. Two distinct callables with identical source text therefore
///    compare equal — a deliberate, documented policy. Dates compare by
///    instant value.
///
/// Symmetric, and reflexive on acyclic values. Never fails for well-formed
/// finite graphs, cyclic or not.
///
/// # Examples
/// ```
/// use structeq::value::Value;
/// use structeq::equality::are_equals;
///
/// let left = Value::map(vec![
///     ("a".to_string(), Value::from(1)),
///     ("b".to_string(), Value::from(2)),
/// ]);
/// let right = Value::map(vec![
///     ("b".to_string(), Value::from(2)),
///     ("a".to_string(), Value::from(1)),
/// ]);
/// assert!(are_equals(&left, &right));
/// ```
pub fn are_equals(a: &Value, b: &Value) -> bool {
    if a.type_category() != b.type_category() {
        return false;
    }

    if let (Value::Token(x), Value::Token(y)) = (a, b) {
        return x.same(y);
    }

    // Same container node: trivially equal, skip the canonical round-trip.
    if a.same_node(b) {
        return true;
    }

    canonical_text(a) == canonical_text(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_category_mismatch_is_false() {
        assert!(!are_equals(&Value::Null, &Value::Undefined));
        assert!(!are_equals(&Value::Null, &Value::from(false)));
        assert!(!are_equals(&Value::from(0), &Value::from("0")));
    }

    #[test]
    fn test_null_and_undefined_reflexive() {
        assert!(are_equals(&Value::Null, &Value::Null));
        assert!(are_equals(&Value::Undefined, &Value::Undefined));
    }

    #[test]
    fn test_null_is_not_an_empty_map() {
        assert!(!are_equals(&Value::Null, &Value::empty_map()));
    }

    #[test]
    fn test_tokens_born_equal_are_not_equal() {
        let s1 = Value::token("1");
        let s2 = Value::token("1");
        assert!(!are_equals(&s1, &s2));
        assert!(are_equals(&s1, &s1.clone()));
    }

    #[test]
    fn test_callables_equal_by_source_text() {
        let f1 = Value::callable("() => {}");
        let f2 = Value::callable("() => {}");
        let f3 = Value::callable("() => { return 2; }");

        assert!(are_equals(&f1, &f1));
        assert!(are_equals(&f1, &f2));
        assert!(!are_equals(&f1, &f3));
    }

    #[test]
    fn test_callable_never_equals_its_source_string() {
        let f1 = Value::callable("() => {}");
        let s = Value::from("() => {}");
        assert!(!are_equals(&f1, &s));
    }

    #[test]
    fn test_dates_compare_by_instant() {
        let instant = Utc.with_ymd_and_hms(2015, 10, 23, 0, 0, 0).unwrap();
        let other = Utc.with_ymd_and_hms(2020, 1, 1, 12, 30, 0).unwrap();

        assert!(are_equals(&Value::Date(instant), &Value::Date(instant)));
        assert!(!are_equals(&Value::Date(instant), &Value::Date(other)));
        assert!(!are_equals(&Value::Date(instant), &Value::empty_map()));
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let left = Value::map(vec![
            ("ff".to_string(), Value::from(6)),
            ("ee".to_string(), Value::from(5)),
            ("aa".to_string(), Value::from(1)),
        ]);
        let right = Value::map(vec![
            ("aa".to_string(), Value::from(1)),
            ("ff".to_string(), Value::from(6)),
            ("ee".to_string(), Value::from(5)),
        ]);
        assert!(are_equals(&left, &right));
        assert!(are_equals(&right, &left));
    }

    #[test]
    fn test_sequence_order_matters() {
        let left = Value::seq(vec![Value::from(1), Value::from(2), Value::from(3)]);
        let right = Value::seq(vec![Value::from(1), Value::from(3), Value::from(2)]);
        assert!(!are_equals(&left, &right));
    }

    #[test]
    fn test_cyclic_values_compare_via_sentinel() {
        let a = Value::empty_map();
        a.set("self", a.clone());
        let b = Value::empty_map();
        b.set("self", b.clone());

        // Both canonicalize to { self: "[circular reference]" }.
        assert!(are_equals(&a, &b));
        assert!(are_equals(&a, &a));
    }

    #[test]
    fn test_same_node_fast_path() {
        let a = Value::map(vec![("x".to_string(), Value::from(1))]);
        assert!(are_equals(&a, &a.clone()));
    }
}
