//! Deep merge over value mappings.
//!
//! Merging never mutates its operands: the result is built from fresh nodes
//! via the cycle-safe copier, so aliasing bugs and cyclic sources are both
//! handled.

use crate::cycle::simplify;
use crate::value::Value;

/// Deep-merge `source` into `target`, returning a new value.
///
/// When both sides hold a mapping at the same key the mappings are merged
/// recursively; any other kind of source value replaces the target's. When
/// either operand is not a mapping, a copy of `target` is returned
/// unchanged.
///
/// # Examples
/// ```
/// use structeq::value::Value;
/// use structeq::utils::merge::merge_deep;
/// use structeq::equality::are_equals;
///
/// let target = Value::map(vec![
///     ("a".to_string(), Value::from(1)),
///     ("nested".to_string(), Value::map(vec![("x".to_string(), Value::from(1))])),
/// ]);
/// let source = Value::map(vec![
///     ("nested".to_string(), Value::map(vec![("y".to_string(), Value::from(2))])),
/// ]);
///
/// let merged = merge_deep(&target, &source);
/// let expected = Value::map(vec![
///     ("a".to_string(), Value::from(1)),
///     ("nested".to_string(), Value::map(vec![
///         ("x".to_string(), Value::from(1)),
///         ("y".to_string(), Value::from(2)),
///     ])),
/// ]);
/// assert!(are_equals(&merged, &expected));
/// ```
pub fn merge_deep(target: &Value, source: &Value) -> Value {
    let (Value::Map(_), Value::Map(_)) = (target, source) else {
        return simplify(target);
    };

    let merged = simplify(target);
    merge_into(&merged, source);
    merged
}

/// Fold a list of sources into `target`, left to right, later sources taking
/// precedence. Mirrors a defaults-then-overrides option merge.
pub fn merge_deep_all(target: &Value, sources: &[Value]) -> Value {
    let mut merged = simplify(target);
    for source in sources {
        merged = merge_deep(&merged, source);
    }
    merged
}

// Recursion depth is bounded by `dest`, which is always a finite simplify
// copy; cyclic source subtrees take the simplify branch below.
fn merge_into(dest: &Value, source: &Value) {
    let Value::Map(source_map) = source else {
        return;
    };

    for (key, child) in source_map.borrow().iter() {
        match (dest.get(key), child) {
            (Some(existing @ Value::Map(_)), Value::Map(_)) => {
                merge_into(&existing, child);
            }
            _ => {
                dest.set(key, simplify(child));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::CIRCULAR_SENTINEL;
    use crate::equality::are_equals;

    #[test]
    fn test_scalar_overrides() {
        let target = Value::map(vec![("a".to_string(), Value::from(1))]);
        let source = Value::map(vec![("a".to_string(), Value::from(2))]);

        let merged = merge_deep(&target, &source);
        assert!(matches!(merged.get("a"), Some(Value::Number(n)) if n == 2.0));
        // Target untouched.
        assert!(matches!(target.get("a"), Some(Value::Number(n)) if n == 1.0));
    }

    #[test]
    fn test_non_map_source_returns_target_copy() {
        let target = Value::map(vec![("a".to_string(), Value::from(1))]);
        let merged = merge_deep(&target, &Value::from(5));
        assert!(are_equals(&merged, &target));
        assert!(!merged.same_node(&target));
    }

    #[test]
    fn test_recursive_merge_keeps_unrelated_keys() {
        let target = Value::map(vec![(
            "nested".to_string(),
            Value::map(vec![("keep".to_string(), Value::from(true))]),
        )]);
        let source = Value::map(vec![(
            "nested".to_string(),
            Value::map(vec![("add".to_string(), Value::from(false))]),
        )]);

        let merged = merge_deep(&target, &source);
        let nested = merged.get("nested").unwrap();
        assert_eq!(nested.len(), 2);
    }

    #[test]
    fn test_merge_all_later_sources_win() {
        let target = Value::map(vec![("a".to_string(), Value::from(1))]);
        let sources = vec![
            Value::map(vec![("a".to_string(), Value::from(2))]),
            Value::map(vec![("a".to_string(), Value::from(3))]),
        ];

        let merged = merge_deep_all(&target, &sources);
        assert!(matches!(merged.get("a"), Some(Value::Number(n)) if n == 3.0));
    }

    #[test]
    fn test_cyclic_source_is_broken_not_aliased() {
        let target = Value::empty_map();
        let source = Value::empty_map();
        let looped = Value::empty_map();
        looped.set("me", looped.clone());
        source.set("loop", looped);

        let merged = merge_deep(&target, &source);
        let broken = merged.get("loop").unwrap();
        assert!(matches!(broken.get("me"), Some(Value::Str(s)) if s == CIRCULAR_SENTINEL));
    }
}
