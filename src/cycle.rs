//! Cycle detection and cycle-safe copying.
//!
//! A value graph is cyclic when some container reachable from the root holds
//! a reference to one of its own ancestors on the traversal path. Detection
//! keys on container allocation addresses, never on structural equality: two
//! identical-looking but distinct nodes are different nodes.

use crate::value::Value;

/// Marker substituted for a back-edge to an ancestor node.
pub const CIRCULAR_SENTINEL: &str = "[circular reference]";

/// Check whether a naive full-depth serialization of `value` would recurse
/// forever.
///
/// No side effects; the input is not mutated. Shared references that are not
/// on their own ancestor path (diamonds) do not count as cycles.
///
/// # Examples
/// ```
/// use structeq::value::Value;
/// use structeq::cycle::is_cyclic;
///
/// let a = Value::empty_map();
/// assert!(!is_cyclic(&a));
///
/// a.set("self", a.clone());
/// assert!(is_cyclic(&a));
/// ```
pub fn is_cyclic(value: &Value) -> bool {
    let mut path = Vec::new();
    walk(value, &mut path)
}

fn walk(value: &Value, path: &mut Vec<usize>) -> bool {
    let Some(address) = value.address() else {
        return false;
    };
    if path.contains(&address) {
        return true;
    }

    path.push(address);
    let found = match value {
        Value::Seq(seq) => seq.borrow().iter().any(|child| walk(child, path)),
        Value::Map(map) => map.borrow().iter().any(|(_, child)| walk(child, path)),
        _ => false,
    };
    path.pop();
    found
}

/// Produce a cycle-safe canonical copy of `value`.
///
/// Acyclic input yields an equivalent deep copy with fresh container nodes.
/// Cyclic input is rebuilt depth-first: any child that is a reference to a
/// node still being expanded on the current ancestor path is replaced with
/// the [`CIRCULAR_SENTINEL`] string. Shared-but-not-cyclic references are
/// expanded independently each time, so the copy can be larger than the
/// input graph.
///
/// Terminates for any finite graph and never mutates the input.
///
/// # Examples
/// ```
/// use structeq::value::Value;
/// use structeq::cycle::{simplify, CIRCULAR_SENTINEL};
///
/// let a = Value::empty_map();
/// a.set("self", a.clone());
///
/// let copy = simplify(&a);
/// assert!(matches!(copy.get("self"), Some(Value::Str(s)) if s == CIRCULAR_SENTINEL));
/// ```
pub fn simplify(value: &Value) -> Value {
    if !is_cyclic(value) {
        return deep_copy(value);
    }
    let mut ancestors = Vec::new();
    rebuild(value, &mut ancestors)
}

fn rebuild(value: &Value, ancestors: &mut Vec<usize>) -> Value {
    match value {
        Value::Seq(seq) => {
            ancestors.push(value.address().unwrap_or_default());
            let items: Vec<Value> = seq
                .borrow()
                .iter()
                .map(|child| rebuild_child(child, ancestors))
                .collect();
            ancestors.pop();
            Value::seq(items)
        }
        Value::Map(map) => {
            ancestors.push(value.address().unwrap_or_default());
            let pairs: Vec<(String, Value)> = map
                .borrow()
                .iter()
                .map(|(key, child)| (key.clone(), rebuild_child(child, ancestors)))
                .collect();
            ancestors.pop();
            Value::map(pairs)
        }
        other => other.clone(),
    }
}

fn rebuild_child(child: &Value, ancestors: &mut Vec<usize>) -> Value {
    let Some(address) = child.address() else {
        // Scalars carry no identity and cannot close a cycle.
        return child.clone();
    };

    if ancestors.contains(&address) {
        log::debug!("replacing back-edge to ancestor node {:#x} with sentinel", address);
        return Value::Str(CIRCULAR_SENTINEL.to_string());
    }

    if !is_cyclic(child) {
        deep_copy(child)
    } else {
        rebuild(child, ancestors)
    }
}

/// Plain structural deep copy. Callers must ensure the input is acyclic;
/// `simplify` is the safe entry point for arbitrary graphs.
pub(crate) fn deep_copy(value: &Value) -> Value {
    match value {
        Value::Seq(seq) => Value::seq(seq.borrow().iter().map(deep_copy).collect()),
        Value::Map(map) => Value::map(
            map.borrow()
                .iter()
                .map(|(key, child)| (key.clone(), deep_copy(child)))
                .collect(),
        ),
        other => other.clone(),
    }
}
