//! Dynamic value model.
//!
//! `Value` is the tagged union every engine operation traverses. Containers
//! (`Seq`, `Map`) are reference-counted and interior-mutable so callers can
//! build graphs that contain back-edges to already-inserted nodes; cycle
//! detection keys on that pointer identity.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Shared handle to an ordered sequence of values.
pub type SeqRef = Rc<RefCell<Vec<Value>>>;

/// Shared handle to an insertion-ordered string-keyed mapping.
pub type MapRef = Rc<RefCell<Entries>>;

/// Any datum the engine can traverse.
///
/// `Clone` on a `Value` is a handle clone: containers keep pointing at the
/// same underlying nodes. Use [`crate::cycle::simplify`] for a structural
/// copy.
#[derive(Debug, Clone)]
pub enum Value {
    /// Absent value, distinguished from `Null`.
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    /// Opaque-identity token; equal only to itself by reference.
    Token(Token),
    /// Instant in time. Compared by instant value, never by reference.
    Date(DateTime<Utc>),
    /// Function-like value carrying its source text.
    Callable(Callable),
    /// Ordered, index-addressed list.
    Seq(SeqRef),
    /// String-keyed mapping. Insertion order is kept for serialization;
    /// equality ignores it.
    Map(MapRef),
}

impl Value {
    /// Build a sequence from the given items.
    pub fn seq(items: Vec<Value>) -> Value {
        Value::Seq(Rc::new(RefCell::new(items)))
    }

    /// Build an empty sequence.
    pub fn empty_seq() -> Value {
        Value::seq(Vec::new())
    }

    /// Build a mapping from key/value pairs. Later duplicates replace
    /// earlier ones in place, keeping the first insertion position.
    pub fn map(pairs: Vec<(String, Value)>) -> Value {
        let mut entries = Entries::new();
        for (key, value) in pairs {
            entries.insert(key, value);
        }
        Value::Map(Rc::new(RefCell::new(entries)))
    }

    /// Build an empty mapping.
    pub fn empty_map() -> Value {
        Value::map(Vec::new())
    }

    /// Build a callable from its source text.
    pub fn callable(source: &str) -> Value {
        Value::Callable(Callable::new(source))
    }

    /// Build a fresh opaque-identity token.
    pub fn token(description: &str) -> Value {
        Value::Token(Token::new(description))
    }

    /// Insert into a mapping value. Returns false if this is not a `Map`.
    pub fn set(&self, key: &str, value: Value) -> bool {
        match self {
            Value::Map(map) => {
                map.borrow_mut().insert(key, value);
                true
            }
            _ => false,
        }
    }

    /// Append to a sequence value. Returns false if this is not a `Seq`.
    pub fn push(&self, value: Value) -> bool {
        match self {
            Value::Seq(seq) => {
                seq.borrow_mut().push(value);
                true
            }
            _ => false,
        }
    }

    /// Look up a key in a mapping value, cloning the handle.
    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            Value::Map(map) => map.borrow().get(key).cloned(),
            _ => None,
        }
    }

    /// Element at an index in a sequence value, cloning the handle.
    pub fn at(&self, index: usize) -> Option<Value> {
        match self {
            Value::Seq(seq) => seq.borrow().get(index).cloned(),
            _ => None,
        }
    }

    /// Number of entries or elements; zero for scalars.
    pub fn len(&self) -> usize {
        match self {
            Value::Seq(seq) => seq.borrow().len(),
            Value::Map(map) => map.borrow().len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True for `Seq` and `Map`, the only variants that can hold children.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Seq(_) | Value::Map(_))
    }

    /// Node identity for cycle detection: the container's allocation
    /// address. Scalars have no identity.
    pub fn address(&self) -> Option<usize> {
        match self {
            Value::Seq(seq) => Some(Rc::as_ptr(seq) as *const () as usize),
            Value::Map(map) => Some(Rc::as_ptr(map) as *const () as usize),
            _ => None,
        }
    }

    /// True when both values are the very same container node.
    pub fn same_node(&self, other: &Value) -> bool {
        match (self.address(), other.address()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Value {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Value {
        Value::Number(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Value {
        Value::Number(v as f64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Value {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Value {
        Value::Str(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Value {
        Value::Date(v)
    }
}

/// Insertion-ordered string-keyed entry list backing `Value::Map`.
///
/// Re-inserting an existing key replaces the value in place, keeping the
/// key's original position, mirroring property assignment semantics.
#[derive(Debug, Clone, Default)]
pub struct Entries {
    items: Vec<(String, Value)>,
}

impl Entries {
    pub fn new() -> Entries {
        Entries { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.items
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items.iter().any(|(k, _)| k == key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.items.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.items.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Value)> {
        self.items.iter()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|(k, _)| k.as_str())
    }
}

/// Opaque-identity token. Two tokens are the same only when they share the
/// same allocation; equal construction parameters do not make equal tokens.
#[derive(Debug, Clone)]
pub struct Token {
    inner: Rc<String>,
}

impl Token {
    pub fn new(description: &str) -> Token {
        Token {
            inner: Rc::new(description.to_string()),
        }
    }

    pub fn description(&self) -> &str {
        &self.inner
    }

    /// Reference identity, the only equality tokens have.
    pub fn same(&self, other: &Token) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.inner)
    }
}

/// Function-like value identified by its source text.
#[derive(Debug, Clone)]
pub struct Callable {
    source: Rc<String>,
}

impl Callable {
    pub fn new(source: &str) -> Callable {
        Callable {
            source: Rc::new(source.to_string()),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// True when both handles point at the very same callable.
    pub fn same(&self, other: &Callable) -> bool {
        Rc::ptr_eq(&self.source, &other.source)
    }
}

/// JSON-compatible serialization of a value.
///
/// `Undefined` serializes as `null`, dates as RFC 3339 strings with
/// millisecond precision, callables as their source text, tokens as
/// `"Symbol(<description>)"`. Non-finite numbers become `null` (serde_json's
/// behavior for them). The value must be acyclic; [`crate::canonical::stringify`]
/// breaks cycles before serializing.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Token(token) => serializer.serialize_str(&token.to_string()),
            Value::Date(date) => {
                serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Value::Callable(callable) => serializer.serialize_str(callable.source()),
            Value::Seq(seq) => {
                let items = seq.borrow();
                let mut out = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    out.serialize_element(item)?;
                }
                out.end()
            }
            Value::Map(map) => {
                let entries = map.borrow();
                let mut out = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries.iter() {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::seq(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::map(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_insert_replaces_in_place() {
        let mut entries = Entries::new();
        entries.insert("a", Value::from(1));
        entries.insert("b", Value::from(2));
        entries.insert("a", Value::from(3));

        assert_eq!(entries.len(), 2);
        let keys: Vec<&str> = entries.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert!(matches!(entries.get("a"), Some(Value::Number(n)) if *n == 3.0));
    }

    #[test]
    fn test_clone_aliases_container_nodes() {
        let original = Value::map(vec![("x".to_string(), Value::from(1))]);
        let alias = original.clone();

        alias.set("y", Value::from(2));
        assert_eq!(original.len(), 2);
        assert!(original.same_node(&alias));
    }

    #[test]
    fn test_tokens_have_reference_identity() {
        let t1 = Token::new("1");
        let t2 = Token::new("1");
        let t3 = t1.clone();

        assert!(!t1.same(&t2));
        assert!(t1.same(&t3));
    }

    #[test]
    fn test_scalars_have_no_address() {
        assert!(Value::Null.address().is_none());
        assert!(Value::from("abc").address().is_none());
        assert!(Value::empty_map().address().is_some());
        assert!(Value::empty_seq().address().is_some());
    }

    #[test]
    fn test_serialize_scalars() {
        assert_eq!(serde_json::to_string(&Value::Null).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Value::Undefined).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Value::from(true)).unwrap(), "true");
        assert_eq!(
            serde_json::to_string(&Value::from("hi")).unwrap(),
            "\"hi\""
        );
    }

    #[test]
    fn test_serialize_keeps_insertion_order() {
        let value = Value::map(vec![
            ("b".to_string(), Value::from(2)),
            ("a".to_string(), Value::from(1)),
        ]);
        let text = serde_json::to_string(&value).unwrap();
        assert!(text.find("\"b\"").unwrap() < text.find("\"a\"").unwrap());
    }

    #[test]
    fn test_from_json_round_trip() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"a": 1, "b": [true, null, "x"]}"#).unwrap();
        let value = Value::from(json);

        assert!(matches!(value.get("a"), Some(Value::Number(n)) if n == 1.0));
        assert_eq!(value.get("b").unwrap().len(), 3);
        assert!(matches!(value.get("b").unwrap().at(1), Some(Value::Null)));
    }
}
