//! # Structeq - structural equality and cycle-safe canonicalization
//!
//! This library provides a deterministic deep-equality algorithm and a
//! cycle-safe structural serializer over a dynamically-typed value graph,
//! plus the small helper utilities that grew up around them.
//!
//! ## Overview
//!
//! The central type is [`value::Value`], a tagged union covering scalars,
//! opaque-identity tokens, date instants, source-text callables, ordered
//! sequences and insertion-ordered mappings. Containers are shared,
//! reference-counted nodes, so a caller can build graphs with back-edges;
//! every engine operation detects those back-edges by node identity and
//! terminates on any finite graph.
//!
//! ## Key operations
//!
//! - [`cycle::is_cyclic`]: would a naive full-depth serialization recurse
//!   forever?
//! - [`cycle::simplify`]: cycle-safe canonical deep copy; back-edges become
//!   the literal string `"[circular reference]"`
//! - [`canonical::canonical_sort`]: map keys into lexicographic order, for
//!   order-blind comparison
//! - [`canonical::stringify`]: JSON text of any finite value graph
//! - [`equality::are_equals`]: deep structural equality with documented
//!   tie-break rules
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `value`: the `Value` model, entry storage and JSON conversions
//! - `cycle`: cycle detection and cycle-safe copying
//! - `canonical`: canonical ordering and text serialization
//! - `equality`: the deep-equality comparator
//! - `json_io`: JSON file load/save/replace-if-different helpers
//! - `utils`: deep merge, temp-name generation, CLI option shaping, path
//!   conventions
//!
//! ## Example Usage
//!
//! ```rust
//! use structeq::value::Value;
//! use structeq::{are_equals, simplify, stringify, CIRCULAR_SENTINEL};
//!
//! // Insertion order does not matter for equality.
//! let a = Value::map(vec![
//!     ("a".to_string(), Value::from(1)),
//!     ("b".to_string(), Value::from(2)),
//! ]);
//! let b = Value::map(vec![
//!     ("b".to_string(), Value::from(2)),
//!     ("a".to_string(), Value::from(1)),
//! ]);
//! assert!(are_equals(&a, &b));
//!
//! // Cyclic graphs serialize finitely.
//! let looped = Value::empty_map();
//! looped.set("self", looped.clone());
//! assert!(stringify(&looped).contains(CIRCULAR_SENTINEL));
//! assert!(!structeq::is_cyclic(&simplify(&looped)));
//! ```
//!
//! ## Error Handling
//!
//! Engine operations are infallible for well-formed finite graphs and
//! return plain values. File helpers return `color_eyre` results; typed
//! leaf errors use `thiserror` enums. Recoverable oddities are logged via
//! the `log` facade; the library never initializes a logger.

pub mod canonical;
pub mod cycle;
pub mod equality;
pub mod json_io;
pub mod utils;
pub mod value;

pub use canonical::{canonical_sort, canonical_text, stringify};
pub use cycle::{is_cyclic, simplify, CIRCULAR_SENTINEL};
pub use equality::{are_equals, TypeCategory};
pub use value::{Callable, Entries, Token, Value};
