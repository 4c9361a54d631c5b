//! CLI option shaping: key case normalization and session-to-argv
//! conversion.

use std::collections::BTreeMap;

use crate::value::Value;

/// Behavior knobs for [`import_lowercase_options`].
#[derive(Debug, Clone)]
pub struct LowercaseOptions {
    /// Strip dashes from keys before lowercasing (`--dry-run` style keys
    /// become `dryrun`). A key that is nothing but dashes is left alone.
    pub replace_dash: bool,
    /// When false, keys outside the keep-unchanged list pass through as-is.
    pub use_lowercase: bool,
}

impl Default for LowercaseOptions {
    fn default() -> Self {
        LowercaseOptions {
            replace_dash: false,
            use_lowercase: true,
        }
    }
}

/// Normalize raw option keys to lower case.
///
/// Keys listed in `unchanged` are restored to their given spelling no matter
/// how the raw map cased them; everything else is lowercased (or passed
/// through when `use_lowercase` is off).
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
/// use structeq::value::Value;
/// use structeq::utils::options::{import_lowercase_options, LowercaseOptions};
///
/// let mut raw = BTreeMap::new();
/// raw.insert("DefaultPage".to_string(), Value::from("index.html"));
/// raw.insert("StaticDirs".to_string(), Value::from("./public"));
///
/// let options = import_lowercase_options(&raw, &["staticDirs"], &LowercaseOptions::default());
/// assert!(options.contains_key("defaultpage"));
/// assert!(options.contains_key("staticDirs"));
/// ```
pub fn import_lowercase_options(
    raw: &BTreeMap<String, Value>,
    unchanged: &[&str],
    options: &LowercaseOptions,
) -> BTreeMap<String, Value> {
    // Wanted spellings, addressable by their lowercase form.
    let keep_unchanged: BTreeMap<String, String> = unchanged
        .iter()
        .map(|real| (real.trim().to_lowercase(), real.trim().to_string()))
        .collect();

    let mut normalized = BTreeMap::new();
    for (key, value) in raw {
        let mut lower = key.to_lowercase();
        if options.replace_dash {
            let stripped = lower.replace('-', "");
            if !stripped.is_empty() {
                lower = stripped;
            }
        }

        if let Some(wanted) = keep_unchanged.get(&lower) {
            normalized.insert(wanted.clone(), value.clone());
        } else if options.use_lowercase {
            normalized.insert(lower, value.clone());
        } else {
            normalized.insert(key.clone(), value.clone());
        }
    }

    normalized
}

/// Return a map holding every raw key plus its lowercase alias, both bound
/// to the same value.
pub fn change_options_to_lowercase(raw: &BTreeMap<String, Value>) -> BTreeMap<String, Value> {
    let mut out = BTreeMap::new();
    for (key, value) in raw {
        out.insert(key.clone(), value.clone());
        out.insert(key.to_lowercase(), value.clone());
    }
    out
}

/// Convert one session key/value into command-line arguments.
///
/// Known keys and their expansions:
/// - `port`, `protocol`, `timeout`, `host`, `defaultpage` → `--<key> <value>`
/// - `silent` → `--silent`
/// - `staticdirs` (sequence) → repeated `--dir <entry>`
/// - `enableapi` → `--disableapi` when false, nothing when true
///
/// Unknown keys expand to nothing.
pub fn session_key_to_args(key: &str, value: &Value) -> Vec<String> {
    match key.to_lowercase().as_str() {
        "port" | "protocol" | "timeout" | "host" | "defaultpage" => {
            vec![format!("--{}", key.to_lowercase()), render(value)]
        }
        "silent" => vec!["--silent".to_string()],
        "staticdirs" => {
            let mut args = Vec::new();
            if let Value::Seq(items) = value {
                for item in items.borrow().iter() {
                    args.push("--dir".to_string());
                    args.push(render(item));
                }
            } else {
                args.push("--dir".to_string());
                args.push(render(value));
            }
            args
        }
        "enableapi" => match value {
            Value::Bool(false) => vec!["--disableapi".to_string()],
            _ => Vec::new(),
        },
        other => {
            log::debug!("ignoring unknown session key '{}'", other);
            Vec::new()
        }
    }
}

/// Flatten a whole session map into an argv fragment.
pub fn session_to_args(session: &BTreeMap<String, Value>) -> Vec<String> {
    let mut args = Vec::new();
    for (key, value) in session {
        args.extend(session_key_to_args(key, value));
    }
    args
}

fn render(value: &Value) -> String {
    match value {
        Value::Str(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) if n.fract() == 0.0 && n.is_finite() => format!("{}", *n as i64),
        Value::Number(n) => n.to_string(),
        other => crate::canonical::stringify(other),
    }
}
