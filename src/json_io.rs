//! JSON file helpers built on the equality engine.
//!
//! The interesting piece is [`replace_json_content`]: a file is only
//! rewritten when its current structure differs from the new value, with the
//! decision made by [`crate::equality::are_equals`] rather than by raw text
//! comparison, and the write protected by a temporary security copy.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, Result, WrapErr};

use crate::canonical::stringify;
use crate::cycle::simplify;
use crate::equality::are_equals;
use crate::value::Value;

/// Load a JSON file into a [`Value`], preserving key order.
pub fn load_json_value(filepath: &Path) -> Result<Value> {
    let raw = fs::read_to_string(filepath)
        .wrap_err_with(|| format!("could not read {}", filepath.display()))?;
    let json: serde_json::Value = serde_json::from_str(&raw)
        .wrap_err_with(|| format!("{} is not valid JSON", filepath.display()))?;
    Ok(Value::from(json))
}

/// Write a value to a JSON file. Cycles are broken with the sentinel before
/// writing, so any finite graph is accepted.
pub fn save_json_value(filepath: &Path, value: &Value, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(&simplify(value))
            .map_err(|err| eyre!("could not serialize value: {}", err))?
    } else {
        stringify(value)
    };
    fs::write(filepath, text)
        .wrap_err_with(|| format!("could not write {}", filepath.display()))?;
    Ok(())
}

/// First non-existing backup name for a file: `name.bak`, then `name.bak.0`,
/// `name.bak.1`, ...
pub fn backup_copy_name(filepath: &Path, extension: &str) -> PathBuf {
    let candidate = filepath.with_extension(extension);
    if !candidate.exists() {
        return candidate;
    }

    for i in 0.. {
        let candidate = filepath.with_extension(format!("{}.{}", extension, i));
        if !candidate.exists() {
            return candidate;
        }
    }
    unreachable!("some backup index is always free");
}

/// Replace a JSON file's content if and only if it structurally differs
/// from `value`.
///
/// Returns `Ok(true)` when the file was written, `Ok(false)` when it
/// already held an equal structure and was left alone. The write goes
/// through a `.bak` security copy that is removed once the new content is
/// in place; a missing target file is simply created.
pub fn replace_json_content(filepath: &Path, value: &Value) -> Result<bool> {
    if !filepath.exists() {
        log::debug!("{} does not exist yet, creating it", filepath.display());
        save_json_value(filepath, value, true)?;
        return Ok(true);
    }

    match load_json_value(filepath) {
        Ok(existing) => {
            if are_equals(&existing, value) {
                log::debug!(
                    "{} already holds an equal structure, skipping write",
                    filepath.display()
                );
                return Ok(false);
            }
        }
        Err(err) => {
            // Unreadable or invalid JSON gets overwritten, not propagated.
            log::warn!(
                "could not compare against {}: {:#}. Overwriting.",
                filepath.display(),
                err
            );
        }
    }

    let backup = backup_copy_name(filepath, "bak");
    fs::copy(filepath, &backup)
        .wrap_err_with(|| format!("could not create security copy {}", backup.display()))?;

    // If this write fails the backup stays behind for manual recovery.
    save_json_value(filepath, value, true)?;

    if let Err(err) = fs::remove_file(&backup) {
        log::warn!(
            "could not remove security copy {}: {}",
            backup.display(),
            err
        );
    }

    Ok(true)
}
