//! Random temporary-name generation.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Options for [`generate_temp_name`].
#[derive(Debug, Clone)]
pub struct TempNameOptions {
    /// Prepended verbatim; counts against `size`.
    pub prefix: String,
    /// Appended verbatim; does not count against `size`.
    pub suffix: String,
    /// Length of prefix plus random body.
    pub size: usize,
}

impl Default for TempNameOptions {
    fn default() -> Self {
        TempNameOptions {
            prefix: String::new(),
            suffix: String::new(),
            size: 16,
        }
    }
}

/// Generate a random name of the form `<prefix><random><suffix>`.
///
/// The random body is alphanumeric and fills whatever budget `size` leaves
/// after the prefix; a prefix longer than `size` returns the prefix alone.
///
/// # Examples
/// ```
/// use structeq::utils::naming::{generate_temp_name, TempNameOptions};
///
/// let name = generate_temp_name(&TempNameOptions {
///     prefix: "tmp_".to_string(),
///     suffix: ".json".to_string(),
///     size: 16,
/// });
/// assert!(name.starts_with("tmp_"));
/// assert!(name.ends_with(".json"));
/// assert_eq!(name.len(), 16 + ".json".len());
/// ```
pub fn generate_temp_name(options: &TempNameOptions) -> String {
    let Some(budget) = options.size.checked_sub(options.prefix.len()) else {
        return options.prefix.clone();
    };

    let body: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(budget)
        .map(char::from)
        .collect();

    format!("{}{}{}", options.prefix, body, options.suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_size() {
        let name = generate_temp_name(&TempNameOptions::default());
        assert_eq!(name.len(), 16);
        assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_prefix_counts_against_size() {
        let name = generate_temp_name(&TempNameOptions {
            prefix: "pre-".to_string(),
            suffix: String::new(),
            size: 10,
        });
        assert_eq!(name.len(), 10);
        assert!(name.starts_with("pre-"));
    }

    #[test]
    fn test_oversized_prefix_returned_alone() {
        let name = generate_temp_name(&TempNameOptions {
            prefix: "much-too-long-prefix".to_string(),
            suffix: ".tmp".to_string(),
            size: 8,
        });
        assert_eq!(name, "much-too-long-prefix");
    }

    #[test]
    fn test_names_are_distinct() {
        let a = generate_temp_name(&TempNameOptions::default());
        let b = generate_temp_name(&TempNameOptions::default());
        assert_ne!(a, b);
    }
}
