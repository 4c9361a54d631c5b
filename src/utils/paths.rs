//! Path normalization conventions.
//!
//! Conventions used throughout:
//! - paths are made of forward slashes only (backslashes are converted);
//! - a folder path always ends with a `/`;
//! - relative paths are prefixed with `./` unless they already start with
//!   `.` or `/`.

use std::fs;
use std::path::Path;

/// Errors from filesystem-checked path normalization.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("The source file \"{path}\" does not exist")]
    NotFound { path: String },

    #[error("Only files and folders are handled: {path}")]
    Unsupported { path: String },

    #[error("Could not read metadata for {path}")]
    Inaccessible {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Options for [`normalise_path`].
#[derive(Debug, Clone)]
pub struct NormaliseOptions {
    /// Force folder (`Some(true)`) or file (`Some(false)`) treatment;
    /// `None` infers a folder from a trailing slash.
    pub is_folder: Option<bool>,
    /// Rewrite `C:/...` style drive prefixes into plain slash-joined form,
    /// substituting `unc_root` for the drive when given.
    pub force_linux_format: bool,
    /// Prefix relative paths with `./`.
    pub force_relative: bool,
    pub unc_root: Option<String>,
}

impl Default for NormaliseOptions {
    fn default() -> Self {
        NormaliseOptions {
            is_folder: None,
            force_linux_format: false,
            force_relative: true,
            unc_root: None,
        }
    }
}

/// True when `source` follows the folder convention (ends with `/`).
pub fn is_conventional_folder(source: &str) -> bool {
    !source.is_empty() && source.ends_with('/')
}

/// Normalize a path according to the crate conventions.
///
/// Empty input and `"."` both normalize to `"./"`. `.` and `..` segments
/// are collapsed and backslashes become forward slashes.
///
/// # Examples
/// ```
/// use structeq::utils::paths::{normalise_path, NormaliseOptions};
///
/// assert_eq!(normalise_path("", &NormaliseOptions::default()), "./");
/// assert_eq!(normalise_path("a\\b\\c", &NormaliseOptions::default()), "./a/b/c");
/// assert_eq!(normalise_path("a/./b/../c/", &NormaliseOptions::default()), "./a/c/");
/// ```
pub fn normalise_path(filepath: &str, options: &NormaliseOptions) -> String {
    let trimmed = filepath.trim();
    if trimmed.is_empty() || trimmed == "." {
        return "./".to_string();
    }

    let forward = trimmed.replace('\\', "/");
    let is_folder = options
        .is_folder
        .unwrap_or_else(|| is_conventional_folder(&forward));

    let mut path = collapse_segments(&forward);
    if is_folder && !is_conventional_folder(&path) {
        path.push('/');
    }

    if is_absolute(&path) {
        if options.force_linux_format {
            if let Some((drive, rest)) = path.split_once(":/") {
                let root = options.unc_root.as_deref().unwrap_or(drive);
                path = format!("{}/{}", root, rest);
            }
        }
        return path;
    }

    if options.force_relative && !path.starts_with('.') && !path.starts_with('/') {
        path = format!("./{}", path);
    }

    path
}

/// Normalize a path, forcing folder treatment.
pub fn normalise_dir_path(filepath: &str, options: &NormaliseOptions) -> String {
    normalise_path(
        filepath,
        &NormaliseOptions {
            is_folder: Some(true),
            ..options.clone()
        },
    )
}

/// Trimmed, lowercased file name.
pub fn normalise_file_name(filename: &str) -> String {
    filename.trim().to_lowercase()
}

/// Join path fragments and normalize the result. The folder convention is
/// inferred from the last fragment.
pub fn join_path(parts: &[&str]) -> String {
    let is_folder = parts
        .last()
        .map(|last| is_conventional_folder(last.trim()))
        .unwrap_or(false);
    let joined = parts.join("/");
    normalise_path(
        &joined,
        &NormaliseOptions {
            is_folder: Some(is_folder),
            ..NormaliseOptions::default()
        },
    )
}

/// Normalize a path that must exist on disk, classifying it as file or
/// folder from its metadata.
pub fn normalise_real_path(filepath: &str) -> Result<String, PathError> {
    let path = Path::new(filepath);
    if !path.exists() {
        return Err(PathError::NotFound {
            path: filepath.to_string(),
        });
    }

    let metadata = fs::metadata(path).map_err(|source| PathError::Inaccessible {
        path: filepath.to_string(),
        source,
    })?;

    if metadata.is_file() {
        Ok(normalise_path(
            filepath,
            &NormaliseOptions {
                is_folder: Some(false),
                ..NormaliseOptions::default()
            },
        ))
    } else if metadata.is_dir() {
        Ok(normalise_path(
            filepath,
            &NormaliseOptions {
                is_folder: Some(true),
                ..NormaliseOptions::default()
            },
        ))
    } else {
        Err(PathError::Unsupported {
            path: filepath.to_string(),
        })
    }
}

/// Common leading directory of two directory paths, `"./"` when they share
/// nothing. File components (no trailing slash) are dropped before
/// comparing.
pub fn common_dir(dir1: &str, dir2: &str) -> String {
    fn dir_parts(path: &str) -> Vec<&str> {
        let mut parts: Vec<&str> = path.split('/').collect();
        if !path.ends_with('/') {
            // File component.
            parts.pop();
        }
        while matches!(parts.last(), Some(p) if p.is_empty()) {
            parts.pop();
        }
        parts
    }

    let parts1 = dir_parts(dir1);
    let parts2 = dir_parts(dir2);
    if parts1.is_empty() || parts2.is_empty() {
        return "./".to_string();
    }

    let max = parts1.len().min(parts2.len());
    let mut shared = 0;
    while shared < max && parts1[shared] == parts2[shared] {
        shared += 1;
    }

    if shared == 0 {
        "./".to_string()
    } else {
        format!("{}/", parts1[..shared].join("/"))
    }
}

/// Longest common directory among a list of files and folders. Folders must
/// follow the trailing-slash convention.
pub fn calculate_common(files: &[&str]) -> String {
    let Some(first) = files.first() else {
        return "./".to_string();
    };

    let mut longest = normalise_path(first, &NormaliseOptions::default());
    if files.len() > 1 {
        for file in files {
            let filepath = normalise_path(file, &NormaliseOptions::default());
            longest = common_dir(&longest, &filepath);
        }
    }

    let longest = normalise_path(&longest, &NormaliseOptions::default());
    if is_conventional_folder(&longest) {
        return longest;
    }

    // A file: cut back to its directory.
    match longest.rfind('/') {
        Some(index) => longest[..=index].to_string(),
        None => "/".to_string(),
    }
}

fn is_absolute(path: &str) -> bool {
    path.starts_with('/') || path.as_bytes().get(1) == Some(&b':')
}

/// Collapse `.`, `..` and duplicate separators, preserving a leading `/`
/// and any unresolvable leading `..` segments.
fn collapse_segments(path: &str) -> String {
    let absolute = path.starts_with('/');
    let folder = path.ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(segments.last(), Some(&last) if last != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let mut collapsed = segments.join("/");
    if absolute {
        collapsed = format!("/{}", collapsed);
    } else if collapsed.is_empty() {
        collapsed = ".".to_string();
    }
    if folder && !collapsed.ends_with('/') {
        collapsed.push('/');
    }
    collapsed
}
