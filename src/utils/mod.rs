//! Shared utilities: deep merge, temp names, CLI option shaping, path
//! conventions.

pub mod merge;
pub mod naming;
pub mod options;
pub mod paths;

pub use merge::{merge_deep, merge_deep_all};
pub use naming::{generate_temp_name, TempNameOptions};
pub use options::{
    change_options_to_lowercase, import_lowercase_options, session_key_to_args, session_to_args,
    LowercaseOptions,
};
pub use paths::{
    calculate_common, common_dir, is_conventional_folder, join_path, normalise_dir_path,
    normalise_file_name, normalise_path, normalise_real_path, NormaliseOptions, PathError,
};
