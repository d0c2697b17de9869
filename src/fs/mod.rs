//! Filesystem module.
//!
//! Provides:
//! - Collision-safe filename generation
//! - Directory management and upload storage

pub mod naming;
pub mod paths;

pub use naming::{
    candidate_name, create_unique_file, normalize_filename, sanitize_upload_name,
    split_extension, unique_filename, unique_filename_from, MAX_ATTEMPTS,
};
pub use paths::{ensure_dir, save_upload};
