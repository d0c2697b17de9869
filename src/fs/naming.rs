//! Collision-safe filename generation.
//!
//! Names are normalized once (NFKD, ASCII only, spaces to hyphens) and then
//! probed against the target directory as `name`, `stem-2.ext`, `stem-3.ext`, ...
//! until a free one is found.

use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;

use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};

/// Upper bound on candidates tried before giving up.
pub const MAX_ATTEMPTS: u32 = 10_000;

/// Name used when normalization leaves nothing behind.
pub const FALLBACK_NAME: &str = "file";

/// Reduce a filename to its ASCII-compatible form.
///
/// Characters are decomposed (NFKD), anything without an ASCII residue is
/// dropped, and every space becomes a hyphen. Consecutive spaces are not
/// collapsed.
pub fn normalize_filename(name: &str) -> String {
    let normalized: String = name
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == ' ' { '-' } else { c })
        .collect();

    if normalized.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        normalized
    }
}

/// Split a name into `(stem, extension)` on its last dot.
///
/// The extension keeps its dot. Leading dots do not start an extension, so
/// `.bashrc` has none.
pub fn split_extension(name: &str) -> (&str, &str) {
    let base_start = name.rfind('/').map_or(0, |i| i + 1);
    let base = &name[base_start..];
    let leading_dots = base.len() - base.trim_start_matches('.').len();

    match base[leading_dots..].rfind('.') {
        Some(pos) => name.split_at(base_start + leading_dots + pos),
        None => (name, ""),
    }
}

/// Build the candidate for a given attempt: the name itself for attempt 1,
/// `stem-N.ext` afterwards.
pub fn candidate_name(name: &str, attempt: u32) -> String {
    if attempt <= 1 {
        return name.to_string();
    }
    let (stem, ext) = split_extension(name);
    format!("{}-{}{}", stem, attempt, ext)
}

/// Find a name in `dir` that no file currently uses.
///
/// Returns the bare name, without the directory. This only probes the
/// filesystem: another writer can take the name before the caller uses it.
/// Use [`create_unique_file`] when the file is about to be written.
pub fn unique_filename(filename: &str, dir: &Path) -> Result<String> {
    unique_filename_from(filename, dir, 1)
}

/// Like [`unique_filename`], starting the suffix sequence at `attempt`.
pub fn unique_filename_from(filename: &str, dir: &Path, attempt: u32) -> Result<String> {
    let name = normalize_filename(filename);
    let first = attempt.max(1);
    let mut tried = 0;

    // Near u32::MAX the range is shorter than MAX_ATTEMPTS.
    for attempt in first..=first.saturating_add(MAX_ATTEMPTS - 1) {
        let candidate = candidate_name(&name, attempt);
        if !exists(&dir.join(&candidate))? {
            return Ok(candidate);
        }
        tried += 1;
        tracing::debug!("Name taken: {}", candidate);
    }

    Err(Error::NamesExhausted {
        name,
        attempts: tried,
    })
}

/// Claim a fresh name in `dir` by creating the file exclusively.
///
/// Each candidate is opened with `create_new`, so two concurrent callers can
/// never end up with the same file.
pub fn create_unique_file(filename: &str, dir: &Path) -> Result<(String, File)> {
    let name = normalize_filename(filename);

    for attempt in 1..=MAX_ATTEMPTS {
        let candidate = candidate_name(&name, attempt);
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(dir.join(&candidate))
        {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!("Name taken: {}", candidate);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(Error::NamesExhausted {
        name,
        attempts: MAX_ATTEMPTS,
    })
}

/// Reduce a client-supplied upload name to its last path component.
///
/// Rejects names that are empty, `.`/`..`, or contain null bytes.
pub fn sanitize_upload_name(name: &str) -> Result<String> {
    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed in filename: '{}'",
            name
        )));
    }

    let basename = name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or("")
        .trim();

    if basename.is_empty() || basename == "." || basename == ".." {
        return Err(Error::InvalidFilename(format!(
            "Filename cannot be empty or a directory reference: '{}'",
            name
        )));
    }

    Ok(basename.to_string())
}

fn exists(path: &Path) -> Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
