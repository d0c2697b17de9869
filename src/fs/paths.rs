//! Directory management and local upload storage.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fs::naming::create_unique_file;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Persist uploaded bytes in `dir` under a collision-free name.
///
/// Returns the full path of the written file.
pub fn save_upload(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = write_unique(dir, filename, |file| {
        file.write_all(bytes)?;
        file.sync_all()
    })?;
    tracing::debug!("Saved upload to {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

/// Claim a unique name in `dir` and fill it with `write`.
///
/// A failed write removes the claimed file so the name stays free.
fn write_unique<F>(dir: &Path, filename: &str, write: F) -> Result<PathBuf>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    ensure_dir(dir)?;

    let (name, mut file) = create_unique_file(filename, dir)?;
    let path = dir.join(name);

    if let Err(e) = write(&mut file) {
        drop(file);
        if let Err(cleanup) = std::fs::remove_file(&path) {
            tracing::warn!("Failed to remove partial upload {}: {}", path.display(), cleanup);
        }
        return Err(e.into());
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_dir_creates_nested() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        // Second call is a no-op
        ensure_dir(&nested).unwrap();
    }

    #[test]
    fn test_save_upload_never_overwrites() {
        let tmp = TempDir::new().unwrap();
        let uploads = tmp.path().join("uploads");

        let first = save_upload(&uploads, "vendas 2024.csv", b"a,b\n1,2\n").unwrap();
        let second = save_upload(&uploads, "vendas 2024.csv", b"a,b\n3,4\n").unwrap();

        assert_eq!(first, uploads.join("vendas-2024.csv"));
        assert_eq!(second, uploads.join("vendas-2024-2.csv"));
        assert_eq!(std::fs::read(&first).unwrap(), b"a,b\n1,2\n");
        assert_eq!(std::fs::read(&second).unwrap(), b"a,b\n3,4\n");
    }

    #[test]
    fn test_failed_write_releases_name() {
        let tmp = TempDir::new().unwrap();

        let err = write_unique(tmp.path(), "iris.csv", |file| {
            file.write_all(b"partial")?;
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        })
        .unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
        assert!(!tmp.path().join("iris.csv").exists());

        let path = save_upload(tmp.path(), "iris.csv", b"a\n").unwrap();
        assert_eq!(path, tmp.path().join("iris.csv"));
    }
}
