//! Idempotent creation of generated files and links
//!
//! Safe to call on every session start: existing user content is never
//! clobbered, and repeat calls perform no filesystem writes.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Create `path` with the given contents iff it does not exist.
/// Returns whether the file was created.
pub fn ensure_file(path: &Path, contents_if_missing: &str) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, contents_if_missing)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    Ok(true)
}

/// Ensure `link` is a symlink pointing at `target`, replacing any existing
/// entry at `link`. A link already pointing at `target` is left untouched.
/// Returns whether the link was (re)created.
#[cfg(unix)]
pub fn ensure_symlink(link: &Path, target: &Path) -> Result<bool> {
    if let Ok(meta) = fs::symlink_metadata(link) {
        if meta.file_type().is_symlink() {
            if fs::read_link(link).map(|t| t == target).unwrap_or(false) {
                return Ok(false);
            }
            fs::remove_file(link)
                .with_context(|| format!("Failed to remove stale link: {}", link.display()))?;
        } else if meta.is_dir() {
            fs::remove_dir_all(link)
                .with_context(|| format!("Failed to remove directory: {}", link.display()))?;
        } else {
            fs::remove_file(link)
                .with_context(|| format!("Failed to remove file: {}", link.display()))?;
        }
    }
    if let Some(parent) = link.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::os::unix::fs::symlink(target, link).with_context(|| {
        format!(
            "Failed to link {} -> {}",
            link.display(),
            target.display()
        )
    })?;
    Ok(true)
}

#[cfg(not(unix))]
pub fn ensure_symlink(_link: &Path, _target: &Path) -> Result<bool> {
    anyhow::bail!("Symlinks are only supported on unix platforms")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_file_creates_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub/generated.conf");

        assert!(ensure_file(&path, "default=1\n").unwrap());
        fs::write(&path, "default=edited\n").unwrap();

        // Second call must not clobber the edit
        assert!(!ensure_file(&path, "default=1\n").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "default=edited\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_ensure_symlink_idempotent_and_retargets() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("bin-a/tool");
        let second = dir.path().join("bin-b/tool");
        fs::create_dir_all(first.parent().unwrap()).unwrap();
        fs::create_dir_all(second.parent().unwrap()).unwrap();
        fs::write(&first, "a").unwrap();
        fs::write(&second, "b").unwrap();

        let link = dir.path().join("link/tool");
        assert!(ensure_symlink(&link, &first).unwrap());
        assert!(!ensure_symlink(&link, &first).unwrap());
        assert_eq!(fs::read_link(&link).unwrap(), first);

        // Resolution path changed between calls: exactly one link remains,
        // pointing at the new target
        assert!(ensure_symlink(&link, &second).unwrap());
        assert_eq!(fs::read_link(&link).unwrap(), second);
    }

    #[cfg(unix)]
    #[test]
    fn test_ensure_symlink_replaces_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("real");
        let link = dir.path().join("tool");
        fs::write(&target, "x").unwrap();
        fs::write(&link, "occupied").unwrap();

        assert!(ensure_symlink(&link, &target).unwrap());
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    }
}
