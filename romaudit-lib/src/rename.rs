use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::AuditError;

/// Serializes the fallback check-then-rename path between workers.
static RENAME_LOCK: Mutex<()> = Mutex::new(());

/// Rename `path` to `new_name` within its own directory.
///
/// The new name must be a bare file name. An existing target is never
/// overwritten, even when several workers race for the same name. Returns
/// the new path on success.
pub fn rename_in_place(path: &Path, new_name: &str) -> Result<PathBuf, AuditError> {
    if new_name.is_empty()
        || new_name == "."
        || new_name == ".."
        || new_name.contains(['/', '\\'])
    {
        return Err(AuditError::rename(path, new_name, "not a plain file name"));
    }

    let dir = path.parent().unwrap_or(Path::new("."));
    let target = dir.join(new_name);

    if target == path {
        return Ok(target);
    }

    // Linking claims the target atomically; the source link is dropped after.
    match fs::hard_link(path, &target) {
        Ok(()) => {
            if let Err(e) = fs::remove_file(path) {
                let _ = fs::remove_file(&target);
                return Err(AuditError::rename(path, new_name, e));
            }
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(AuditError::rename(path, new_name, "target already exists"));
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(AuditError::rename(path, new_name, e));
        }
        Err(e) => {
            // No hard links on this filesystem (FAT, some network shares)
            log::debug!("Hard link failed ({e}), falling back to rename");
            checked_rename(path, &target, new_name)?;
        }
    }

    log::debug!("Renamed {} to {}", path.display(), target.display());
    Ok(target)
}

fn checked_rename(path: &Path, target: &Path, new_name: &str) -> Result<(), AuditError> {
    let _guard = RENAME_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    // symlink_metadata so a dangling link still counts as taken
    if fs::symlink_metadata(target).is_ok() {
        return Err(AuditError::rename(path, new_name, "target already exists"));
    }
    fs::rename(path, target).map_err(|e| AuditError::rename(path, new_name, e))
}

#[cfg(test)]
#[path = "tests/rename_tests.rs"]
mod tests;
