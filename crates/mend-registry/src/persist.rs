//! Registry persistence
//!
//! Every mutation rewrites the whole document, so two uncoordinated writers
//! could silently drop each other's updates. Writes therefore go through a
//! sidecar lock file plus a temp-file/atomic-rename, which serializes
//! same-host writers and keeps readers from ever seeing a torn document.

use mend_core::{MendError, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const LOCK_SUFFIX: &str = "lock";
const LOCK_ATTEMPTS: u32 = 50;
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(50);
/// A lock older than this is presumed abandoned by a crashed process.
const LOCK_STALE_AFTER: Duration = Duration::from_secs(30);

/// Exclusive advisory lock on a registry file, released on drop.
pub(crate) struct FileLock {
    lock_path: PathBuf,
}

impl FileLock {
    /// Acquire the lock for `target`, waiting briefly for a competing
    /// writer and taking over locks that look abandoned.
    pub(crate) fn acquire(target: &Path) -> Result<Self> {
        let lock_path = lock_path_for(target);

        for _ in 0..LOCK_ATTEMPTS {
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&lock_path)
            {
                Ok(_) => {
                    return Ok(Self { lock_path });
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    if lock_is_stale(&lock_path) {
                        fs::remove_file(&lock_path).ok();
                        continue;
                    }
                    std::thread::sleep(LOCK_RETRY_DELAY);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(MendError::RegistryLocked(format!(
            "could not acquire {}",
            lock_path.display()
        )))
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        fs::remove_file(&self.lock_path).ok();
    }
}

fn lock_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    name.push('.');
    name.push_str(LOCK_SUFFIX);
    target.with_file_name(name)
}

fn lock_is_stale(lock_path: &Path) -> bool {
    let Ok(meta) = fs::metadata(lock_path) else {
        // Vanished between the failed create and this check
        return false;
    };
    let Ok(modified) = meta.modified() else {
        return false;
    };
    SystemTime::now()
        .duration_since(modified)
        .map(|age| age > LOCK_STALE_AFTER)
        .unwrap_or(false)
}

/// Serialize `value` as pretty JSON and write it to `path` atomically
/// (temp file in the same directory, then rename).
pub(crate) fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    tmp_name.push_str(".tmp");
    let tmp = path.with_file_name(tmp_name);

    fs::write(&tmp, json.as_bytes())?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mend_persist_test_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_lock_roundtrip() {
        let dir = temp_dir();
        let target = dir.join("asset_registry.json");

        let lock_file = dir.join("asset_registry.json.lock");
        {
            let _lock = FileLock::acquire(&target).unwrap();
            assert!(lock_file.exists());
        }
        assert!(!lock_file.exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_held_lock_blocks_then_times_out() {
        let dir = temp_dir();
        let target = dir.join("asset_registry.json");

        let _held = FileLock::acquire(&target).unwrap();
        // Second acquisition retries, then gives up (the lock is fresh, not stale)
        let second = FileLock::acquire(&target);
        assert!(matches!(second, Err(MendError::RegistryLocked(_))));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_stale_lock_taken_over() {
        let dir = temp_dir();
        let target = dir.join("asset_registry.json");
        let lock_file = dir.join("asset_registry.json.lock");

        fs::write(&lock_file, b"").unwrap();
        // Backdate the lock beyond the stale threshold
        let old = SystemTime::now() - Duration::from_secs(120);
        let times = fs::FileTimes::new().set_modified(old);
        let f = OpenOptions::new().write(true).open(&lock_file).unwrap();
        f.set_times(times).unwrap();

        let lock = FileLock::acquire(&target);
        assert!(lock.is_ok());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_atomic_write_leaves_no_temp() {
        let dir = temp_dir();
        let path = dir.join("doc.json");

        write_json_atomic(&path, &serde_json::json!({"ok": true})).unwrap();
        assert!(path.exists());
        assert!(!dir.join("doc.json.tmp").exists());

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"ok\""));

        fs::remove_dir_all(&dir).ok();
    }
}
