use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{RelayError, Result};

/// How long `acquire` keeps retrying before giving up.
const MAX_WAIT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize, Deserialize)]
pub struct LockEntry {
    pub pid: u32,
    pub acquired_at: u64, // unix epoch seconds
    pub ttl_secs: u64,
}

impl LockEntry {
    pub fn is_expired(&self) -> bool {
        now_secs() > self.acquired_at.saturating_add(self.ttl_secs)
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Lock file guarding `target`: `<target>.lock` next to it.
pub fn lock_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".lock");
    target.with_file_name(name)
}

/// Held advisory lock. Removing the file on drop releases it.
#[derive(Debug)]
pub struct LockGuard {
    path: PathBuf,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        // Ignore ENOENT race with a stale-lock breaker
        let _ = fs::remove_file(&self.path);
    }
}

/// Acquire the lock for `target`, breaking it if the holder's TTL ran out.
pub fn acquire(target: &Path, ttl_secs: u64) -> Result<LockGuard> {
    let path = lock_path(target);
    let started = Instant::now();
    let mut rng = rand::thread_rng();
    let mut backoff_ms = 5u64;

    loop {
        match try_create(&path, ttl_secs) {
            Ok(()) => return Ok(LockGuard { path }),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                if break_if_stale(&path)? {
                    continue;
                }
            }
            Err(e) => return Err(e.into()),
        }

        if started.elapsed() >= MAX_WAIT {
            warn!(path = %path.display(), "gave up waiting for log lock");
            return Err(RelayError::LockTimeout { path });
        }
        let jitter = rng.gen_range(0..=backoff_ms);
        std::thread::sleep(Duration::from_millis(backoff_ms + jitter));
        backoff_ms = (backoff_ms * 2).min(100);
    }
}

fn try_create(path: &Path, ttl_secs: u64) -> std::io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    let entry = LockEntry {
        pid: std::process::id(),
        acquired_at: now_secs(),
        ttl_secs,
    };
    let content = serde_json::to_string(&entry).map_err(std::io::Error::other)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Remove an expired or unreadable lock. Returns true if it was removed.
fn break_if_stale(path: &Path) -> Result<bool> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        // Holder released it between our create and read
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(e.into()),
    };
    let stale = match serde_json::from_str::<LockEntry>(&content) {
        Ok(entry) => entry.is_expired(),
        // Holder may still be writing its entry; only break once it is old.
        Err(_) => is_old(path),
    };
    if !stale {
        return Ok(false);
    }
    debug!(path = %path.display(), "breaking stale log lock");
    remove_if_unchanged(path, &content)
}

/// Remove the lock only if it still holds `expected`.
///
/// The file is first renamed to a private name, so a lock created by another
/// process after we read `expected` is never deleted: it is moved back instead.
fn remove_if_unchanged(path: &Path, expected: &str) -> Result<bool> {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(
        ".stale.{}.{}",
        std::process::id(),
        rand::thread_rng().gen::<u32>()
    ));
    let taken = path.with_file_name(name);

    match fs::rename(path, &taken) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(e.into()),
    }

    let moved = fs::read_to_string(&taken).unwrap_or_default();
    if moved != expected {
        // Fails if yet another lock appeared meanwhile; that one wins.
        let _ = fs::hard_link(&taken, path);
        let _ = fs::remove_file(&taken);
        return Ok(false);
    }
    let _ = fs::remove_file(&taken);
    Ok(true)
}

fn is_old(path: &Path) -> bool {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.elapsed().ok())
        .is_some_and(|age| age > MAX_WAIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lock_path_appends_suffix() {
        let p = lock_path(Path::new("/tmp/notifications_log.json"));
        assert_eq!(p, PathBuf::from("/tmp/notifications_log.json.lock"));
    }

    #[test]
    fn acquire_creates_and_drop_releases() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("log.json");
        {
            let _guard = acquire(&target, 30).unwrap();
            assert!(lock_path(&target).exists());
        }
        assert!(!lock_path(&target).exists());
    }

    #[test]
    fn expired_lock_is_broken() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("log.json");
        let stale = LockEntry {
            pid: 1,
            acquired_at: 0,
            ttl_secs: 1,
        };
        fs::write(lock_path(&target), serde_json::to_string(&stale).unwrap()).unwrap();

        let _guard = acquire(&target, 30).unwrap();
        let content = fs::read_to_string(lock_path(&target)).unwrap();
        let entry: LockEntry = serde_json::from_str(&content).unwrap();
        assert_eq!(entry.pid, std::process::id());
    }

    #[test]
    fn live_lock_blocks_until_released() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("log.json");
        let guard = acquire(&target, 30).unwrap();

        let t = target.clone();
        let waiter = std::thread::spawn(move || acquire(&t, 30).map(|_| ()));
        std::thread::sleep(Duration::from_millis(50));
        drop(guard);

        assert!(waiter.join().unwrap().is_ok());
    }

    #[test]
    fn huge_ttl_never_expires() {
        let entry = LockEntry {
            pid: 1,
            acquired_at: now_secs(),
            ttl_secs: u64::MAX,
        };
        assert!(!entry.is_expired());
    }

    #[test]
    fn replaced_lock_is_not_removed() {
        let tmp = TempDir::new().unwrap();
        let path = lock_path(&tmp.path().join("log.json"));
        let stale = serde_json::to_string(&LockEntry {
            pid: 1,
            acquired_at: 0,
            ttl_secs: 1,
        })
        .unwrap();
        let fresh = serde_json::to_string(&LockEntry {
            pid: 2,
            acquired_at: now_secs(),
            ttl_secs: 30,
        })
        .unwrap();
        // Another process broke the stale lock and took a new one after we read it.
        fs::write(&path, &fresh).unwrap();

        assert!(!remove_if_unchanged(&path, &stale).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), fresh);
        let leftovers = fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn unchanged_stale_lock_is_removed() {
        let tmp = TempDir::new().unwrap();
        let path = lock_path(&tmp.path().join("log.json"));
        fs::write(&path, "{}").unwrap();

        assert!(remove_if_unchanged(&path, "{}").unwrap());
        assert!(!path.exists());
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}
