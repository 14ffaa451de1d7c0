use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use tracing::{debug, info};

use crate::error::{RelayError, Result};
use crate::storage::lockfile;
use crate::storage::record::{
    LogDocument, LogSettings, NewNotification, NotificationRecord, Status,
};
use crate::storage::store::NotificationStore;

/// Notification log kept in a single pretty-printed JSON file.
///
/// Every mutation reads the whole document, changes it, and rewrites the
/// file via tmp+rename. The cycle runs under an in-process mutex and the
/// advisory `<file>.lock`, so concurrent writers never lose records.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    max_records: usize,
    lock_ttl_secs: u64,
    guard: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, max_records: usize, lock_ttl_secs: u64) -> Self {
        JsonFileStore {
            path: path.into(),
            max_records,
            lock_ttl_secs,
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the log file with an empty collection and settings block if it
    /// does not exist. Returns true if the file was created.
    pub fn ensure(&self, telegram_enabled: bool) -> Result<bool> {
        self.with_lock(|| {
            if self.path.exists() {
                return Ok(false);
            }
            self.write_doc(&fresh_doc(telegram_enabled))?;
            info!(path = %self.path.display(), "created notification log");
            Ok(true)
        })
    }

    fn with_lock<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let _local = self
            .guard
            .lock()
            .map_err(|_| RelayError::Other("notification log mutex poisoned".to_string()))?;
        let _file = lockfile::acquire(&self.path, self.lock_ttl_secs)?;
        f()
    }

    fn read_doc(&self) -> Result<LogDocument> {
        if !self.path.exists() {
            // Only a dispatch to a configured owner writes a missing log.
            return Ok(fresh_doc(true));
        }
        let content = fs::read_to_string(&self.path)?;
        let doc: LogDocument = serde_json::from_str(&content)?;
        Ok(doc)
    }

    fn write_doc(&self, doc: &LogDocument) -> Result<()> {
        let content = serde_json::to_string_pretty(doc)?;
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let tmp = self.path.with_file_name(format!(".tmp.{}", file_name));
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn fresh_doc(telegram_enabled: bool) -> LogDocument {
    LogDocument::new(LogSettings {
        telegram_enabled,
        email_enabled: false,
        created_at: Local::now(),
    })
}

impl NotificationStore for JsonFileStore {
    fn append(&self, notification: NewNotification) -> Result<NotificationRecord> {
        self.with_lock(|| {
            let mut doc = self.read_doc()?;
            let record = NotificationRecord {
                id: doc.allocate_id(),
                timestamp: Local::now(),
                kind: notification.kind,
                user_info: notification.user_info,
                message: notification.message,
                status: Status::Pending,
                reviewed_at: None,
            };
            doc.push_trimmed(record.clone(), self.max_records);
            self.write_doc(&doc)?;
            debug!(id = record.id, kept = doc.notifications.len(), "appended notification");
            Ok(record)
        })
    }

    fn list(&self) -> Result<Vec<NotificationRecord>> {
        self.with_lock(|| Ok(self.read_doc()?.notifications))
    }

    fn set_status(&self, id: u64, status: Status) -> Result<bool> {
        self.with_lock(|| {
            let mut doc = self.read_doc()?;
            let Some(record) = doc.notifications.iter_mut().find(|n| n.id == id) else {
                return Ok(false);
            };
            record.status = status;
            if status == Status::Reviewed {
                record.reviewed_at = Some(Local::now());
            }
            self.write_doc(&doc)?;
            info!(id, status = status.as_str(), "updated notification status");
            Ok(true)
        })
    }
}
