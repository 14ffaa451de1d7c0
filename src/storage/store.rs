use crate::error::Result;
use crate::storage::record::{NewNotification, NotificationRecord, Status};

/// Persistent log of notifications sent (or attempted) to the owner.
pub trait NotificationStore {
    /// Append a record with status `pending` and return it with its id.
    fn append(&self, notification: NewNotification) -> Result<NotificationRecord>;

    /// All records, oldest first.
    fn list(&self) -> Result<Vec<NotificationRecord>>;

    /// Set the status of the first record with `id`. Returns false when no record matches.
    fn set_status(&self, id: u64, status: Status) -> Result<bool>;

    fn pending(&self) -> Result<Vec<NotificationRecord>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|n| n.status == Status::Pending)
            .collect())
    }

    fn mark_reviewed(&self, id: u64) -> Result<bool> {
        self.set_status(id, Status::Reviewed)
    }
}

impl<S: NotificationStore + ?Sized> NotificationStore for &S {
    fn append(&self, notification: NewNotification) -> Result<NotificationRecord> {
        (**self).append(notification)
    }

    fn list(&self) -> Result<Vec<NotificationRecord>> {
        (**self).list()
    }

    fn set_status(&self, id: u64, status: Status) -> Result<bool> {
        (**self).set_status(id, status)
    }
}
