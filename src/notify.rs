use chrono::Local;
use tracing::{debug, error, info};

use crate::format;
use crate::storage::record::{NewNotification, NotificationKind, UserInfo};
use crate::storage::store::NotificationStore;
use crate::transport::{ParseMode, Transport};

/// Result of one dispatch. Each channel is attempted and reported on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub logged: bool,
    pub delivered: bool,
    /// Email delivery is not implemented; always false.
    pub email_sent: bool,
    pub record_id: Option<u64>,
    pub errors: Vec<String>,
}

/// What to send and how to label it.
#[derive(Debug, Clone, Copy)]
pub struct Dispatch<'a> {
    pub message: &'a str,
    pub user: &'a UserInfo,
    pub kind: NotificationKind,
    pub quick: bool,
}

impl<'a> Dispatch<'a> {
    pub fn question(message: &'a str, user: &'a UserInfo) -> Self {
        Dispatch {
            message,
            user,
            kind: NotificationKind::UserQuestion,
            quick: false,
        }
    }
}

/// Logs notifications and forwards them to the owner.
pub struct Notifier<S> {
    owner_id: Option<i64>,
    owner_email: Option<String>,
    store: S,
}

impl<S: NotificationStore> Notifier<S> {
    pub fn new(owner_id: Option<i64>, owner_email: Option<String>, store: S) -> Self {
        Notifier {
            owner_id,
            owner_email,
            store,
        }
    }

    pub fn owner_id(&self) -> Option<i64> {
        self.owner_id
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Append the notification to the log, then deliver it to the owner if
    /// both an owner id and a transport are available.
    pub fn send_to_owner(
        &self,
        dispatch: Dispatch<'_>,
        transport: Option<&dyn Transport>,
    ) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();

        match self.store.append(NewNotification {
            kind: dispatch.kind,
            user_info: dispatch.user.clone(),
            message: dispatch.message.to_string(),
        }) {
            Ok(record) => {
                outcome.logged = true;
                outcome.record_id = Some(record.id);
            }
            Err(e) => {
                error!(error = %e, "failed to log notification");
                outcome.errors.push(format!("Log error: {}", e));
            }
        }

        if let (Some(owner_id), Some(transport)) = (self.owner_id, transport) {
            let text = format::notification_message(
                dispatch.kind,
                dispatch.quick,
                dispatch.user,
                dispatch.message,
                Local::now(),
            );
            match transport.send_message(owner_id, &text, ParseMode::Html) {
                Ok(()) => {
                    outcome.delivered = true;
                    info!(
                        owner_id,
                        user_id = dispatch.user.id,
                        kind = dispatch.kind.as_str(),
                        quick = dispatch.quick,
                        "notification delivered to owner"
                    );
                }
                Err(e) => {
                    error!(owner_id, error = %e, "failed to deliver notification");
                    outcome.errors.push(format!("Delivery error: {}", e));
                }
            }
        }

        if self.owner_email.is_some() {
            debug!("owner email configured, email delivery not implemented");
        }

        outcome
    }
}
