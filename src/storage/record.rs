use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    UserQuestion,
    Feedback,
    Urgent,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::UserQuestion => "user_question",
            NotificationKind::Feedback => "feedback",
            NotificationKind::Urgent => "urgent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    Reviewed,
    Responded,
    Archived,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Reviewed => "reviewed",
            Status::Responded => "responded",
            Status::Archived => "archived",
        }
    }
}

/// Who sent the message, as reported by the chat transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserInfo {
    pub fn new(id: i64) -> Self {
        UserInfo {
            id,
            ..UserInfo::default()
        }
    }

    /// Best human-readable handle: `@username`, then first name, then the id.
    pub fn display_name(&self) -> String {
        if let Some(u) = &self.username {
            return format!("@{}", u);
        }
        if let Some(f) = &self.first_name {
            return f.clone();
        }
        self.id.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: u64,
    #[serde(deserialize_with = "local_time::deserialize")]
    pub timestamp: DateTime<Local>,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub user_info: UserInfo,
    pub message: String,
    pub status: Status,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "local_time::deserialize_opt"
    )]
    pub reviewed_at: Option<DateTime<Local>>,
}

/// A record before the store has assigned it an id.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub user_info: UserInfo,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    pub telegram_enabled: bool,
    pub email_enabled: bool,
    #[serde(deserialize_with = "local_time::deserialize")]
    pub created_at: DateTime<Local>,
}

/// On-disk layout of the notification log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogDocument {
    #[serde(default)]
    pub notifications: Vec<NotificationRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<LogSettings>,
    /// Absent in logs written before the counter existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_id: Option<u64>,
}

impl LogDocument {
    pub fn new(settings: LogSettings) -> Self {
        LogDocument {
            notifications: Vec::new(),
            settings: Some(settings),
            next_id: Some(1),
        }
    }

    /// Take the next id, seeding the counter from existing records if needed.
    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_id.unwrap_or_else(|| {
            self.notifications
                .iter()
                .map(|n| n.id)
                .max()
                .map_or(1, |max| max + 1)
        });
        self.next_id = Some(id + 1);
        id
    }

    /// Append a record and drop the oldest ones beyond `max_records`.
    pub fn push_trimmed(&mut self, record: NotificationRecord, max_records: usize) {
        self.notifications.push(record);
        if self.notifications.len() > max_records {
            let excess = self.notifications.len() - max_records;
            self.notifications.drain(..excess);
        }
    }
}

/// Timestamps are written as RFC 3339 with an offset. Older logs carry naive
/// local times (`2025-01-15T14:30:00.123456`), read back in the local zone.
mod local_time {
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Option<DateTime<Local>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Local));
        }
        let naive: NaiveDateTime = raw.parse().ok()?;
        // A wall time skipped by a DST jump has no local mapping.
        Some(
            Local
                .from_local_datetime(&naive)
                .earliest()
                .unwrap_or_else(|| Local.from_utc_datetime(&naive)),
        )
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Local>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw:?}")))
    }

    pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Local>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| {
                parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw:?}")))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, message: &str) -> NotificationRecord {
        NotificationRecord {
            id,
            timestamp: Local::now(),
            kind: NotificationKind::UserQuestion,
            user_info: UserInfo::new(7),
            message: message.to_string(),
            status: Status::Pending,
            reviewed_at: None,
        }
    }

    #[test]
    fn record_uses_wire_field_names() {
        let json = serde_json::to_value(record(3, "hi")).unwrap();
        assert_eq!(json["type"], "user_question");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["user_info"]["id"], 7);
        assert!(json["user_info"]["username"].is_null());
        assert!(json.get("reviewed_at").is_none());
    }

    #[test]
    fn legacy_document_without_counter_parses() {
        let json = r#"{
            "notifications": [{
                "id": 4,
                "timestamp": "2025-01-15T14:30:00.123456",
                "type": "feedback",
                "user_info": {"id": 1, "username": "ann", "first_name": null, "last_name": null},
                "message": "nice bot",
                "status": "reviewed",
                "reviewed_at": "2025-01-16T09:00:00"
            }],
            "settings": {"telegram_enabled": true, "email_enabled": false, "created_at": "2025-01-01T00:00:00.000001"}
        }"#;
        let mut doc: LogDocument = serde_json::from_str(json).unwrap();
        let first = &doc.notifications[0];
        assert_eq!(first.kind, NotificationKind::Feedback);
        assert_eq!(
            first.timestamp.naive_local().to_string(),
            "2025-01-15 14:30:00.123456"
        );
        assert!(first.reviewed_at.is_some());
        assert_eq!(doc.allocate_id(), 5);
        assert_eq!(doc.allocate_id(), 6);
    }

    #[test]
    fn timestamps_with_offset_still_parse() {
        let json = r#"{
            "id": 1,
            "timestamp": "2025-01-15T14:30:00+00:00",
            "type": "urgent",
            "user_info": {"id": 1},
            "message": "m",
            "status": "pending",
            "reviewed_at": null
        }"#;
        let rec: NotificationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.timestamp.timestamp(), 1_736_951_400);
        assert!(rec.reviewed_at.is_none());
    }

    #[test]
    fn garbage_timestamp_is_rejected() {
        let json = r#"{"id": 1, "timestamp": "yesterday", "type": "urgent",
            "user_info": {"id": 1}, "message": "m", "status": "pending"}"#;
        assert!(serde_json::from_str::<NotificationRecord>(json).is_err());
    }

    #[test]
    fn written_timestamps_read_back() {
        let rec = record(1, "x");
        let back: NotificationRecord =
            serde_json::from_str(&serde_json::to_string(&rec).unwrap()).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn allocate_id_on_empty_legacy_doc_starts_at_one() {
        let mut doc: LogDocument = serde_json::from_str(r#"{"notifications": []}"#).unwrap();
        assert_eq!(doc.allocate_id(), 1);
    }

    #[test]
    fn push_trimmed_drops_oldest_first() {
        let mut doc: LogDocument = serde_json::from_str("{}").unwrap();
        for i in 1..=5 {
            doc.push_trimmed(record(i, &format!("m{}", i)), 3);
        }
        let ids: Vec<u64> = doc.notifications.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![3, 4, 5]);
    }

    #[test]
    fn display_name_prefers_username() {
        let mut user = UserInfo::new(9);
        assert_eq!(user.display_name(), "9");
        user.first_name = Some("Ann".into());
        assert_eq!(user.display_name(), "Ann");
        user.username = Some("ann".into());
        assert_eq!(user.display_name(), "@ann");
    }
}
