use chrono::{DateTime, Local};
use crate::storage::record::{NotificationKind, NotificationRecord, UserInfo};

pub const NOT_SPECIFIED: &str = "not specified";

/// Bold header line for each notification kind.
pub fn header(kind: NotificationKind, quick: bool) -> String {
    let base = match kind {
        NotificationKind::UserQuestion => "❓ QUESTION FROM USER",
        NotificationKind::Feedback => "📝 FEEDBACK",
        NotificationKind::Urgent => "🚨 URGENT NOTIFICATION",
    };
    if quick {
        format!("{} (quick send)", base)
    } else {
        base.to_string()
    }
}

/// Render the HTML message delivered to the owner.
pub fn notification_message(
    kind: NotificationKind,
    quick: bool,
    user: &UserInfo,
    body: &str,
    at: DateTime<Local>,
) -> String {
    let or_missing = |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_SPECIFIED.to_string());
    format!(
        "<b>{header}</b>\n\n\
         👤 <b>User:</b>\n\
         ID: {id}\n\
         Username: @{username}\n\
         First name: {first}\n\
         Last name: {last}\n\n\
         💬 <b>Message:</b>\n\
         {body}\n\n\
         ⏰ <b>Time:</b> {time}",
        header = header(kind, quick),
        id = user.id,
        username = or_missing(&user.username),
        first = or_missing(&user.first_name),
        last = or_missing(&user.last_name),
        body = body,
        time = at.format("%Y-%m-%d %H:%M:%S"),
    )
}

/// Cut `text` to at most `max` characters, appending `...` when cut.
pub fn truncate_for_display(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// One table row for `pending` / `list`: id, status, sender, time, preview.
pub fn record_row(record: &NotificationRecord) -> String {
    let preview = truncate_for_display(&record.message.replace('\n', " "), 50);
    format!(
        "{:<6} {:<10} {:<16} {:<17} {}",
        record.id,
        record.status.as_str(),
        record.user_info.display_name(),
        record.timestamp.format("%Y-%m-%d %H:%M"),
        preview
    )
}
