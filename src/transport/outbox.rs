use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{RelayError, Result};
use crate::transport::{ParseMode, Transport};

/// Delivers messages by dropping them into a directory, one file each.
///
/// File name: `{timestamp_ns}.msg`. Content: `to:` and `parse_mode:` header
/// lines, a blank line, then the body.
#[derive(Debug, Clone)]
pub struct OutboxTransport {
    dir: PathBuf,
}

impl OutboxTransport {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        OutboxTransport { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Transport for OutboxTransport {
    fn send_message(&self, chat_id: i64, text: &str, mode: ParseMode) -> Result<()> {
        let timestamp_ns = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_err(|e| RelayError::Transport(e.to_string()))?
            .as_nanos();

        fs::create_dir_all(&self.dir)
            .map_err(|e| RelayError::Transport(format!("outbox unavailable: {}", e)))?;

        let filename = format!("{}.msg", timestamp_ns);
        let target = self.dir.join(&filename);
        let tmp = self.dir.join(format!(".tmp.{}", filename));

        let content = format!("to: {}\nparse_mode: {}\n\n{}\n", chat_id, mode.as_str(), text);
        fs::write(&tmp, &content)
            .and_then(|_| fs::rename(&tmp, &target))
            .map_err(|e| RelayError::Transport(e.to_string()))?;
        Ok(())
    }
}

/// Parse an outbox file into (chat_id, parse_mode, body).
pub fn parse_outbox_file(content: &str) -> Option<(i64, &str, &str)> {
    let (header, body) = content.split_once("\n\n")?;
    let mut lines = header.lines();
    let chat_id = lines.next()?.strip_prefix("to: ")?.parse().ok()?;
    let mode = lines.next()?.strip_prefix("parse_mode: ")?;
    Some((chat_id, mode, body.trim_end()))
}

/// List delivered message files sorted by name (chronological order).
pub fn list_messages(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    if !dir.exists() {
        return Ok(entries);
    }
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.ends_with(".msg") && !name.starts_with(".tmp.") {
            entries.push(entry.path());
        }
    }
    entries.sort();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn send_writes_one_file_per_message() {
        let tmp = TempDir::new().unwrap();
        let outbox = OutboxTransport::new(tmp.path().join("outbox"));

        outbox.send_message(42, "<b>hi</b>", ParseMode::Html).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        outbox.send_message(42, "second", ParseMode::Plain).unwrap();

        let files = list_messages(outbox.dir()).unwrap();
        assert_eq!(files.len(), 2);

        let content = fs::read_to_string(&files[0]).unwrap();
        let (to, mode, body) = parse_outbox_file(&content).unwrap();
        assert_eq!(to, 42);
        assert_eq!(mode, "HTML");
        assert_eq!(body, "<b>hi</b>");
    }

    #[test]
    fn multiline_body_is_preserved() {
        let content = "to: 7\nparse_mode: HTML\n\nline one\n\nline two\n";
        let (_, _, body) = parse_outbox_file(content).unwrap();
        assert_eq!(body, "line one\n\nline two");
    }

    #[test]
    fn unwritable_outbox_is_transport_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("outbox");
        fs::write(&blocker, "not a dir").unwrap();

        let outbox = OutboxTransport::new(&blocker);
        let result = outbox.send_message(1, "x", ParseMode::Plain);
        assert!(matches!(result, Err(RelayError::Transport(_))));
    }

    #[test]
    fn list_messages_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(list_messages(&tmp.path().join("nope")).unwrap().is_empty());
    }
}
