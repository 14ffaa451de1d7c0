use std::path::Path;
use crate::error::{RelayError, Result};
use crate::format;
use crate::storage::config::{self, CONFIG_FILE};
use crate::storage::json_file::JsonFileStore;
use crate::storage::record::{NotificationRecord, Status};
use crate::storage::store::NotificationStore;
use crate::ui;

fn open_store(base: &Path) -> Result<JsonFileStore> {
    let config = config::load(&base.join(CONFIG_FILE))?;
    Ok(JsonFileStore::new(config.log_path(base), config.max_records, config.lock_ttl_secs))
}

fn print_table(records: &[NotificationRecord], empty: &str) {
    if records.is_empty() {
        println!("{}", ui::info_line("Notifications:", empty));
        return;
    }
    println!("{}", ui::table_header());
    for record in records {
        println!("{}", format::record_row(record));
    }
}

pub fn pending(base: &Path) -> Result<()> {
    let records = open_store(base)?.pending()?;
    print_table(&records, "No pending notifications.");
    Ok(())
}

pub fn list(base: &Path) -> Result<()> {
    let records = open_store(base)?.list()?;
    print_table(&records, "The log is empty.");
    Ok(())
}

pub fn review(base: &Path, id: u64) -> Result<()> {
    if !open_store(base)?.mark_reviewed(id)? {
        return Err(RelayError::NotFound(id));
    }
    println!("{}", ui::success_line("Reviewed:", &format!("#{}", id)));
    Ok(())
}

pub fn set_status(base: &Path, id: u64, status: Status) -> Result<()> {
    if !open_store(base)?.set_status(id, status)? {
        return Err(RelayError::NotFound(id));
    }
    println!(
        "{}",
        ui::success_line("Updated:", &format!("#{} is now {}", id, status.as_str()))
    );
    Ok(())
}
