use std::path::Path;
use crate::error::Result;
use crate::storage::config::{self, CONFIG_FILE};
use crate::storage::json_file::JsonFileStore;
use crate::ui;

pub fn run(base: &Path) -> Result<()> {
    let config_path = base.join(CONFIG_FILE);
    if config_path.exists() {
        println!("{}", ui::info_line("Config:", &format!("{} already exists", CONFIG_FILE)));
    } else {
        config::write_default_config(&config_path)?;
        println!("{}", ui::success_line("Created:", CONFIG_FILE));
    }

    let config = config::load(&config_path)?;
    let store = JsonFileStore::new(config.log_path(base), config.max_records, config.lock_ttl_secs);
    if store.ensure(config.owner_id.is_some())? {
        println!("{}", ui::success_line("Created:", &store.path().display().to_string()));
    }

    if config.owner_id.is_none() {
        println!(
            "{}",
            ui::info_line("Owner:", "not configured, set OWNER_TELEGRAM_ID or owner_id")
        );
    }
    Ok(())
}
