use std::fs;
use std::path::Path;
use crate::error::Result;
use crate::storage::config::{self, CONFIG_FILE};
use crate::transport::outbox;
use crate::ui;

pub fn run(base: &Path) -> Result<()> {
    let config = config::load(&base.join(CONFIG_FILE))?;
    let paths = outbox::list_messages(&config.outbox_path(base))?;

    if paths.is_empty() {
        println!("{}", ui::info_line("Outbox:", "No delivered messages."));
        return Ok(());
    }

    for path in &paths {
        let Ok(content) = fs::read_to_string(path) else {
            continue;
        };
        if let Some((to, mode, body)) = outbox::parse_outbox_file(&content) {
            println!("{}", ui::info_line("To:", &format!("{} ({})", to, mode)));
            println!("{}\n", body);
        }
    }
    Ok(())
}
