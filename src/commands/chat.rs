use std::io::{self, BufRead, Write};
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::flow::{FlowController, FlowSettings, Inbound};
use crate::notify::Notifier;
use crate::storage::config::{self, CONFIG_FILE};
use crate::storage::json_file::JsonFileStore;
use crate::storage::record::UserInfo;
use crate::transport::OutboxTransport;
use crate::ui;

/// Console stand-in for the chat platform: each stdin line is one event
/// from `user`, each reply goes to stdout.
pub fn run(base: &Path, user: UserInfo) -> Result<()> {
    let config = config::load(&base.join(CONFIG_FILE))?;

    let store = JsonFileStore::new(config.log_path(base), config.max_records, config.lock_ttl_secs);
    if config.owner_id.is_some() {
        store.ensure(true)?;
    }
    let notifier = Notifier::new(config.owner_id, config.owner_email.clone(), store);
    let transport = OutboxTransport::new(config.outbox_path(base));
    debug!(outbox = %transport.dir().display(), owner_configured = config.owner_id.is_some(), "chat session started");
    let mut flow = FlowController::new(
        notifier,
        transport,
        FlowSettings {
            owner_name: config.owner_name.clone(),
            quick_prefix: config.quick_prefix.clone(),
        },
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        let Some(event) = parse_line(&line) else {
            continue;
        };
        if let Some(reply) = flow.handle(&user, event) {
            writeln!(stdout, "{}\n", ui::render_reply(&reply))?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// `@payload` presses an inline button; blank lines are skipped.
fn parse_line(line: &str) -> Option<Inbound> {
    if line.trim().is_empty() {
        return None;
    }
    match line.trim().strip_prefix('@') {
        Some(payload) => {
            let event = Inbound::from_callback(payload);
            if event.is_none() {
                debug!(payload, "ignoring unknown button payload");
            }
            event
        }
        None => Some(Inbound::parse(line)),
    }
}
