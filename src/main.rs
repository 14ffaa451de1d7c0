mod cli;
mod commands;
mod error;
mod flow;
mod format;
mod notify;
mod storage;
mod transport;
mod ui;

use clap::Parser;
use cli::{Cli, Command};
use std::process;
use storage::record::UserInfo;

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let base = std::env::current_dir().unwrap_or_else(|e| {
        eprintln!("Cannot determine current directory: {}", e);
        process::exit(1);
    });

    let result = match cli.command {
        Command::Init => commands::init::run(&base),
        Command::Chat {
            user_id,
            username,
            first_name,
            last_name,
        } => {
            let user = UserInfo {
                username,
                first_name,
                last_name,
                ..UserInfo::new(user_id)
            };
            commands::chat::run(&base, user)
        }
        Command::Pending => commands::notifications::pending(&base),
        Command::List => commands::notifications::list(&base),
        Command::Review { id } => commands::notifications::review(&base, id),
        Command::SetStatus { id, status } => commands::notifications::set_status(&base, id, status),
        Command::Outbox => commands::outbox::run(&base),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` overrides the default filter.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ask_owner=info,warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
