use clap::{Parser, Subcommand};
use crate::storage::record::Status;

#[derive(Parser)]
#[command(name = "ask-owner", about = "Relay user questions from a chat bot to its owner")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write a default ask-owner.toml and create the notification log
    Init,

    /// Talk to the bot on stdin, one event per line
    ///
    /// `/ask` starts a question, `/cancel` aborts, `@ask_confirm` and
    /// `@ask_cancel` press the inline buttons. Other lines are plain text.
    Chat {
        /// Sender's numeric user id
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },

    /// List notifications still waiting for review
    Pending,

    /// List every notification in the log
    List,

    /// Mark a notification as reviewed
    Review {
        /// Notification id
        id: u64,
    },

    /// Set the status of a notification
    SetStatus {
        /// Notification id
        id: u64,
        #[arg(value_enum)]
        status: Status,
    },

    /// Show messages delivered to the owner's outbox
    Outbox,
}
