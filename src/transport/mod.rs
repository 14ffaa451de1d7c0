pub mod outbox;

use crate::error::Result;

pub use outbox::OutboxTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Html,
    Plain,
}

impl ParseMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ParseMode::Html => "HTML",
            ParseMode::Plain => "plain",
        }
    }
}

/// Outbound side of the chat platform. One call is one delivery attempt.
pub trait Transport {
    fn send_message(&self, chat_id: i64, text: &str, mode: ParseMode) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send_message(&self, chat_id: i64, text: &str, mode: ParseMode) -> Result<()> {
        (**self).send_message(chat_id, text, mode)
    }
}
