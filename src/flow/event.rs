use crate::transport::ParseMode;

pub const CONFIRM_PAYLOAD: &str = "ask_confirm";
pub const CANCEL_PAYLOAD: &str = "ask_cancel";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ask,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Confirm,
    Cancel,
}

/// One event from a user, as routed by the chat transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Command(Command),
    Text(String),
    Choice(Choice),
}

impl Inbound {
    /// Classify a text message. Commands match exactly, as the bot platform does.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "/ask" => Inbound::Command(Command::Ask),
            "/cancel" => Inbound::Command(Command::Cancel),
            _ => Inbound::Text(raw.to_string()),
        }
    }

    /// Map an inline-button payload. Unknown payloads are not ours.
    pub fn from_callback(data: &str) -> Option<Self> {
        match data {
            CONFIRM_PAYLOAD => Some(Inbound::Choice(Choice::Confirm)),
            CANCEL_PAYLOAD => Some(Inbound::Choice(Choice::Cancel)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub payload: &'static str,
}

/// What the bot answers the user with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub mode: ParseMode,
    pub buttons: Vec<Button>,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Reply {
            text: text.into(),
            mode: ParseMode::Plain,
            buttons: Vec::new(),
        }
    }

    pub fn html(text: impl Into<String>) -> Self {
        Reply {
            text: text.into(),
            mode: ParseMode::Html,
            buttons: Vec::new(),
        }
    }

    pub fn with_buttons(mut self, buttons: Vec<Button>) -> Self {
        self.buttons = buttons;
        self
    }
}
