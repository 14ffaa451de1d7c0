//! Per-user dialog for forwarding a question to the owner.
//!
//! `Idle` → `/ask` → `AwaitingQuestion` → text → `AwaitingConfirmation` →
//! confirm or cancel → `Idle`. Text starting with the quick prefix skips the
//! dialog and is dispatched at once.

pub mod event;
pub mod replies;

use std::collections::HashMap;

use tracing::{info, warn};

use crate::notify::{Dispatch, DispatchOutcome, Notifier};
use crate::storage::record::UserInfo;
use crate::storage::store::NotificationStore;
use crate::transport::Transport;

pub use event::{Choice, Command, Inbound, Reply};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingQuestion,
    AwaitingConfirmation { question: String },
}

#[derive(Debug, Clone)]
pub struct FlowSettings {
    /// How the owner is called in replies.
    pub owner_name: String,
    pub quick_prefix: String,
}

pub struct FlowController<S, T> {
    notifier: Notifier<S>,
    transport: T,
    settings: FlowSettings,
    sessions: HashMap<i64, ConversationState>,
}

impl<S: NotificationStore, T: Transport> FlowController<S, T> {
    pub fn new(notifier: Notifier<S>, transport: T, settings: FlowSettings) -> Self {
        FlowController {
            notifier,
            transport,
            settings,
            sessions: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub fn notifier(&self) -> &Notifier<S> {
        &self.notifier
    }

    pub fn state(&self, user_id: i64) -> ConversationState {
        self.sessions.get(&user_id).cloned().unwrap_or_default()
    }

    /// Handle one event from `user`. `None` means the event is not for this dialog.
    pub fn handle(&mut self, user: &UserInfo, event: Inbound) -> Option<Reply> {
        if self.notifier.owner_id().is_none() {
            return self.handle_unconfigured(&event);
        }

        match event {
            Inbound::Command(Command::Ask) => {
                self.sessions.insert(user.id, ConversationState::AwaitingQuestion);
                Some(replies::ask_prompt(&self.settings.owner_name))
            }
            Inbound::Command(Command::Cancel) => Some(self.cancel(user.id)),
            Inbound::Choice(choice) => self.resolve(user, choice),
            Inbound::Text(text) => {
                if self.state(user.id) == ConversationState::AwaitingQuestion {
                    return Some(self.collect(user.id, &text));
                }
                let rest = text.strip_prefix(self.settings.quick_prefix.as_str())?;
                Some(self.quick(user, rest.trim()))
            }
        }
    }

    fn handle_unconfigured(&self, event: &Inbound) -> Option<Reply> {
        match event {
            Inbound::Command(_) | Inbound::Choice(_) => Some(replies::unavailable()),
            Inbound::Text(text) if text.starts_with(self.settings.quick_prefix.as_str()) => {
                Some(replies::unavailable())
            }
            Inbound::Text(_) => None,
        }
    }

    fn cancel(&mut self, user_id: i64) -> Reply {
        match self.sessions.remove(&user_id) {
            None | Some(ConversationState::Idle) => replies::nothing_to_cancel(),
            Some(ConversationState::AwaitingQuestion) => replies::question_cancelled(),
            Some(ConversationState::AwaitingConfirmation { .. }) => replies::action_cancelled(),
        }
    }

    fn collect(&mut self, user_id: i64, text: &str) -> Reply {
        let question = text.trim();
        if question.eq_ignore_ascii_case("/cancel") {
            self.sessions.remove(&user_id);
            return replies::question_cancelled();
        }
        if question.is_empty() {
            return replies::empty_question();
        }

        let reply = replies::confirm_prompt(question, &self.settings.owner_name);
        self.sessions.insert(
            user_id,
            ConversationState::AwaitingConfirmation {
                question: question.to_string(),
            },
        );
        reply
    }

    fn resolve(&mut self, user: &UserInfo, choice: Choice) -> Option<Reply> {
        // Buttons left over from an earlier prompt are ignored
        let question = match self.sessions.remove(&user.id) {
            Some(ConversationState::AwaitingConfirmation { question }) => question,
            Some(other) => {
                self.sessions.insert(user.id, other);
                return None;
            }
            None => return None,
        };

        match choice {
            Choice::Cancel => Some(replies::question_cancelled()),
            Choice::Confirm => {
                let outcome = self.dispatch(Dispatch::question(&question, user));
                if outcome.delivered {
                    info!(user_id = user.id, preview = %preview(&question), "question sent to owner");
                    Some(replies::question_sent(&self.settings.owner_name))
                } else {
                    Some(replies::send_failed())
                }
            }
        }
    }

    fn quick(&self, user: &UserInfo, question: &str) -> Reply {
        if question.is_empty() {
            return replies::quick_usage(&self.settings.quick_prefix);
        }
        let outcome = self.dispatch(Dispatch {
            quick: true,
            ..Dispatch::question(question, user)
        });
        if outcome.delivered {
            info!(user_id = user.id, "quick question sent to owner");
            replies::quick_sent(&self.settings.owner_name)
        } else {
            replies::quick_failed()
        }
    }

    fn dispatch(&self, dispatch: Dispatch<'_>) -> DispatchOutcome {
        let outcome = self.notifier.send_to_owner(dispatch, Some(&self.transport));
        if !outcome.errors.is_empty() {
            warn!(
                user_id = dispatch.user.id,
                logged = outcome.logged,
                delivered = outcome.delivered,
                errors = ?outcome.errors,
                "dispatch incomplete"
            );
        }
        outcome
    }
}

fn preview(text: &str) -> String {
    crate::format::truncate_for_display(text, 50)
}
