//! User-facing texts of the ask-the-owner dialog.

use crate::flow::event::{Button, Reply, CANCEL_PAYLOAD, CONFIRM_PAYLOAD};
use crate::format;

/// Longest question excerpt shown in the confirmation prompt.
pub const PREVIEW_CHARS: usize = 300;

pub fn unavailable() -> Reply {
    Reply::plain(
        "❌ Contacting the owner is temporarily unavailable.\n\
         The owner has not provided contact details.",
    )
}

pub fn ask_prompt(owner: &str) -> Reply {
    Reply::html(format!(
        "📝 <b>Question for the owner</b>\n\n\
         Write your question or message and I will pass it on to {}.\n\n\
         Use /cancel to abort.",
        owner
    ))
}

pub fn empty_question() -> Reply {
    Reply::plain("Please write your question as a text message, or use /cancel to abort.")
}

pub fn confirm_prompt(question: &str, owner: &str) -> Reply {
    Reply::html(format!(
        "<b>Confirm sending:</b>\n\n<i>{}</i>\n\nSend this question to {}?",
        format::truncate_for_display(question, PREVIEW_CHARS),
        owner
    ))
    .with_buttons(vec![
        Button {
            label: "✅ Send",
            payload: CONFIRM_PAYLOAD,
        },
        Button {
            label: "❌ Cancel",
            payload: CANCEL_PAYLOAD,
        },
    ])
}

pub fn question_sent(owner: &str) -> Reply {
    Reply::html(format!(
        "✅ <b>Your question has been sent to {}!</b>\n\n\
         I let them know about your message. They usually reply within 24 hours.\n\n\
         Thank you for reaching out! ✨",
        owner
    ))
}

pub fn quick_sent(owner: &str) -> Reply {
    Reply::html(format!(
        "✅ <b>Your question has been sent to {}!</b>\n\n\
         I let them know about your message. They will answer as soon as they can.",
        owner
    ))
}

pub fn send_failed() -> Reply {
    Reply::html(
        "❌ <b>Something went wrong while sending</b>\n\n\
         Please try again later or get in touch another way.",
    )
}

pub fn quick_failed() -> Reply {
    Reply::html("❌ Could not send your question. Please try again later.")
}

pub fn question_cancelled() -> Reply {
    Reply::plain("❌ Sending the question was cancelled.")
}

pub fn action_cancelled() -> Reply {
    Reply::plain("❌ Action cancelled.")
}

pub fn nothing_to_cancel() -> Reply {
    Reply::plain("There is nothing to cancel.")
}

pub fn quick_usage(prefix: &str) -> Reply {
    Reply::html(format!(
        "Please write your question after '{prefix}'\n\
         Example: <i>{prefix} How can we work together?</i>"
    ))
}
