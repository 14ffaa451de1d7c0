use std::io::IsTerminal;
use crate::flow::Reply;
use crate::transport::ParseMode;

fn enabled() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

fn paint(s: &str, code: &str) -> String {
    if enabled() {
        format!("\x1b[{}m{}\x1b[0m", code, s)
    } else {
        s.to_string()
    }
}

pub fn success_line(label: &str, value: &str) -> String {
    let mark = paint("✓", "32");
    let label = paint(label, "1;32");
    format!("{} {} {}", mark, label, value)
}

pub fn info_line(label: &str, value: &str) -> String {
    let mark = paint("•", "36");
    let label = paint(label, "1;36");
    format!("{} {} {}", mark, label, value)
}

pub fn table_header() -> String {
    let row = format!(
        "{:<6} {:<10} {:<16} {:<17} {}",
        "ID", "STATUS", "FROM", "TIME", "MESSAGE"
    );
    paint(&row, "1")
}

/// Bot reply as shown on the console, inline buttons as `[label → @payload]`.
pub fn render_reply(reply: &Reply) -> String {
    let mut out = match reply.mode {
        ParseMode::Plain => reply.text.clone(),
        ParseMode::Html => html_to_console(&reply.text),
    };
    if !reply.buttons.is_empty() {
        let buttons: Vec<String> = reply
            .buttons
            .iter()
            .map(|b| format!("[{} → @{}]", b.label, b.payload))
            .collect();
        out.push('\n');
        out.push_str(&paint(&buttons.join(" "), "36"));
    }
    out
}

/// Turn the reply markup into terminal styling. Only the tags the replies
/// use are touched; any other `<` in user text is left as is.
fn html_to_console(text: &str) -> String {
    let (bold, italic, reset) = if enabled() {
        ("\x1b[1m", "\x1b[3m", "\x1b[0m")
    } else {
        ("", "", "")
    };
    text.replace("<b>", bold)
        .replace("</b>", reset)
        .replace("<i>", italic)
        .replace("</i>", reset)
}
