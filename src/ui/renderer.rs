//! Plain-text rendering of session state for the terminal front end.

use crate::core::app::App;
use crate::core::chat::Chat;
use crate::core::message::{Message, TranscriptRole};
use crate::utils::logging::USER_PREFIX;

const TOOL_MARKER_PREFIX: &str = "Agent tool used: ";

/// Tools the backend reports when an agent consulted one.
pub const KNOWN_AGENT_TOOLS: &[&str] = &[
    "retrieve-flare-network-documentation",
    "get-validator-info",
    "retrieve-blaze-swap-documentation",
    "get_validator_info",
];

/// Split the first `Agent tool used: <tool>` marker out of assistant text.
/// Returns the trimmed remainder and the marker, if one was found.
pub fn split_tool_marker(content: &str) -> (String, Option<String>) {
    let earliest = KNOWN_AGENT_TOOLS
        .iter()
        .filter_map(|tool| {
            let marker = format!("{TOOL_MARKER_PREFIX}{tool}");
            content.find(&marker).map(|start| (start, marker))
        })
        .min_by_key(|(start, _)| *start);

    match earliest {
        Some((start, marker)) => {
            let mut body = String::with_capacity(content.len() - marker.len());
            body.push_str(&content[..start]);
            body.push_str(&content[start + marker.len()..]);
            (body.trim().to_string(), Some(marker))
        }
        None => (content.to_string(), None),
    }
}

/// Lines for one message: user turns carry the prefix, assistant text is
/// printed as-is with any tool marker moved to its own tag line, followed by
/// a blank spacer.
pub fn build_message_lines(message: &Message) -> Vec<String> {
    let mut lines = Vec::new();
    match message.role {
        TranscriptRole::User => lines.push(format!("{USER_PREFIX}: {}", message.content)),
        TranscriptRole::Assistant => {
            let (body, marker) = split_tool_marker(&message.content);
            lines.extend(body.lines().map(|line| line.trim_end().to_string()));
            if let Some(marker) = marker {
                lines.push(format!("[tool: {marker}]"));
            }
        }
    }
    lines.push(String::new());
    lines
}

pub fn build_display_lines(messages: &[Message]) -> Vec<String> {
    messages.iter().flat_map(build_message_lines).collect()
}

pub fn render_transcript(messages: &[Message]) -> String {
    build_display_lines(messages).join("\n")
}

/// Numbered chat list, most recent first, with the active chat marked.
pub fn render_chat_list(history: &[Chat], active_chat_id: Option<&str>) -> String {
    history
        .iter()
        .enumerate()
        .map(|(index, chat)| {
            let marker = if Some(chat.id.as_str()) == active_chat_id {
                '*'
            } else {
                ' '
            };
            format!(
                "{marker} {:>2}. {} ({} messages)",
                index + 1,
                chat.title,
                chat.messages.len()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn title_line(app: &App) -> String {
    let chat_title = app
        .session
        .active_chat()
        .map(|chat| chat.title.as_str())
        .unwrap_or("-");
    format!(
        "Flava v{} • Mode: {} • Chat: {} • Logging: {}",
        env!("CARGO_PKG_VERSION"),
        app.mode(),
        chat_title,
        app.logging.get_status_string()
    )
}
