use crate::core::message::Message;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CHAT_TITLE: &str = "New Chat";

/// Titles longer than this many characters are cut and suffixed with `...`.
pub const TITLE_MAX_CHARS: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
}

impl Chat {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: DEFAULT_CHAT_TITLE.to_string(),
            messages: Vec::new(),
        }
    }

    /// Appends a message, deriving the title when this is the chat's first
    /// user turn.
    pub fn push(&mut self, message: Message) {
        let first_user_turn = message.is_user() && !self.messages.iter().any(Message::is_user);
        if first_user_turn {
            self.title = truncate_title(&message.content);
        }
        self.messages.push(message);
    }
}

/// Cut `text` to [`TITLE_MAX_CHARS`] characters, appending `...` when anything
/// was dropped. Counts Unicode scalar values so multi-byte text never splits.
pub fn truncate_title(text: &str) -> String {
    match text.char_indices().nth(TITLE_MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Millisecond timestamp id, strictly greater than every id issued before.
pub fn next_chat_id(now_millis: i64, last_issued: i64) -> i64 {
    now_millis.max(last_issued.saturating_add(1))
}

/// Largest numeric id in `history`, or 0 when there is none.
pub fn highest_chat_id(history: &[Chat]) -> i64 {
    history
        .iter()
        .filter_map(|chat| chat.id.parse::<i64>().ok())
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_chat_is_empty_with_default_title() {
        let chat = Chat::new("1");
        assert!(chat.messages.is_empty());
        assert_eq!(chat.title, DEFAULT_CHAT_TITLE);
    }

    #[test]
    fn short_titles_are_kept_verbatim() {
        assert_eq!(truncate_title("Hello"), "Hello");
        let exactly = "a".repeat(TITLE_MAX_CHARS);
        assert_eq!(truncate_title(&exactly), exactly);
    }

    #[test]
    fn long_titles_are_cut_with_ellipsis() {
        let title = truncate_title("What is the Flare network and how does it work?");
        assert_eq!(title, "What is the Flare network...");
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS + 3);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "é".repeat(30);
        let title = truncate_title(&text);
        assert_eq!(title, format!("{}...", "é".repeat(TITLE_MAX_CHARS)));
    }

    #[test]
    fn only_first_user_message_sets_title() {
        let mut chat = Chat::new("1");
        chat.push(Message::user("First question"));
        chat.push(Message::assistant("An answer that is definitely long enough"));
        chat.push(Message::user("Second question"));
        assert_eq!(chat.title, "First question");
        assert_eq!(chat.messages.len(), 3);
    }

    #[test]
    fn assistant_message_alone_keeps_default_title() {
        let mut chat = Chat::new("1");
        chat.push(Message::assistant("Welcome"));
        assert_eq!(chat.title, DEFAULT_CHAT_TITLE);
    }

    #[test]
    fn chat_ids_never_go_backwards() {
        assert_eq!(next_chat_id(100, 0), 100);
        assert_eq!(next_chat_id(100, 100), 101);
        assert_eq!(next_chat_id(100, 250), 251);
    }

    #[test]
    fn highest_chat_id_ignores_non_numeric_ids() {
        let history = vec![Chat::new("17"), Chat::new("legacy"), Chat::new("42")];
        assert_eq!(highest_chat_id(&history), 42);
        assert_eq!(highest_chat_id(&[]), 0);
    }
}
