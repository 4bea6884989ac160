use crate::core::chat::Chat;
use crate::core::config::data::path_display;
use crate::core::config::settings::Settings;
use crate::core::storage::{FileStorage, Storage};
use crate::ui::renderer::render_chat_list;
use std::error::Error;

pub fn list_chats(settings: &Settings) -> Result<(), Box<dyn Error>> {
    let storage = FileStorage::new(&settings.data_dir);
    let listing = saved_chats_listing(&storage, &settings.storage_key)?;
    println!("{listing}");
    Ok(())
}

/// Read the stored history and describe it. Never writes: a missing or empty
/// history is reported as such and a corrupt one is left untouched.
pub fn saved_chats_listing(storage: &FileStorage, key: &str) -> Result<String, Box<dyn Error>> {
    let location = path_display(storage.path_for(key));
    let history: Vec<Chat> = match storage.get(key)? {
        Some(raw) => serde_json::from_str(&raw).map_err(|err| {
            format!("Saved chat history at {location} could not be parsed: {err}")
        })?,
        None => Vec::new(),
    };

    if history.is_empty() {
        return Ok(format!("No saved chats (looked in {location})."));
    }

    // The first chat is the one a new session opens.
    let active = history.first().map(|chat| chat.id.as_str());
    Ok(format!(
        "Saved chats (from {location}):\n\n{}\n\n💡 Resume a chat with /select <number> inside `flava chat`.",
        render_chat_list(&history, active)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Message;
    use std::fs;
    use tempfile::TempDir;

    const KEY: &str = "flavaAI_chatHistory";

    #[test]
    fn missing_history_is_reported_without_creating_a_file() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());

        let listing = saved_chats_listing(&storage, KEY).unwrap();

        assert!(listing.starts_with("No saved chats"));
        assert!(!storage.path_for(KEY).exists());
    }

    #[test]
    fn corrupt_history_is_reported_and_left_untouched() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        let path = storage.path_for(KEY);
        fs::write(&path, "{not json").unwrap();

        let err = saved_chats_listing(&storage, KEY).unwrap_err();

        assert!(err.to_string().contains("could not be parsed"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{not json");
    }

    #[test]
    fn stored_chats_are_listed_without_rewriting() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path());
        let mut chat = Chat::new("2");
        chat.push(Message::user("Newest"));
        let raw = serde_json::to_string(&vec![chat, Chat::new("1")]).unwrap();
        storage.set(KEY, &raw).unwrap();

        let listing = saved_chats_listing(&storage, KEY).unwrap();

        assert!(listing.contains("*  1. Newest (1 messages)"));
        assert!(listing.contains("   2. New Chat (0 messages)"));
        assert_eq!(fs::read_to_string(storage.path_for(KEY)).unwrap(), raw);
    }

    #[test]
    fn empty_history_counts_as_no_chats() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path());
        storage.set(KEY, "[]").unwrap();

        assert!(saved_chats_listing(&storage, KEY)
            .unwrap()
            .starts_with("No saved chats"));
        assert_eq!(fs::read_to_string(storage.path_for(KEY)).unwrap(), "[]");
    }
}
