//! Conversation state: every chat, which one is active, and the current mode.
//!
//! The store is the single owner of the chat history. The "current message
//! view" is always borrowed from the active history entry, so the two can never
//! drift apart. Every change to the history is written through to [`Storage`]
//! in full under one key.

use crate::core::chat::{highest_chat_id, next_chat_id, Chat};
use crate::core::message::Message;
use crate::core::mode::Mode;
use crate::core::storage::{Storage, StorageError};
use chrono::Utc;
use std::error::Error as StdError;
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug)]
pub enum SessionError {
    /// Writing the history to durable storage failed.
    Persist(StorageError),

    /// A message was appended while no chat was active.
    NoActiveChat,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Persist(source) => write!(f, "Failed to save chat history: {source}"),
            SessionError::NoActiveChat => write!(f, "No chat is active"),
        }
    }
}

impl StdError for SessionError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            SessionError::Persist(source) => Some(source),
            SessionError::NoActiveChat => None,
        }
    }
}

impl From<StorageError> for SessionError {
    fn from(value: StorageError) -> Self {
        SessionError::Persist(value)
    }
}

pub struct SessionStore {
    storage: Box<dyn Storage>,
    storage_key: String,
    chat_history: Vec<Chat>,
    active_chat_id: Option<String>,
    /// Highest id handed out so far, including chats since deleted.
    last_issued_id: i64,
    mode: Mode,
}

impl SessionStore {
    /// Restore the persisted history, or bootstrap a single empty chat when
    /// nothing usable is stored.
    pub fn load(
        storage: Box<dyn Storage>,
        storage_key: impl Into<String>,
        mode: Mode,
    ) -> Result<Self, SessionError> {
        let storage_key = storage_key.into();
        let restored = match storage.get(&storage_key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Chat>>(&raw) {
                Ok(history) => history,
                Err(err) => {
                    warn!(key = %storage_key, error = %err, "discarding unparsable chat history");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(key = %storage_key, error = %err, "chat history unreadable; starting fresh");
                Vec::new()
            }
        };

        let mut store = Self {
            storage,
            storage_key,
            active_chat_id: restored.first().map(|chat| chat.id.clone()),
            last_issued_id: highest_chat_id(&restored),
            chat_history: restored,
            mode,
        };

        if store.chat_history.is_empty() {
            store.create_new_chat()?;
        } else {
            debug!(chats = store.chat_history.len(), "restored chat history");
        }
        Ok(store)
    }

    pub fn chat_history(&self) -> &[Chat] {
        &self.chat_history
    }

    pub fn active_chat_id(&self) -> Option<&str> {
        self.active_chat_id.as_deref()
    }

    pub fn active_chat(&self) -> Option<&Chat> {
        let id = self.active_chat_id.as_deref()?;
        self.find_chat(id)
    }

    /// Messages of the active chat; empty when no chat is active.
    pub fn messages(&self) -> &[Message] {
        self.active_chat()
            .map(|chat| chat.messages.as_slice())
            .unwrap_or(&[])
    }

    pub fn find_chat(&self, id: &str) -> Option<&Chat> {
        self.chat_history.iter().find(|chat| chat.id == id)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Insert an empty chat at the front of the history and make it active.
    pub fn create_new_chat(&mut self) -> Result<&Chat, SessionError> {
        let issued = next_chat_id(Utc::now().timestamp_millis(), self.last_issued_id);
        self.last_issued_id = issued;
        let id = issued.to_string();
        debug!(chat_id = %id, "creating chat");

        self.chat_history.insert(0, Chat::new(id.clone()));
        self.active_chat_id = Some(id);
        self.persist()?;
        Ok(&self.chat_history[0])
    }

    /// Make `id` the active chat. Unknown ids are ignored; returns whether the
    /// selection changed anything.
    pub fn select_chat(&mut self, id: &str) -> bool {
        if self.find_chat(id).is_none() {
            debug!(chat_id = %id, "ignoring selection of unknown chat");
            return false;
        }
        self.active_chat_id = Some(id.to_string());
        true
    }

    /// Remove a chat. Deleting the active chat activates the first remaining
    /// one, or a fresh chat when none remain.
    pub fn delete_chat(&mut self, id: &str) -> Result<(), SessionError> {
        self.chat_history.retain(|chat| chat.id != id);

        if self.active_chat_id.as_deref() == Some(id) {
            match self.chat_history.first() {
                Some(first) => self.active_chat_id = Some(first.id.clone()),
                None => {
                    self.active_chat_id = None;
                    self.create_new_chat()?;
                    return Ok(());
                }
            }
        }
        self.persist()
    }

    pub fn append_user_message(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        self.append_to_active(Message::user(text))
    }

    pub fn append_assistant_message(
        &mut self,
        text: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.append_to_active(Message::assistant(text))
    }

    /// Append to a specific chat regardless of which one is active. Returns
    /// `false` when the chat no longer exists.
    pub fn append_to_chat(&mut self, id: &str, message: Message) -> Result<bool, SessionError> {
        let Some(chat) = self.chat_history.iter_mut().find(|chat| chat.id == id) else {
            warn!(chat_id = %id, "dropping message for deleted chat");
            return Ok(false);
        };
        chat.push(message);
        self.persist()?;
        Ok(true)
    }

    fn append_to_active(&mut self, message: Message) -> Result<(), SessionError> {
        let id = self
            .active_chat_id
            .clone()
            .ok_or(SessionError::NoActiveChat)?;
        if self.append_to_chat(&id, message)? {
            Ok(())
        } else {
            Err(SessionError::NoActiveChat)
        }
    }

    fn persist(&mut self) -> Result<(), SessionError> {
        let serialized = serde_json::to_string(&self.chat_history).map_err(StorageError::from)?;
        self.storage.set(&self.storage_key, &serialized)?;
        Ok(())
    }
}
