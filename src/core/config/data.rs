use crate::core::mode::Mode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_BACKEND_ROUTE: &str = "http://localhost:8080/api/routes/chat/";
pub const DEFAULT_STORAGE_KEY: &str = "flavaAI_chatHistory";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Base route of the chat backend; consensus requests go to `<route>consensus`
    pub backend_route: Option<String>,
    /// Mode selected when a session starts ("RAG" or "Consensus")
    pub default_mode: Option<Mode>,
    /// Key the chat history is stored under
    pub storage_key: Option<String>,
    /// Directory holding persisted chat history (defaults to the platform data dir)
    pub data_dir: Option<PathBuf>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
///
/// # Examples
/// - Unix: `/home/user/.local/share/flava` → `~/.local/share/flava`
/// - Windows: paths are returned unchanged
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

impl Config {
    pub fn backend_route_or_default(&self) -> &str {
        self.backend_route
            .as_deref()
            .filter(|route| !route.trim().is_empty())
            .unwrap_or(DEFAULT_BACKEND_ROUTE)
    }

    pub fn storage_key_or_default(&self) -> &str {
        self.storage_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .unwrap_or(DEFAULT_STORAGE_KEY)
    }

    pub fn default_mode_or_default(&self) -> Mode {
        self.default_mode.unwrap_or_default()
    }
}
