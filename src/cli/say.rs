//! Interactive-session-free "say" command

use std::error::Error;

use crate::core::app::{App, SubmitOutcome};
use crate::core::config::settings::Settings;
use crate::core::dispatcher::RequestDispatcher;
use crate::core::session::SessionStore;
use crate::core::storage::MemoryStorage;

/// Send one message through a throwaway in-memory session and print the
/// reply. Saved chats are left untouched.
pub async fn run_say(settings: &Settings, prompt: Vec<String>) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: flava say <prompt>");
        std::process::exit(1);
    }

    let reply = say_once(settings, &prompt).await?;
    println!("{reply}");
    Ok(())
}

pub async fn say_once(settings: &Settings, prompt: &str) -> Result<String, Box<dyn Error>> {
    let session = SessionStore::load(
        Box::new(MemoryStorage::new()),
        settings.storage_key.clone(),
        settings.default_mode,
    )?;
    let dispatcher = RequestDispatcher::new(settings.backend_route.clone());
    say_with(App::new(session, dispatcher), prompt).await
}

async fn say_with(mut app: App, prompt: &str) -> Result<String, Box<dyn Error>> {
    match app.submit(prompt).await? {
        SubmitOutcome::Replied(reply) => Ok(reply),
        SubmitOutcome::Rejected(reason) => Err(format!("message rejected: {reason:?}").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dispatcher::REQUEST_ERROR_MESSAGE;
    use crate::utils::test_utils::{
        create_test_app, spawn_mock_backend, MockReply, TEST_STORAGE_KEY,
    };

    #[tokio::test]
    async fn say_returns_backend_reply() {
        let backend =
            spawn_mock_backend(vec![MockReply::json(200, r#"{"response":"Hi there"}"#)]).await;
        let (app, storage) = create_test_app(&backend.route());

        let reply = say_with(app, "Hello").await.unwrap();

        assert_eq!(reply, "Hi there");
        // Only the in-memory store saw the exchange.
        assert!(storage.snapshot(TEST_STORAGE_KEY).is_some());
    }

    #[tokio::test]
    async fn say_reports_backend_failure_as_reply() {
        let backend = spawn_mock_backend(vec![MockReply::json(500, "{}")]).await;
        let (app, _) = create_test_app(&backend.route());

        let reply = say_with(app, "Hello").await.unwrap();

        assert_eq!(reply, REQUEST_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn say_rejects_blank_prompt() {
        let (app, _) = create_test_app("http://127.0.0.1:9/api/routes/chat/");
        let err = say_with(app, "  ").await.unwrap_err();
        assert!(err.to_string().contains("Blank"));
    }
}
