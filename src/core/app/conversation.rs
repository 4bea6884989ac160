//! The submission path: validate, append the user turn, call the backend,
//! append the reply.
//!
//! A submission is split into three steps so a front end can keep rendering
//! while the request is outstanding: [`App::begin_submit`] captures everything
//! the request needs into a [`PendingTurn`], [`PendingTurn::resolve`] performs
//! the call without borrowing the app, and [`App::complete_submit`] lands the
//! reply. [`App::submit`] runs all three in sequence.

use super::App;
use crate::api::ChatMessage;
use crate::core::dispatcher::{context_window, RequestDispatcher};
use crate::core::message::Message;
use crate::core::mode::Mode;
use crate::core::session::SessionError;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    /// A request is already in flight.
    Busy,
    /// Nothing but whitespace was entered.
    Blank,
}

pub enum Submission {
    Pending(PendingTurn),
    Rejected(SubmitRejection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Replied(String),
    Rejected(SubmitRejection),
}

pub struct PendingTurn {
    chat_id: String,
    mode: Mode,
    endpoint: String,
    context: Vec<ChatMessage>,
    dispatcher: RequestDispatcher,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedTurn {
    pub chat_id: String,
    pub reply: String,
}

impl PendingTurn {
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn context(&self) -> &[ChatMessage] {
        &self.context
    }

    /// Never fails: transport and decoding problems become the fixed error
    /// reply.
    pub async fn resolve(self) -> CompletedTurn {
        let reply = self.dispatcher.dispatch(&self.endpoint, &self.context).await;
        CompletedTurn {
            chat_id: self.chat_id,
            reply,
        }
    }
}

impl App {
    pub fn begin_submit(&mut self, text: &str) -> Result<Submission, SessionError> {
        if self.is_loading {
            debug!("submission rejected while a request is in flight");
            return Ok(Submission::Rejected(SubmitRejection::Busy));
        }
        if text.trim().is_empty() {
            return Ok(Submission::Rejected(SubmitRejection::Blank));
        }

        let chat_id = self
            .session
            .active_chat_id()
            .ok_or(SessionError::NoActiveChat)?
            .to_string();
        // The window is taken before the new turn lands in the history.
        let context = context_window(self.session.messages(), text);
        let mode = self.session.mode();
        let endpoint = self.dispatcher.endpoint(mode);

        self.session.append_user_message(text)?;
        self.log_turn(&Message::user(text));
        self.is_loading = true;

        Ok(Submission::Pending(PendingTurn {
            chat_id,
            mode,
            endpoint,
            context,
            dispatcher: self.dispatcher.clone(),
        }))
    }

    /// Land the reply in the chat that asked for it and clear the loading
    /// flag, even when persisting fails.
    pub fn complete_submit(&mut self, turn: CompletedTurn) -> Result<(), SessionError> {
        self.is_loading = false;
        let message = Message::assistant(turn.reply);
        let landed = self.session.append_to_chat(&turn.chat_id, message.clone())?;
        if landed {
            self.log_turn(&message);
        }
        Ok(())
    }

    pub async fn submit(&mut self, text: &str) -> Result<SubmitOutcome, SessionError> {
        let pending = match self.begin_submit(text)? {
            Submission::Pending(pending) => pending,
            Submission::Rejected(reason) => return Ok(SubmitOutcome::Rejected(reason)),
        };
        let completed = pending.resolve().await;
        let reply = completed.reply.clone();
        self.complete_submit(completed)?;
        Ok(SubmitOutcome::Replied(reply))
    }

    fn log_turn(&self, message: &Message) {
        if let Err(err) = self.logging.log_message(message) {
            warn!(error = %err, "failed to write transcript log");
        }
    }
}
