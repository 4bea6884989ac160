use crate::core::config::settings::Settings;
use crate::core::dispatcher::RequestDispatcher;
use crate::core::mode::{Mode, CONSENSUS_NOTICE};
use crate::core::session::{SessionError, SessionStore};
use crate::core::storage::{FileStorage, Storage};
use crate::utils::logging::LoggingState;

pub mod conversation;

pub use conversation::{CompletedTurn, PendingTurn, SubmitOutcome, SubmitRejection, Submission};

/// Chat controller: the session store, the dispatcher it talks through and
/// the single in-flight flag guarding submissions.
pub struct App {
    pub session: SessionStore,
    pub logging: LoggingState,
    dispatcher: RequestDispatcher,
    is_loading: bool,
    status: Option<String>,
}

/// Open the persisted session described by `settings`.
pub fn new_from_settings(
    settings: &Settings,
    log_file: Option<String>,
) -> Result<App, Box<dyn std::error::Error>> {
    let storage: Box<dyn Storage> = Box::new(FileStorage::new(&settings.data_dir));
    let session = SessionStore::load(storage, settings.storage_key.clone(), settings.default_mode)?;
    let dispatcher = RequestDispatcher::new(settings.backend_route.clone());
    let mut app = App::new(session, dispatcher);
    app.logging = LoggingState::new(log_file)?;
    Ok(app)
}

impl App {
    pub fn new(session: SessionStore, dispatcher: RequestDispatcher) -> Self {
        Self {
            session,
            logging: LoggingState::disabled(),
            dispatcher,
            is_loading: false,
            status: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    pub fn mode(&self) -> Mode {
        self.session.mode()
    }

    /// Switch modes. Returns the notice to show when consensus is selected.
    pub fn set_mode(&mut self, mode: Mode) -> Option<&'static str> {
        self.session.set_mode(mode);
        (mode == Mode::Consensus).then_some(CONSENSUS_NOTICE)
    }

    /// One-line feedback for the front end, consumed when shown.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn take_status(&mut self) -> Option<String> {
        self.status.take()
    }

    pub fn new_chat(&mut self) -> Result<(), SessionError> {
        self.session.create_new_chat().map(|_| ())
    }
}
