//! Slash commands available in the interactive session.

mod registry;

pub use registry::{all_commands, CommandInvocation};

use crate::core::app::App;
use crate::core::mode::Mode;
use crate::utils::logging::write_message;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};

pub enum CommandResult {
    Continue,
    /// The active chat changed; the front end should redraw it.
    ShowChat,
    ProcessAsMessage(String),
    Quit,
}

pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    if !trimmed.starts_with('/') {
        return CommandResult::ProcessAsMessage(input.to_string());
    }

    let mut parts = trimmed[1..].splitn(2, ' ');
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    match registry::find_command(command_name) {
        Some(command) => {
            let invocation = CommandInvocation { args };
            (command.handler)(app, invocation)
        }
        None => CommandResult::ProcessAsMessage(input.to_string()),
    }
}

/// Resolve a 1-based list position or a literal chat id.
fn resolve_chat_ref(app: &App, reference: &str) -> Option<String> {
    let history = app.session.chat_history();
    if let Ok(position) = reference.parse::<usize>() {
        if let Some(chat) = position.checked_sub(1).and_then(|index| history.get(index)) {
            return Some(chat.id.clone());
        }
    }
    app.session.find_chat(reference).map(|chat| chat.id.clone())
}

pub(super) fn handle_help(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let mut help = String::from("Commands:");
    for command in all_commands() {
        help.push_str(&format!("\n  {:<24} {}", command.usage, command.help));
    }
    help.push_str("\nAnything else is sent to the backend.");
    app.set_status(help);
    CommandResult::Continue
}

pub(super) fn handle_new(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    match app.new_chat() {
        Ok(()) => CommandResult::ShowChat,
        Err(e) => {
            app.set_status(format!("Error: {e}"));
            CommandResult::Continue
        }
    }
}

pub(super) fn handle_chats(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let listing = crate::ui::renderer::render_chat_list(
        app.session.chat_history(),
        app.session.active_chat_id(),
    );
    app.set_status(listing);
    CommandResult::Continue
}

pub(super) fn handle_select(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        app.set_status("Usage: /select <number|id>");
        return CommandResult::Continue;
    }
    match resolve_chat_ref(app, invocation.args) {
        Some(id) if app.session.select_chat(&id) => CommandResult::ShowChat,
        _ => {
            app.set_status(format!("No chat matches '{}'", invocation.args));
            CommandResult::Continue
        }
    }
}

pub(super) fn handle_delete(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let target = if invocation.args.is_empty() {
        app.session.active_chat_id().map(str::to_string)
    } else {
        resolve_chat_ref(app, invocation.args)
    };
    let Some(id) = target else {
        app.set_status(format!("No chat matches '{}'", invocation.args));
        return CommandResult::Continue;
    };

    let was_active = app.session.active_chat_id() == Some(id.as_str());
    match app.session.delete_chat(&id) {
        Ok(()) if was_active => CommandResult::ShowChat,
        Ok(()) => {
            app.set_status("Chat deleted");
            CommandResult::Continue
        }
        Err(e) => {
            app.set_status(format!("Error: {e}"));
            CommandResult::Continue
        }
    }
}

pub(super) fn handle_mode(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        app.set_status(format!("Mode: {}", app.mode()));
        return CommandResult::Continue;
    }
    match invocation.args.parse::<Mode>() {
        Ok(mode) => {
            let status = match app.set_mode(mode) {
                Some(notice) => format!("Mode set: {mode}\n{notice}"),
                None => format!("Mode set: {mode}"),
            };
            app.set_status(status);
        }
        Err(e) => app.set_status(format!("Mode error: {e}")),
    }
    CommandResult::Continue
}

pub(super) fn handle_log(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let status = if invocation.args.is_empty() {
        match app.logging.toggle_logging() {
            Ok(message) => message,
            Err(e) => format!("Log error: {e}"),
        }
    } else {
        match app.logging.set_log_file(invocation.args.to_string()) {
            Ok(message) => message,
            Err(e) => format!("Logfile error: {e}"),
        }
    };
    app.set_status(status);
    CommandResult::Continue
}

pub(super) fn handle_dump(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let filename = if invocation.args.is_empty() {
        format!("flava-chat-{}.txt", Local::now().format("%Y-%m-%d"))
    } else {
        invocation.args.to_string()
    };

    let status = match dump_conversation(app, &filename) {
        Ok(()) => format!("Chat dumped to: {filename}"),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            format!("Dump error: {filename} already exists")
        }
        Err(e) => format!("Dump error: {e}"),
    };
    app.set_status(status);
    CommandResult::Continue
}

pub(super) fn handle_quit(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Quit
}

/// Write the active chat in transcript-log format. Existing files are never
/// overwritten.
pub fn dump_conversation(app: &App, filename: &str) -> std::io::Result<()> {
    let messages = app.session.messages();
    if messages.is_empty() {
        return Err(std::io::Error::other("no messages to dump"));
    }

    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(filename)?;
    let mut writer = BufWriter::new(file);
    for message in messages {
        write_message(&mut writer, message)?;
    }
    writer.flush()
}
