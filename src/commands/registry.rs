use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&mut App, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        help: "Show available commands.",
        handler: super::handle_help,
    },
    Command {
        name: "new",
        usage: "/new",
        help: "Start a new chat and make it active.",
        handler: super::handle_new,
    },
    Command {
        name: "chats",
        usage: "/chats",
        help: "List saved chats, most recent first.",
        handler: super::handle_chats,
    },
    Command {
        name: "select",
        usage: "/select <number|id>",
        help: "Switch to a saved chat.",
        handler: super::handle_select,
    },
    Command {
        name: "delete",
        usage: "/delete [number|id]",
        help: "Delete a chat (the active one when no argument is given).",
        handler: super::handle_delete,
    },
    Command {
        name: "mode",
        usage: "/mode [rag|consensus]",
        help: "Show or switch the backend mode.",
        handler: super::handle_mode,
    },
    Command {
        name: "log",
        usage: "/log [filename]",
        help: "Toggle transcript logging or set the log file path.",
        handler: super::handle_log,
    },
    Command {
        name: "dump",
        usage: "/dump [filename]",
        help: "Export the active chat to a text file.",
        handler: super::handle_dump,
    },
    Command {
        name: "quit",
        usage: "/quit",
        help: "Leave the session.",
        handler: super::handle_quit,
    },
];
