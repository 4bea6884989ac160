//! Line-oriented interactive session.
//!
//! Reads one line at a time from stdin, routes slash commands, and submits
//! everything else. Input is not read while a request is outstanding, which
//! is how the loading flag shows up in a terminal.

use crate::commands::{process_input, CommandResult};
use crate::core::app::{App, Submission, SubmitRejection};
use crate::ui::renderer::{build_message_lines, render_transcript, title_line};
use std::error::Error;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

const PROMPT: &str = "> ";

pub async fn run_chat(mut app: App) -> Result<(), Box<dyn Error>> {
    let mut stdout = std::io::stdout();
    show_active_chat(&mut stdout, &app)?;
    writeln!(stdout, "Type /help for commands.")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        write!(stdout, "{PROMPT}")?;
        stdout.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match process_input(&mut app, &line) {
            CommandResult::Continue => {}
            CommandResult::ShowChat => show_active_chat(&mut stdout, &app)?,
            CommandResult::Quit => break,
            CommandResult::ProcessAsMessage(text) => {
                submit_line(&mut stdout, &mut app, &text).await?;
            }
        }

        if let Some(status) = app.take_status() {
            writeln!(stdout, "{status}")?;
        }
    }

    info!("chat session ended");
    Ok(())
}

async fn submit_line(
    out: &mut impl Write,
    app: &mut App,
    text: &str,
) -> Result<(), Box<dyn Error>> {
    let pending = match app.begin_submit(text)? {
        Submission::Pending(pending) => pending,
        Submission::Rejected(SubmitRejection::Blank) => return Ok(()),
        Submission::Rejected(SubmitRejection::Busy) => {
            app.set_status("A reply is still on its way.");
            return Ok(());
        }
    };

    writeln!(out, "… waiting for {} reply", pending.mode())?;
    out.flush()?;
    let completed = pending.resolve().await;
    app.complete_submit(completed)?;

    writeln!(out)?;
    if let Some(reply) = app.session.messages().last() {
        for line in build_message_lines(reply) {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}

fn show_active_chat(out: &mut impl Write, app: &App) -> std::io::Result<()> {
    writeln!(out, "{}", title_line(app))?;
    writeln!(out)?;
    let transcript = render_transcript(app.session.messages());
    if !transcript.is_empty() {
        writeln!(out, "{transcript}")?;
    }
    Ok(())
}
