//! Line-oriented terminal surface.
//!
//! Stdin lines and worker events are funneled into one channel so the
//! controller is only ever touched from the thread running [`run`].

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::JoinHandle;

use tracing::{debug, warn};

use crate::controller::{Controller, Notice, PromptInput, WorkerEvent};

/// Everything the surface loop reacts to.
#[derive(Debug)]
pub enum SurfaceEvent {
    Line(String),
    /// Stdin reached end of file.
    Closed,
    Worker(WorkerEvent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(PathBuf),
    Analyze,
    Retry,
    Clear,
    Export(Option<PathBuf>),
    Status,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    /// Parse a slash command. Lines not starting with `/` are prompts.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let rest = line.strip_prefix('/')?;
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        let arg = (!arg.is_empty()).then(|| PathBuf::from(arg));

        Some(match (name, arg) {
            ("open", Some(path)) => Self::Open(path),
            ("analyze", None) => Self::Analyze,
            ("retry", None) => Self::Retry,
            ("clear", None) => Self::Clear,
            ("export", target) => Self::Export(target),
            ("status", None) => Self::Status,
            ("help", None) => Self::Help,
            ("quit" | "exit", None) => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        })
    }
}

const HELP: &str = "\
Commands:
  /open <path>     select a PDF
  /analyze         upload the selected PDF
  /retry           resend the last failed prompt
  /clear           clear the conversation
  /export [path]   write the conversation to a text file
  /status          show the current document and session
  /help            show this help
  /quit            exit
Anything else is sent as a prompt. End a line with \\ to continue it.";

/// Forward stdin lines into `events` until end of file.
pub fn spawn_stdin_reader(events: Sender<SurfaceEvent>) -> io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("pdfchat-stdin".into())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if events.send(SurfaceEvent::Line(line)).is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read stdin");
                        break;
                    }
                }
            }
            let _ = events.send(SurfaceEvent::Closed);
        })
}

/// Drive the controller until `/quit`, or until stdin closes and every
/// outstanding request has come back.
pub fn run(
    controller: &mut Controller,
    events: &Receiver<SurfaceEvent>,
    out: &mut impl Write,
) -> io::Result<()> {
    let mut input = PromptInput::new();
    let mut closing = false;

    while let Ok(event) = events.recv() {
        match event {
            SurfaceEvent::Line(line) => {
                if !handle_line(controller, &mut input, &line, out)? {
                    break;
                }
            }
            SurfaceEvent::Worker(event) => render(&controller.handle_event(event), out)?,
            SurfaceEvent::Closed => {
                debug!("Input closed");
                closing = true;
            }
        }
        out.flush()?;

        if closing && !controller.has_in_flight() {
            break;
        }
    }
    Ok(())
}

/// Returns `false` when the surface should exit.
fn handle_line(
    controller: &mut Controller,
    input: &mut PromptInput,
    line: &str,
    out: &mut impl Write,
) -> io::Result<bool> {
    // Commands only count at the start of a prompt, not mid-composition.
    let command = if input.is_empty() {
        Command::parse(line)
    } else {
        None
    };

    let result = match command {
        None => match input.feed_line(line) {
            Some(prompt) if prompt.trim().is_empty() => return Ok(true),
            Some(prompt) => controller.submit_prompt(prompt),
            None => return Ok(true),
        },
        Some(Command::Quit) => return Ok(false),
        Some(Command::Help) => {
            writeln!(out, "{HELP}")?;
            return Ok(true);
        }
        Some(Command::Unknown(text)) => {
            writeln!(out, "unknown command: {text} (try /help)")?;
            return Ok(true);
        }
        Some(Command::Open(path)) => Ok(controller.select_document(path)),
        Some(Command::Analyze) => controller.analyze(),
        Some(Command::Retry) => controller.retry(),
        Some(Command::Clear) => Ok(controller.clear()),
        Some(Command::Export(target)) => controller.export(target).map(|(_, notices)| notices),
        Some(Command::Status) => Ok(controller.status()),
    };

    match result {
        Ok(notices) => render(&notices, out)?,
        Err(e) => writeln!(out, "error: {e}")?,
    }
    Ok(true)
}

pub fn render(notices: &[Notice], out: &mut impl Write) -> io::Result<()> {
    for notice in notices {
        match notice {
            Notice::Status(text) => writeln!(out, "{text}")?,
            Notice::Processing => writeln!(out, "Processing prompt ...")?,
            Notice::Reply { prompt, text } => {
                let first = prompt.lines().next().unwrap_or_default();
                writeln!(out, "re: {first}")?;
                writeln!(out, "{text}")?;
                writeln!(out)?;
            }
            Notice::Failure(message) => writeln!(out, "error: {message}")?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::WorkerRequest;
    use pdfchat_api::DocumentSession;
    use pdfchat_config::schema::ExportConfig;
    use std::sync::mpsc;

    #[test]
    fn parses_commands() {
        assert_eq!(
            Command::parse("/open docs/paper.pdf"),
            Some(Command::Open(PathBuf::from("docs/paper.pdf")))
        );
        assert_eq!(Command::parse("/analyze"), Some(Command::Analyze));
        assert_eq!(Command::parse("  /retry  "), Some(Command::Retry));
        assert_eq!(Command::parse("/export"), Some(Command::Export(None)));
        assert_eq!(
            Command::parse("/export out/chat.txt"),
            Some(Command::Export(Some(PathBuf::from("out/chat.txt"))))
        );
        assert_eq!(Command::parse("/exit"), Some(Command::Quit));
    }

    #[test]
    fn malformed_commands_are_unknown() {
        assert_eq!(
            Command::parse("/open"),
            Some(Command::Unknown("/open".into()))
        );
        assert_eq!(
            Command::parse("/analyze now"),
            Some(Command::Unknown("/analyze now".into()))
        );
        assert_eq!(
            Command::parse("/frobnicate"),
            Some(Command::Unknown("/frobnicate".into()))
        );
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(Command::parse("What is on page 3?"), None);
        assert_eq!(Command::parse("a/b"), None);
    }

    fn run_script(controller: &mut Controller, events: Vec<SurfaceEvent>) -> String {
        let (tx, rx) = mpsc::channel();
        for event in events {
            tx.send(event).unwrap();
        }
        drop(tx);
        let mut out = Vec::new();
        run(controller, &rx, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn analyze_without_document_prints_hint() {
        let (tx, _rx) = mpsc::channel();
        let mut controller = Controller::new(tx, ExportConfig::default());
        let out = run_script(
            &mut controller,
            vec![SurfaceEvent::Line("/analyze".into()), SurfaceEvent::Closed],
        );
        assert!(out.contains("error: Please select a PDF to analyze"));
    }

    #[test]
    fn continued_lines_form_one_prompt_and_slash_inside_is_text() {
        let (tx, rx) = mpsc::channel();
        let mut controller = Controller::new(tx, ExportConfig::default());
        controller.select_document("paper.pdf");
        controller.analyze().unwrap();
        let ticket = match rx.try_recv().unwrap() {
            WorkerRequest::Upload { ticket, .. } => ticket,
            other => panic!("expected upload, got {other:?}"),
        };

        let out = run_script(
            &mut controller,
            vec![
                SurfaceEvent::Worker(WorkerEvent::Uploaded {
                    ticket,
                    result: Ok(DocumentSession::new("src_42", "paper.pdf")),
                }),
                SurfaceEvent::Line("first line\\".into()),
                SurfaceEvent::Line("/not a command".into()),
                SurfaceEvent::Line("/quit".into()),
            ],
        );
        assert!(out.contains("READY TO CHAT!"));
        assert!(out.contains("Processing prompt ..."));

        match rx.try_recv().unwrap() {
            WorkerRequest::Exchange { prompt, .. } => {
                assert_eq!(prompt, "first line\n/not a command");
            }
            other => panic!("expected exchange, got {other:?}"),
        }
    }

    #[test]
    fn closed_input_waits_for_outstanding_reply() {
        let (tx, rx) = mpsc::channel();
        let mut controller = Controller::new(tx, ExportConfig::default());
        controller.select_document("paper.pdf");
        controller.analyze().unwrap();
        let ticket = match rx.try_recv().unwrap() {
            WorkerRequest::Upload { ticket, .. } => ticket,
            other => panic!("expected upload, got {other:?}"),
        };

        let out = run_script(
            &mut controller,
            vec![
                SurfaceEvent::Closed,
                SurfaceEvent::Worker(WorkerEvent::Uploaded {
                    ticket,
                    result: Ok(DocumentSession::new("src_42", "paper.pdf")),
                }),
            ],
        );
        assert!(out.contains("READY TO CHAT!"));
        assert_eq!(controller.session().unwrap().source_id(), "src_42");
    }

    #[test]
    fn reply_is_rendered_under_its_prompt() {
        let mut out = Vec::new();
        render(
            &[Notice::Reply {
                prompt: "Summarize\nbriefly".into(),
                text: "It is short.".into(),
            }],
            &mut out,
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "re: Summarize\nIt is short.\n\n"
        );
    }
}
