//! Plain-text export format.
//!
//! ```text
//! > Summarize page 1
//! Page 1 discusses X.
//!
//! > What is X?
//! !! exchange failed: timed out
//! ```
//!
//! Prompt lines carry a `> ` prefix. Reply lines follow unprefixed, and a
//! failed reply is one `!! ` line. Turns are separated by a blank line.
//! Reply lines starting with `>`, `!` or `\` get a leading `\`, as do
//! blank lines at the end of a reply so they are not read as the
//! separator. An empty reply is therefore a single `\` line.
//!
//! CRLF input is accepted when every line ends in CRLF; otherwise a `\r`
//! is kept as part of the line.

use super::{ConversationTurn, Reply};

const PROMPT_PREFIX: &str = "> ";
const FAILED_PREFIX: &str = "!! ";
const ESCAPE: char = '\\';

pub(super) fn render(turns: &[ConversationTurn]) -> String {
    let mut out = String::new();
    for (i, turn) in turns.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        for line in turn.prompt.split('\n') {
            out.push_str(PROMPT_PREFIX);
            out.push_str(line);
            out.push('\n');
        }
        match &turn.reply {
            Reply::Pending => {}
            Reply::Text(text) => {
                let lines: Vec<&str> = text.split('\n').collect();
                let trailing_blank = lines
                    .iter()
                    .rposition(|l| !is_blank(l))
                    .map_or(0, |last| last + 1);
                for (n, line) in lines.iter().enumerate() {
                    if n >= trailing_blank || line.starts_with(['>', '!', ESCAPE]) {
                        out.push(ESCAPE);
                    }
                    out.push_str(line);
                    out.push('\n');
                }
            }
            Reply::Failed(reason) => {
                out.push_str(FAILED_PREFIX);
                out.push_str(&reason.replace('\n', " "));
                out.push('\n');
            }
        }
    }
    out
}

pub(super) fn parse(text: &str) -> Vec<ConversationTurn> {
    let mut turns = Vec::new();
    let mut prompt: Option<Vec<&str>> = None;
    let mut reply: Vec<&str> = Vec::new();

    let crlf = text.contains("\r\n") && text.matches('\n').count() == text.matches("\r\n").count();
    let lines = text.split('\n').map(|l| match l.strip_suffix('\r') {
        Some(stripped) if crlf => stripped,
        _ => l,
    });

    for line in lines {
        if let Some(prompt_line) = prompt_line(line) {
            match prompt.as_mut() {
                // Consecutive prompt lines belong to one multi-line prompt.
                Some(lines) if reply.is_empty() => lines.push(prompt_line),
                _ => {
                    if let Some(lines) = prompt.take() {
                        turns.push(finish(&lines, &mut reply));
                    }
                    prompt = Some(vec![prompt_line]);
                }
            }
        } else if prompt.is_some() {
            reply.push(line);
        }
    }

    if let Some(lines) = prompt.take() {
        turns.push(finish(&lines, &mut reply));
    }
    turns
}

fn prompt_line(line: &str) -> Option<&str> {
    if line == ">" {
        return Some("");
    }
    line.strip_prefix(PROMPT_PREFIX)
}

fn finish(prompt: &[&str], reply: &mut Vec<&str>) -> ConversationTurn {
    while reply.last().is_some_and(|l| is_blank(l)) {
        reply.pop();
    }

    let parsed = match reply.as_slice() {
        [] => Reply::Pending,
        [only] if only.starts_with(FAILED_PREFIX) => {
            Reply::Failed(only[FAILED_PREFIX.len()..].to_string())
        }
        lines => Reply::Text(
            lines
                .iter()
                .map(|l| l.strip_prefix(ESCAPE).unwrap_or(*l))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
    };
    reply.clear();

    ConversationTurn::new(prompt.join("\n"), parsed)
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
