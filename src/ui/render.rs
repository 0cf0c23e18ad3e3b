//! Text rendering of a selection session.

use std::fmt::Write as _;

use crossterm::style::Stylize;

use crate::llm::ConfidenceTier;

use super::session::{Mode, SelectionSession};

const TITLE: &str = "  commitpick · select a commit message";
const SELECT_HELP: &str = "  ↑↓/jk navigate · 1-3 jump · Enter confirm · e edit · q abort";
const EDIT_HELP: &str = "  Enter confirm · Esc cancel edit · Ctrl+C abort";
const EDIT_CARET: char = '│';
const BODY_PREVIEW_CHARS: usize = 80;

/// Render the whole screen for `session`.
///
/// Lines are separated by `\n`; the terminal driver converts them for raw mode.
pub fn render(session: &SelectionSession) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", TITLE.bold().magenta());
    out.push('\n');

    for (idx, suggestion) in session.suggestions().iter().enumerate() {
        let rank = format!("[{}]", suggestion.rank);
        let badge = confidence_badge(suggestion.tier());

        if idx == session.cursor() {
            let _ = writeln!(
                out,
                " {} {} {}  {}",
                "▶".bold().cyan(),
                rank,
                badge,
                suggestion.message.as_str().bold().cyan()
            );
        } else {
            let _ = writeln!(
                out,
                "    {} {}  {}",
                rank.dim(),
                badge,
                suggestion.message.as_str().dim()
            );
        }
    }

    let selected = &session.suggestions()[session.cursor()];
    if !selected.reasoning.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "{}", format!("  » {}", selected.reasoning).italic().grey());
    }
    if !selected.body.is_empty() {
        let _ = writeln!(
            out,
            "{}",
            format!("  Body: {}", body_preview(&selected.body)).italic().grey()
        );
    }

    out.push('\n');

    match session.mode() {
        Mode::Edit => {
            let buffer = session.edit_buffer();
            let (before, after) = buffer.split_at(session.edit_cursor());
            let _ = writeln!(out, "{}", "  Edit message:".bold().yellow());
            let _ = writeln!(out, "{}", format!("  {before}{EDIT_CARET}{after}").magenta());
            out.push('\n');
            let _ = writeln!(out, "{}", EDIT_HELP.dark_grey());
        }
        Mode::Select => {
            let _ = writeln!(out, "{}", SELECT_HELP.dark_grey());
        }
    }

    out
}

fn confidence_badge(tier: ConfidenceTier) -> String {
    match tier {
        ConfidenceTier::High => "●● HIGH".green().to_string(),
        ConfidenceTier::Medium => "●○ MED ".yellow().to_string(),
        ConfidenceTier::Low => "○○ LOW ".red().to_string(),
    }
}

/// Single-line preview of a commit body, capped at 80 characters.
pub fn body_preview(body: &str) -> String {
    let flat = body.replace('\n', " ");
    if flat.chars().count() <= BODY_PREVIEW_CHARS {
        return flat;
    }

    let mut preview: String = flat.chars().take(BODY_PREVIEW_CHARS - 3).collect();
    preview.push_str("...");
    preview
}
