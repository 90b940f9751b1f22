// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Margin dialog hosts for the command line.
//
// The interactive host reads one command per line from stdin on the blocking
// pool; end of input dismisses the dialog. The preset host applies a fixed
// list of actions, which is what `--yes` uses.

use std::io::{BufRead, Write};

use snapfolio_core::types::MarginSide;
use snapfolio_export::{MarginAction, MarginDialog, MarginDialogHost, MarginPreview};
use tracing::warn;

const HELP: &str = "commands: <side> <mm> | <side> <0-100>% | reset | ok | cancel   (sides: top right bottom left)";

/// Either host, picked at startup.
pub enum MarginHost {
    Terminal,
    Preset(Vec<MarginAction>),
}

impl MarginHost {
    /// Confirm whatever margins the dialog opens with.
    pub fn auto_confirm() -> Self {
        Self::Preset(vec![MarginAction::Confirm])
    }
}

impl MarginDialogHost for MarginHost {
    fn present(&self, dialog: MarginDialog) {
        match self {
            Self::Terminal => {
                tokio::task::spawn_blocking(move || run_terminal(dialog));
            }
            Self::Preset(actions) => run_preset(dialog, actions),
        }
    }
}

fn run_preset(mut dialog: MarginDialog, actions: &[MarginAction]) {
    for action in actions {
        dialog.dispatch(*action);
        dialog.refresh_preview();
    }
}

fn run_terminal(mut dialog: MarginDialog) {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    println!("{HELP}");
    while !dialog.is_closed() {
        println!("{}", describe(&dialog));
        print!("margins> ");
        // A broken stdout only loses the prompt.
        let _ = std::io::stdout().flush();

        let Some(Ok(line)) = lines.next() else {
            // EOF; dropping the dialog cancels it.
            return;
        };
        match parse_command(&line) {
            Some(action) => {
                dialog.dispatch(action);
                dialog.refresh_preview();
            }
            None if line.trim().is_empty() => {}
            None => {
                warn!(input = line.trim(), "unrecognised margin command");
                println!("{HELP}");
            }
        }
    }
}

/// One status line: current margins plus the page impact.
fn describe(dialog: &MarginDialog) -> String {
    let view = dialog.view();
    let margins = MarginSide::ALL
        .iter()
        .map(|side| format!("{} {:.1}", side.label(), view.field_value(*side)))
        .collect::<Vec<_>>()
        .join("  ");
    let preview = match view.preview() {
        Some(MarginPreview::Ready { page_count, .. }) => format!("{page_count} page(s)"),
        Some(MarginPreview::Invalid { .. }) => "no room left for content".to_string(),
        None => "computing".to_string(),
    };
    format!("[{margins}] mm -> {preview}")
}

/// Parse one line of terminal input.
///
/// `<side> <mm>` sets a field value; `<side> <n>%` moves the slider.
fn parse_command(line: &str) -> Option<MarginAction> {
    let mut words = line.split_whitespace();
    let head = words.next()?.to_ascii_lowercase();
    let action = match head.as_str() {
        "ok" | "y" | "yes" | "confirm" => MarginAction::Confirm,
        "cancel" | "q" | "quit" => MarginAction::Cancel,
        "reset" => MarginAction::Reset,
        side => {
            let side = parse_side(side)?;
            let amount = words.next()?;
            match amount.strip_suffix('%') {
                Some(percent) => MarginAction::SetMarginFromSlider {
                    side,
                    position: percent.parse::<f32>().ok()? / 100.0,
                },
                None => MarginAction::SetMargin {
                    side,
                    value: amount.parse().ok()?,
                },
            }
        }
    };
    if words.next().is_some() {
        return None;
    }
    Some(action)
}

fn parse_side(word: &str) -> Option<MarginSide> {
    MarginSide::ALL
        .into_iter()
        .find(|side| side.label() == word || (word.len() == 1 && side.label().starts_with(word)))
}
