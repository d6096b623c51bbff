//! Interactive conflict resolution.
//!
//! Each conflict block is shown in turn and the user types a ranking of it,
//! e.g. `Fe Ti Te` or `Fe, Ti, Te`. Invalid rankings are reported and asked
//! again; `exit` or Ctrl-D abandons resolution.

use crate::error::{CliError, Result};
use crate::output::Formatter;
use oox_domain::{CategoryCode, FinalOrder, ResolutionError};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT: &str = "rank> ";

/// Resolve every block of `order` by prompting on the terminal.
pub fn resolve_interactively(order: FinalOrder, formatter: &Formatter) -> Result<Vec<CategoryCode>> {
    let mut editor = DefaultEditor::new().map_err(|e| {
        CliError::Io(std::io::Error::other(format!(
            "Failed to initialize editor: {}",
            e
        )))
    })?;

    resolve_with_input(order, formatter, |_block| loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                editor.add_history_entry(line.as_str()).ok();
                return Ok(Some(line));
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("{}", formatter.info("Type 'exit' to stop resolving"));
            }
            Err(ReadlineError::Eof) => return Ok(None),
            Err(err) => {
                return Err(CliError::Io(std::io::Error::other(err.to_string())));
            }
        }
    })
}

/// Resolve every block of `order` with lines from `read_line`.
///
/// `read_line` gets the block being ranked and returns the next input line,
/// or `None` when input ends.
pub fn resolve_with_input<F>(
    mut order: FinalOrder,
    formatter: &Formatter,
    mut read_line: F,
) -> Result<Vec<CategoryCode>>
where
    F: FnMut(&[CategoryCode]) -> Result<Option<String>>,
{
    let total = order.conflict_count();
    let mut index = 1;

    while let Some(block) = order.first_conflict().map(<[CategoryCode]>::to_vec) {
        eprintln!("{}", formatter.conflict(index, total, &block));

        let Some(line) = read_line(&block)? else {
            return Err(CliError::Cancelled);
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit" | "q") {
            return Err(CliError::Cancelled);
        }

        let ranking = match parse_ranking(line) {
            Ok(ranking) => ranking,
            Err(e) => {
                eprintln!("{}", formatter.error(&e.to_string()));
                continue;
            }
        };
        match order.resolve_next(ranking) {
            Ok(()) => index += 1,
            Err(e @ ResolutionError::NotAPermutation { .. }) => {
                eprintln!("{}", formatter.error(&e.to_string()));
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(order.into_ranking()?)
}

/// Split a typed ranking on whitespace and commas.
pub fn parse_ranking(line: &str) -> Result<Vec<CategoryCode>> {
    let codes = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(|part| CategoryCode::new(part).map_err(CliError::InvalidInput))
        .collect::<Result<Vec<_>>>()?;
    if codes.is_empty() {
        return Err(CliError::InvalidInput("Ranking is empty".to_string()));
    }
    Ok(codes)
}
