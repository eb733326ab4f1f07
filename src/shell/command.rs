//! Command definitions
//!
//! Parses one shell line into a command.

use std::path::PathBuf;

use crate::error::{Result, SlotError};

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Insert a JSON value; the payload is the rest of the line
    Insert { key: String, payload: String },

    /// Print the stored value for a key
    Select { key: String },

    /// Delete a key
    Delete { key: String },

    /// Print slot state counts
    Scan,

    /// Print one occupied slot
    Detail { index: usize },

    /// Dense-zone analysis, optionally writing the full report to a file
    Dense {
        threshold: Option<usize>,
        report: Option<PathBuf>,
    },

    /// Reset every slot to Empty
    Clear,

    Help,

    Exit,
}

impl Command {
    /// Parse a line
    ///
    /// Returns `Ok(None)` for blank lines and `#` comments.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (name, rest) = next_word(line);
        let command = match name {
            "exit" | "quit" | "q" => Command::Exit,
            "help" => Command::Help,
            "insert" => {
                let (key, payload) = next_word(rest);
                if key.is_empty() || payload.is_empty() {
                    return Err(SlotError::Command(
                        "insert requires <key> <json_payload>".to_string(),
                    ));
                }
                Command::Insert {
                    key: key.to_string(),
                    payload: payload.to_string(),
                }
            }
            "select" => Command::Select {
                key: required_key(rest, "select")?,
            },
            "delete" => Command::Delete {
                key: required_key(rest, "delete")?,
            },
            "scan" => Command::Scan,
            "detail" => {
                let (index, _) = next_word(rest);
                let index = index.parse().map_err(|_| {
                    SlotError::Command("detail requires a slot <index>".to_string())
                })?;
                Command::Detail { index }
            }
            "dense" => {
                let (threshold, rest) = next_word(rest);
                let (report, _) = next_word(rest);
                let threshold = match threshold {
                    "" => None,
                    value => Some(value.parse().map_err(|_| {
                        SlotError::Command(format!("invalid dense threshold: {}", value))
                    })?),
                };
                let report = (!report.is_empty()).then(|| PathBuf::from(report));
                Command::Dense { threshold, report }
            }
            "clear" => Command::Clear,
            other => {
                return Err(SlotError::Command(format!("unknown command: {}", other)));
            }
        };

        Ok(Some(command))
    }
}

/// Split off the first whitespace-delimited word
fn next_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim_start()),
        None => (s, ""),
    }
}

fn required_key(rest: &str, command: &str) -> Result<String> {
    let (key, _) = next_word(rest);
    if key.is_empty() {
        return Err(SlotError::Command(format!("{} requires <key>", command)));
    }
    Ok(key.to_string())
}
