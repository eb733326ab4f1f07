//! Shell executor
//!
//! Runs parsed commands against a table and writes human-readable output.

use std::fs::{self, File};
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use serde_json::value::RawValue;

use super::Command;
use crate::analyzer::{DenseZoneAnalyzer, SUMMARY_TOP_ZONES};
use crate::error::{Result, SlotError};
use crate::table::Table;

/// Kind tag for values inserted from the shell
pub const JSON_KIND: &str = "json";

pub const USAGE: &str = "\
Commands:
  select <key>
  insert <key> <json_payload>
  delete <key>
  scan
  detail <index>
  dense [threshold] [report_path]
  clear
  help
  exit | quit | q";

/// Line-oriented front end over a table
///
/// Command results go to `out`; diagnostics and failed commands go to `err`.
/// Table errors never stop the shell, only write errors on the streams do.
pub struct Shell<'a, O: Write, E: Write> {
    table: &'a Table,
    out: O,
    err: E,
    dense_threshold: usize,
}

impl<'a, O: Write, E: Write> Shell<'a, O, E> {
    pub fn new(table: &'a Table, out: O, err: E) -> Self {
        Self {
            table,
            out,
            err,
            dense_threshold: 1,
        }
    }

    /// Threshold used by `dense` when none is given on the line
    pub fn dense_threshold(mut self, threshold: usize) -> Self {
        self.dense_threshold = threshold;
        self
    }

    /// Execute one line. Returns `false` when the shell should exit.
    pub fn process_line(&mut self, line: &str) -> Result<bool> {
        let command = match Command::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(true),
            Err(e) => {
                writeln!(self.err, "{}", e)?;
                return Ok(true);
            }
        };

        if command == Command::Exit {
            return Ok(false);
        }

        if let Err(e) = self.execute(command) {
            match e {
                SlotError::KeyExists(_) => writeln!(self.err, "key exists")?,
                other => writeln!(self.err, "{}", other)?,
            }
        }
        Ok(true)
    }

    /// Run a whole session: `first` (if any), then every line of `input`
    /// until it ends or a line asks to exit.
    ///
    /// `first` comes from the command line. Its exit request is ignored, so
    /// piped input is always read. With `prompt` set it is written to `out`
    /// before each line.
    pub fn run<R: BufRead>(
        &mut self,
        first: Option<&str>,
        input: R,
        prompt: Option<&str>,
    ) -> Result<()> {
        if let Some(line) = first {
            self.process_line(line)?;
        }

        let mut lines = input.lines();
        loop {
            if let Some(prompt) = prompt {
                write!(self.out, "{}", prompt)?;
                self.out.flush()?;
            }
            let line = match lines.next() {
                Some(line) => line?,
                None => break,
            };
            if !self.process_line(&line)? {
                break;
            }
        }
        Ok(())
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Insert { key, payload } => {
                let raw: Box<RawValue> = serde_json::from_str(&payload).map_err(|e| {
                    SlotError::Command(format!("invalid json payload for key {}: {}", key, e))
                })?;
                self.table.insert(&key, JSON_KIND, &raw)?;
                writeln!(self.out, "ok")?;
            }
            Command::Select { key } => match self.table.select_envelope(&key)? {
                Some(envelope) => writeln!(self.out, "{}", envelope.raw_data())?,
                None => writeln!(self.err, "not found")?,
            },
            Command::Delete { key } => {
                if self.table.delete(&key)? {
                    writeln!(self.out, "ok")?;
                } else {
                    writeln!(self.err, "not found")?;
                }
            }
            Command::Scan => {
                let stats = self.table.stats()?;
                writeln!(self.out, "empty {}", stats.empty)?;
                writeln!(self.out, "occupied {}", stats.occupied)?;
                writeln!(self.out, "deleted {}", stats.deleted)?;
                writeln!(self.out, "total {}", stats.total)?;
            }
            Command::Detail { index } => {
                let detail = self.table.slot_detail(index)?;
                writeln!(
                    self.out,
                    "[{}] key={} type={} fingerprint=0x{:08x}",
                    detail.index, detail.key, detail.kind, detail.fingerprint
                )?;
                writeln!(self.out, "{}", detail.pretty_data()?)?;
            }
            Command::Dense { threshold, report } => {
                let threshold = threshold.unwrap_or(self.dense_threshold);
                let analysis = DenseZoneAnalyzer::new(self.table)
                    .threshold(threshold)
                    .analyze()?;

                if let Some(path) = report {
                    write_report_file(&path, |w| analysis.write_to(w))?;
                    writeln!(self.out, "report written to {}", path.display())?;
                }
                write!(self.out, "{}", analysis.summary(SUMMARY_TOP_ZONES))?;
            }
            Command::Clear => {
                self.table.clear()?;
                writeln!(self.out, "ok")?;
            }
            Command::Help => writeln!(self.err, "{}", USAGE)?,
            Command::Exit => {}
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Create `path` (and its parent directory) and hand a buffered writer to `write`
fn write_report_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = BufWriter::new(File::create(path)?);
    write(&mut writer)
}
