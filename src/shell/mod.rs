//! Shell Module
//!
//! Line-oriented command interface used by the `slotkv` binary.
//!
//! ## Commands
//! - `insert <key> <json>` - store a JSON value (rest of the line)
//! - `select <key>`        - print the stored JSON
//! - `delete <key>`        - leave a tombstone
//! - `scan`                - slot state counts
//! - `detail <index>`      - decode one occupied slot
//! - `dense [n] [path]`    - dense-zone summary, full report to `path`
//! - `clear`               - reset every slot
//! - `help`, `exit`

mod command;
mod executor;

pub use command::Command;
pub use executor::{Shell, JSON_KIND, USAGE};
