//! SlotKV Shell
//!
//! Interactive or piped command shell over a table file.

use std::io::{self, IsTerminal};

use clap::Parser;
use slotkv::shell::Shell;
use slotkv::{Config, Table};
use tracing_subscriber::{fmt, EnvFilter};

/// SlotKV shell
#[derive(Parser, Debug)]
#[command(name = "slotkv")]
#[command(about = "Fixed-slot hash table key-value store")]
#[command(version)]
struct Args {
    /// Database file path
    #[arg(long, default_value = "data/db.bin")]
    db: String,

    /// Number of slots (fixed for the file)
    #[arg(short, long, default_value = "5000")]
    slots: usize,

    /// Default minimum run length for `dense`
    #[arg(short = 't', long, default_value = "1")]
    dense_threshold: usize,

    /// A command to run before reading stdin, e.g. `select client:1`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,slotkv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .path(&args.db)
        .slot_count(args.slots)
        .dense_threshold(args.dense_threshold)
        .build();

    let table = match Table::open_with_config(&config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("open: {}", e);
            std::process::exit(1);
        }
    };

    let code = match run(&table, &config, &args.command) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{}", e);
            1
        }
    };

    if let Err(e) = table.close() {
        tracing::error!("Failed to close table: {}", e);
    }
    std::process::exit(code);
}

fn run(table: &Table, config: &Config, first: &[String]) -> slotkv::Result<()> {
    let mut shell = Shell::new(table, io::stdout(), io::stderr())
        .dense_threshold(config.dense_threshold);

    let first = first.join(" ");
    let first = (!first.is_empty()).then_some(first.as_str());

    let stdin = io::stdin();
    let prompt = stdin.is_terminal().then_some("db> ");
    shell.run(first, stdin.lock(), prompt)
}
