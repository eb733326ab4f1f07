//! SlotKV Record Generator
//!
//! Writes `insert <key> <json>` lines for loading a table through the shell,
//! or with `--db` inserts the records directly, tagged with their model kind.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use slotkv::generate::{Generator, KeyStyle, Model};
use slotkv::{SlotError, Table};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KeyKind {
    /// `<model>:<id>`
    Model,
    /// Random integer in `[1, max]`
    Int,
}

/// SlotKV record generator
#[derive(Parser, Debug)]
#[command(name = "slotkv-gen")]
#[command(about = "Generate insert commands with synthetic records")]
#[command(version)]
struct Args {
    /// Output file path
    #[arg(short, long, default_value = "generated.txt")]
    out: String,

    /// Number of lines to generate
    #[arg(short, default_value = "100")]
    n: u64,

    /// Model: client, employee, campaign, ad_platform, campaign_platform,
    /// ad_set, media_asset, video, image, ad_text, ad
    #[arg(short, long, default_value = "client")]
    model: String,

    /// Random seed (defaults to OS entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Key style
    #[arg(short, long, value_enum, default_value = "model")]
    key: KeyKind,

    /// Max value for integer keys
    #[arg(long, default_value = "100000")]
    max: u64,

    /// Insert into this table file instead of writing lines to `--out`
    #[arg(long)]
    db: Option<String>,

    /// Slot count used with `--db`
    #[arg(short, long, default_value = "5000")]
    slots: usize,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,slotkv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.n == 0 {
        eprintln!("n must be > 0");
        std::process::exit(2);
    }

    if let Err(e) = run(&args) {
        tracing::error!("Generation failed: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> slotkv::Result<()> {
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let key_style = match args.key {
        KeyKind::Model => KeyStyle::Model,
        KeyKind::Int => KeyStyle::Int { max: args.max },
    };
    let model = Model::from_name(&args.model);
    let mut generator = Generator::new(rng, key_style);

    if let Some(db) = &args.db {
        return load(&mut generator, db, args.slots, model, args.n);
    }

    let path = Path::new(&args.out);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = BufWriter::new(File::create(path)?);

    for id in 1..=args.n {
        writeln!(writer, "{}", generator.line(model, id)?)?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} {} records to {}", args.n, model.name(), path.display());
    Ok(())
}

fn load(
    generator: &mut Generator<StdRng>,
    db: &str,
    slots: usize,
    model: Model,
    n: u64,
) -> slotkv::Result<()> {
    let table = Table::open(db, slots)?;
    let mut inserted = 0u64;

    for id in 1..=n {
        match generator.load(&table, model, id) {
            Ok(_) => inserted += 1,
            Err(SlotError::KeyExists(key)) => {
                tracing::warn!("Skipping duplicate key {}", key);
            }
            Err(e) => {
                table.close()?;
                return Err(e);
            }
        }
    }
    table.close()?;

    tracing::info!("Inserted {} of {} {} records into {}", inserted, n, model.name(), db);
    Ok(())
}
