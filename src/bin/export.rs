use anyhow::Result;
use clap::Parser;

use epl_odds_tracker::export::{write_csv, write_json, ExportDocument};
use epl_odds_tracker::store::{self, SnapshotStore};

/// Export the latest snapshot per (fixture, bookmaker, market, line) key,
/// joined with fixture attributes, as a JSON document.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "data/app.db")]
    db: String,
    #[arg(long, default_value = "site/public/odds.json")]
    out: String,
    #[arg(long, default_value_t = 5000)]
    limit: u32,
    /// Also write the rows as CSV to this path.
    #[arg(long)]
    csv: Option<String>,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let conn = store::open(&args.db)?;
    store::init_schema(&conn)?;
    let snapshots = SnapshotStore::new(&conn);

    let rows = snapshots.latest_joined(args.limit)?;
    let document = ExportDocument::new(rows);
    let n = write_json(&document, &args.out)?;
    println!("Exported {} rows to {}", n, args.out);

    if let Some(csv_path) = args.csv {
        let n = write_csv(&document.items, &csv_path)?;
        println!("Exported {} rows to {}", n, csv_path);
    }

    Ok(())
}
