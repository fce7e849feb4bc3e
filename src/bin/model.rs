use anyhow::Result;
use clap::Parser;

use epl_odds_tracker::devig::{devig_two_way, poisson_cdf};
use epl_odds_tracker::models::MarketKind;
use epl_odds_tracker::store::{self, FixtureStore, SnapshotStore};

/// League totals baseline: a Poisson model over finished matches, compared
/// against the de-vigged market consensus at the same line.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "data/app.db")]
    db: String,
    /// Totals line to evaluate.
    #[arg(long, default_value_t = 2.5)]
    line: f64,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let conn = store::open(&args.db)?;
    store::init_schema(&conn)?;
    let fixtures = FixtureStore::new(&conn);
    let snapshots = SnapshotStore::new(&conn);

    let scores = fixtures.finished_scores()?;
    if scores.is_empty() {
        println!("No finished matches yet");
        return Ok(());
    }

    let n = scores.len();
    let lambda = scores
        .iter()
        .map(|(home, away)| (home + away) as f64)
        .sum::<f64>()
        / n as f64;
    // P(total > line); exact for half-goal lines.
    let p_over = 1.0 - poisson_cdf(args.line.floor() as u32, lambda);

    println!("League mean total goals: {:.2} ({} finished matches)", lambda, n);
    println!("League implied P(Over {}): {:.3}", args.line, p_over);

    // Freshest quote per key at the same line, margin removed.
    let quotes: Vec<f64> = snapshots
        .latest()?
        .into_iter()
        .filter(|s| {
            matches!(s.market, MarketKind::Totals | MarketKind::AlternateTotals)
                && s.line == Some(args.line)
        })
        .filter_map(|s| devig_two_way(s.side_a_price, s.side_b_price))
        .map(|(p_over, _)| p_over)
        .collect();

    if quotes.is_empty() {
        println!("No stored totals quotes at the {} line", args.line);
    } else {
        let consensus = quotes.iter().sum::<f64>() / quotes.len() as f64;
        println!(
            "Market de-vig P(Over {}) across {} quotes: {:.3}",
            args.line,
            quotes.len(),
            consensus
        );
    }

    Ok(())
}
