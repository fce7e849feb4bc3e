//! Market payload normalization.
//!
//! Each bookmaker market arrives as a key plus a flat outcome list; this
//! module turns it into zero or more two-sided snapshot rows. One-sided
//! quotes are dropped (a totals line with only an Over is meaningless),
//! unknown market keys are ignored, and a single uncoercible price skips
//! that outcome rather than the whole market.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::api::odds_api::OddsApiMarket;
use crate::models::{MarketKind, OddsSnapshot};
use crate::utils::normalize::normalize_name;

/// Normalize one bookmaker market into snapshot rows.
///
/// `home_name`/`away_name` are the odds event's team names; spreads
/// outcomes are named by team and are mapped to sides by normalized name.
pub fn extract_market_rows(
    captured_at: DateTime<Utc>,
    fixture_id: &str,
    bookmaker: &str,
    home_name: &str,
    away_name: &str,
    market: &OddsApiMarket,
) -> Vec<OddsSnapshot> {
    let Some(kind) = MarketKind::from_key(&market.key) else {
        // Unsupported market keys are provider drift, not errors.
        return Vec::new();
    };

    let row = |line: Option<f64>, side_a: f64, side_b: f64| OddsSnapshot {
        captured_at_utc: captured_at,
        fixture_id: fixture_id.to_string(),
        bookmaker: bookmaker.to_string(),
        market: kind,
        line,
        side_a_price: side_a,
        side_b_price: side_b,
    };

    match kind {
        MarketKind::Totals | MarketKind::AlternateTotals => {
            // Group over/under by line; emit one row per complete line.
            let mut by_line: BTreeMap<u64, (Option<f64>, Option<f64>)> = BTreeMap::new();
            for outcome in &market.outcomes {
                let Some(price) = coerce_finite(&outcome.price) else {
                    continue;
                };
                let Some(point) = coerce_finite(&outcome.point) else {
                    continue;
                };
                let sides = by_line.entry(point.to_bits()).or_default();
                match outcome.name.trim().to_lowercase().as_str() {
                    "over" => {
                        if sides.0.is_none() {
                            sides.0 = Some(price);
                        }
                    }
                    "under" => {
                        if sides.1.is_none() {
                            sides.1 = Some(price);
                        }
                    }
                    _ => {}
                }
            }
            by_line
                .into_iter()
                .filter_map(|(bits, sides)| match sides {
                    (Some(over), Some(under)) => Some(row(Some(f64::from_bits(bits)), over, under)),
                    _ => None,
                })
                .collect()
        }
        MarketKind::Spreads => {
            let home_norm = normalize_name(home_name);
            let away_norm = normalize_name(away_name);
            let mut home_quote: Option<(f64, Option<f64>)> = None;
            let mut away_quote: Option<(f64, Option<f64>)> = None;
            for outcome in &market.outcomes {
                let Some(price) = coerce_finite(&outcome.price) else {
                    continue;
                };
                let point = coerce_finite(&outcome.point);
                let name_norm = normalize_name(&outcome.name);
                if name_norm == home_norm && home_quote.is_none() {
                    home_quote = Some((price, point));
                } else if name_norm == away_norm && away_quote.is_none() {
                    away_quote = Some((price, point));
                }
            }
            match (home_quote, away_quote) {
                (Some((home_price, home_point)), Some((away_price, away_point))) => {
                    // The home side's point is the line, taken verbatim.
                    match home_point.or(away_point) {
                        Some(line) => vec![row(Some(line), home_price, away_price)],
                        None => Vec::new(),
                    }
                }
                _ => Vec::new(),
            }
        }
        MarketKind::Btts => {
            let mut yes_price: Option<f64> = None;
            let mut no_price: Option<f64> = None;
            for outcome in &market.outcomes {
                let Some(price) = coerce_finite(&outcome.price) else {
                    continue;
                };
                match outcome.name.trim().to_lowercase().as_str() {
                    "yes" | "y" => {
                        if yes_price.is_none() {
                            yes_price = Some(price);
                        }
                    }
                    "no" | "n" => {
                        if no_price.is_none() {
                            no_price = Some(price);
                        }
                    }
                    _ => {}
                }
            }
            match (yes_price, no_price) {
                (Some(yes), Some(no)) => vec![row(None, yes, no)],
                _ => Vec::new(),
            }
        }
    }
}

/// Coerce a raw JSON value to a finite f64. Numbers and numeric strings
/// pass; everything else (null, booleans, NaN, "abc") is a skip.
fn coerce_finite(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|x| x.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::odds_api::OddsApiOutcome;
    use crate::utils::parse_instant;
    use serde_json::json;

    fn outcome(name: &str, price: Value, point: Value) -> OddsApiOutcome {
        OddsApiOutcome {
            name: name.to_string(),
            price,
            point,
        }
    }

    fn market(key: &str, outcomes: Vec<OddsApiOutcome>) -> OddsApiMarket {
        OddsApiMarket {
            key: key.to_string(),
            outcomes,
        }
    }

    fn extract(market: &OddsApiMarket) -> Vec<OddsSnapshot> {
        extract_market_rows(
            parse_instant("2026-01-19T14:00:00Z").unwrap(),
            "100",
            "Bet1",
            "Arsenal",
            "Chelsea",
            market,
        )
    }

    #[test]
    fn test_totals_complete_line() {
        let m = market(
            "totals",
            vec![
                outcome("Over", json!(1.9), json!(2.5)),
                outcome("Under", json!(1.85), json!(2.5)),
            ],
        );
        let rows = extract(&m);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].market, MarketKind::Totals);
        assert_eq!(rows[0].line, Some(2.5));
        assert_eq!(rows[0].side_a_price, 1.9);
        assert_eq!(rows[0].side_b_price, 1.85);
    }

    #[test]
    fn test_totals_lone_over_dropped() {
        let m = market("totals", vec![outcome("Over", json!(1.9), json!(2.5))]);
        assert!(extract(&m).is_empty());
    }

    #[test]
    fn test_alternate_totals_multiple_lines() {
        let m = market(
            "alternate_totals",
            vec![
                outcome("Over", json!(2.6), json!(1.5)),
                outcome("Under", json!(1.5), json!(1.5)),
                outcome("Over", json!(1.9), json!(2.5)),
                outcome("Under", json!(1.85), json!(2.5)),
                // 3.5 has no Under: dropped
                outcome("Over", json!(1.4), json!(3.5)),
            ],
        );
        let rows = extract(&m);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, Some(1.5));
        assert_eq!(rows[1].line, Some(2.5));
        assert!(rows.iter().all(|r| r.market == MarketKind::AlternateTotals));
    }

    #[test]
    fn test_totals_bad_price_skips_outcome_only() {
        let m = market(
            "totals",
            vec![
                outcome("Over", json!("oops"), json!(2.5)),
                outcome("Under", json!(1.85), json!(2.5)),
                outcome("Over", json!(2.6), json!(1.5)),
                outcome("Under", json!(1.5), json!(1.5)),
            ],
        );
        // The broken 2.5 Over leaves that line one-sided; 1.5 survives.
        let rows = extract(&m);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].line, Some(1.5));
    }

    #[test]
    fn test_totals_numeric_string_price_coerces() {
        let m = market(
            "totals",
            vec![
                outcome("Over", json!("1.90"), json!("2.5")),
                outcome("Under", json!(1.85), json!(2.5)),
            ],
        );
        let rows = extract(&m);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].side_a_price, 1.9);
    }

    #[test]
    fn test_totals_missing_point_skips_outcome() {
        let m = market(
            "totals",
            vec![
                outcome("Over", json!(1.9), Value::Null),
                outcome("Under", json!(1.85), json!(2.5)),
            ],
        );
        assert!(extract(&m).is_empty());
    }

    #[test]
    fn test_spreads_maps_sides_and_takes_home_point() {
        let m = market(
            "spreads",
            vec![
                outcome("Chelsea", json!(2.05), json!(0.5)),
                outcome("Arsenal", json!(1.8), json!(-0.5)),
            ],
        );
        let rows = extract(&m);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].market, MarketKind::Spreads);
        // Home (Arsenal) point verbatim, not re-derived from Chelsea's.
        assert_eq!(rows[0].line, Some(-0.5));
        assert_eq!(rows[0].side_a_price, 1.8);
        assert_eq!(rows[0].side_b_price, 2.05);
    }

    #[test]
    fn test_spreads_one_sided_dropped() {
        let m = market("spreads", vec![outcome("Arsenal", json!(1.8), json!(-0.5))]);
        assert!(extract(&m).is_empty());
    }

    #[test]
    fn test_spreads_unrecognized_team_names_dropped() {
        let m = market(
            "spreads",
            vec![
                outcome("Everton", json!(1.8), json!(-0.5)),
                outcome("Fulham", json!(2.05), json!(0.5)),
            ],
        );
        assert!(extract(&m).is_empty());
    }

    #[test]
    fn test_spreads_falls_back_to_away_point() {
        let m = market(
            "spreads",
            vec![
                outcome("Arsenal", json!(1.8), Value::Null),
                outcome("Chelsea", json!(2.05), json!(0.5)),
            ],
        );
        let rows = extract(&m);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].line, Some(0.5));
    }

    #[test]
    fn test_btts_yes_no() {
        let m = market(
            "btts",
            vec![
                outcome("Yes", json!(1.8), Value::Null),
                outcome("No", json!(2.0), Value::Null),
            ],
        );
        let rows = extract(&m);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].market, MarketKind::Btts);
        assert_eq!(rows[0].line, None);
        assert_eq!(rows[0].side_a_price, 1.8);
        assert_eq!(rows[0].side_b_price, 2.0);
    }

    #[test]
    fn test_btts_short_names() {
        let m = market(
            "btts",
            vec![
                outcome("Y", json!(1.8), Value::Null),
                outcome("n", json!(2.0), Value::Null),
            ],
        );
        assert_eq!(extract(&m).len(), 1);
    }

    #[test]
    fn test_btts_one_sided_dropped() {
        let m = market("btts", vec![outcome("Yes", json!(1.8), Value::Null)]);
        assert!(extract(&m).is_empty());
    }

    #[test]
    fn test_unknown_market_key_ignored() {
        let m = market(
            "h2h",
            vec![
                outcome("Arsenal", json!(2.4), Value::Null),
                outcome("Chelsea", json!(3.0), Value::Null),
            ],
        );
        assert!(extract(&m).is_empty());
    }

    #[test]
    fn test_coerce_finite() {
        assert_eq!(coerce_finite(&json!(1.9)), Some(1.9));
        assert_eq!(coerce_finite(&json!("2.5")), Some(2.5));
        assert_eq!(coerce_finite(&json!(" 2.5 ")), Some(2.5));
        assert_eq!(coerce_finite(&Value::Null), None);
        assert_eq!(coerce_finite(&json!("two point five")), None);
        assert_eq!(coerce_finite(&json!(true)), None);
    }
}
