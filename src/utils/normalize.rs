//! Team name canonicalization.
//!
//! Fixture and odds providers spell the same club differently ("Arsenal FC"
//! vs "Arsenal", "Brighton & Hove Albion" vs "Brighton and Hove Albion"),
//! so every comparison in the matcher and extractor goes through
//! `normalize_name` first.

use std::collections::HashSet;

/// Club suffix tokens that carry no identity ("Arsenal FC" == "Arsenal").
const SUFFIX_TOKENS: [&str; 4] = ["fc", "afc", "cf", "sc"];

/// Canonicalize a free-text team name for comparison.
///
/// Lowercases, unifies `&` to "and", strips punctuation, drops club suffix
/// tokens and collapses whitespace. Idempotent:
/// `normalize_name(normalize_name(x)) == normalize_name(x)`.
pub fn normalize_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let unified = lowered.replace('&', " and ");
    let stripped: String = unified
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    stripped
        .split_whitespace()
        .filter(|token| !SUFFIX_TOKENS.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Word set of a normalized name, for overlap scoring.
pub fn name_tokens(name: &str) -> HashSet<String> {
    normalize_name(name)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
