// Call candidate extraction
//
// Anything that looks like `name(` inside a function body counts as a call.
// Control-flow keywords are deliberately not filtered here.

use crate::parser::scope::ScopeRange;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static CALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\s*\(").unwrap());

/// Collect call candidates from every line of `range`, in first-seen order,
/// without duplicates and without `owner` itself.
pub fn extract_calls(lines: &[&str], range: ScopeRange, owner: &str) -> Vec<String> {
    let mut calls = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for line in range.slice(lines) {
        for caps in CALL_RE.captures_iter(line) {
            let Some(name) = caps.get(1).map(|m| m.as_str()) else {
                continue;
            };
            if name == owner || !seen.insert(name) {
                continue;
            }
            calls.push(name.to_string());
        }
    }

    calls
}
