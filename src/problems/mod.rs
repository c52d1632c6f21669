//! Benchmark problem catalogue
//!
//! Each problem module exposes several solution candidates of different
//! algorithm classes for the same computation, so the scheduler can compare
//! them across input scales.

mod problem_001;
mod problem_005;

use crate::candidate::Candidate;

/// Look up a problem by number, accepting "5", "05", or "005"
///
/// Returns the canonical zero-padded number, the problem title, and its
/// solution candidates.
pub fn candidates_for(number: &str) -> Option<(&'static str, &'static str, Vec<Candidate>)> {
    let normalized = match number.trim().parse::<u32>() {
        Ok(n) => format!("{n:03}"),
        Err(_) => return None,
    };
    match normalized.as_str() {
        "001" => Some(("001", problem_001::TITLE, problem_001::candidates())),
        "005" => Some(("005", problem_005::TITLE, problem_005::candidates())),
        _ => None,
    }
}

/// Problem numbers available in the catalogue
pub fn available() -> Vec<&'static str> {
    vec!["001", "005"]
}
