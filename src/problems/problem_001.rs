//! Problem 001: sum of all multiples of 3 or 5 below a limit

use crate::candidate::{AlgorithmClass, Candidate};

pub const TITLE: &str = "Multiples of 3 and 5";

/// Direct scan of every value below the limit
pub fn solve_naive(limit: u64) -> anyhow::Result<u128> {
    let mut total: u128 = 0;
    for i in 0..limit {
        if i % 3 == 0 || i % 5 == 0 {
            total += u128::from(i);
        }
    }
    Ok(total)
}

/// Closed-form inclusion-exclusion over the three arithmetic series
pub fn solve_optimized(limit: u64) -> anyhow::Result<u128> {
    if limit == 0 {
        return Ok(0);
    }
    Ok(series_sum(3, limit) + series_sum(5, limit) - series_sum(15, limit))
}

/// Sum of multiples of `step` strictly below `limit`
fn series_sum(step: u64, limit: u64) -> u128 {
    let terms = u128::from((limit - 1) / step);
    u128::from(step) * terms * (terms + 1) / 2
}

pub fn candidates() -> Vec<Candidate> {
    vec![
        Candidate::new(
            "Naive solution",
            "solve_naive",
            AlgorithmClass::Naive,
            "O(n)",
            solve_naive,
        ),
        Candidate::new(
            "Optimized solution",
            "solve_optimized",
            AlgorithmClass::Optimized,
            "O(1)",
            solve_optimized,
        ),
    ]
}
