//! Problem 005: smallest number evenly divisible by all of 1..=n

use anyhow::bail;

use crate::candidate::{AlgorithmClass, Candidate};

pub const TITLE: &str = "Smallest multiple";

/// Trial scan upward from n, checking every divisor
pub fn solve_naive(n: u64) -> anyhow::Result<u128> {
    match n {
        0 => return Ok(0),
        1 => return Ok(1),
        _ => {}
    }
    let mut candidate = u128::from(n);
    loop {
        if (2..=n).all(|d| candidate % u128::from(d) == 0) {
            return Ok(candidate);
        }
        candidate = match candidate.checked_add(1) {
            Some(next) => next,
            None => bail!("search exceeded u128 range for n={n}"),
        };
    }
}

/// Pairwise lcm accumulated over 1..=n
pub fn solve_optimized(n: u64) -> anyhow::Result<u128> {
    if n == 0 {
        return Ok(0);
    }
    let mut result: u128 = 1;
    for d in 2..=n {
        result = lcm(result, u128::from(d), n)?;
    }
    Ok(result)
}

/// Product of the maximal prime powers not exceeding n
pub fn solve_mathematical(n: u64) -> anyhow::Result<u128> {
    if n == 0 {
        return Ok(0);
    }
    let mut result: u128 = 1;
    for p in primes_up_to(n) {
        let mut power = u128::from(p);
        while power * u128::from(p) <= u128::from(n) {
            power *= u128::from(p);
        }
        result = match result.checked_mul(power) {
            Some(r) => r,
            None => bail!("result exceeds u128 range for n={n}"),
        };
    }
    Ok(result)
}

/// Iterator fold over the same lcm recurrence
pub fn solve_builtin(n: u64) -> anyhow::Result<u128> {
    if n == 0 {
        return Ok(0);
    }
    (2..=n).try_fold(1u128, |acc, d| lcm(acc, u128::from(d), n))
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn lcm(a: u128, b: u128, n: u64) -> anyhow::Result<u128> {
    match (a / gcd(a, b)).checked_mul(b) {
        Some(result) => Ok(result),
        None => bail!("result exceeds u128 range for n={n}"),
    }
}

/// Sieve of Eratosthenes
fn primes_up_to(n: u64) -> Vec<u64> {
    if n < 2 {
        return Vec::new();
    }
    let n = n as usize;
    let mut is_prime = vec![true; n + 1];
    is_prime[0] = false;
    is_prime[1] = false;
    let mut p = 2;
    while p * p <= n {
        if is_prime[p] {
            let mut multiple = p * p;
            while multiple <= n {
                is_prime[multiple] = false;
                multiple += p;
            }
        }
        p += 1;
    }
    (2..=n).filter(|&i| is_prime[i]).map(|i| i as u64).collect()
}

pub fn candidates() -> Vec<Candidate> {
    vec![
        Candidate::new(
            "Naive solution",
            "solve_naive",
            AlgorithmClass::Naive,
            "O(lcm(1..n) * n)",
            solve_naive,
        ),
        Candidate::new(
            "Optimized solution",
            "solve_optimized",
            AlgorithmClass::Optimized,
            "O(n log n)",
            solve_optimized,
        ),
        Candidate::new(
            "Mathematical solution",
            "solve_mathematical",
            AlgorithmClass::Mathematical,
            "O(n log log n)",
            solve_mathematical,
        ),
        Candidate::new(
            "Builtin solution",
            "solve_builtin",
            AlgorithmClass::Builtin,
            "O(n log n)",
            solve_builtin,
        ),
    ]
}
