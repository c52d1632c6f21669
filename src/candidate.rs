//! Candidate descriptors for the solution catalogue
//!
//! A candidate is one concrete implementation of a puzzle being timed,
//! tagged by algorithm class. The harness never inspects the returned
//! value's meaning, only whether the call succeeded.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Algorithm class of a candidate, used by the staged skip policy
///
/// Naive implementations become unusably slow before optimized ones, so the
/// scheduler drops classes as stage inputs grow (see
/// `StagedScheduler::should_skip`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmClass {
    /// Direct enumeration, typically unusable beyond small inputs
    Naive,
    /// Asymptotically efficient hand-written implementation
    Optimized,
    /// Closed-form or number-theoretic approach
    Mathematical,
    /// Standard-library based implementation
    Builtin,
}

impl AlgorithmClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmClass::Naive => "naive",
            AlgorithmClass::Optimized => "optimized",
            AlgorithmClass::Mathematical => "mathematical",
            AlgorithmClass::Builtin => "builtin",
        }
    }
}

impl fmt::Display for AlgorithmClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable identity of a registered candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDescriptor {
    /// Human-readable name (e.g. "Mathematical solution")
    pub name: String,
    /// Stable identifier, the implementing function's name
    pub function_name: String,
    /// Algorithm class tag consumed by the skip policy
    pub algorithm_class: AlgorithmClass,
    /// Asserted complexity class label (e.g. "O(n × log(log(n)))")
    pub complexity_class: String,
}

/// Candidate function boundary: deterministic, takes the puzzle input,
/// may fail. Closures built by the measurer carry the actual input.
pub type CandidateFn = fn(u64) -> anyhow::Result<u128>;

/// A registered candidate: descriptor plus the function to time
#[derive(Debug, Clone)]
pub struct Candidate {
    pub descriptor: CandidateDescriptor,
    pub func: CandidateFn,
}

impl Candidate {
    pub fn new(
        name: impl Into<String>,
        function_name: impl Into<String>,
        algorithm_class: AlgorithmClass,
        complexity_class: impl Into<String>,
        func: CandidateFn,
    ) -> Self {
        Self {
            descriptor: CandidateDescriptor {
                name: name.into(),
                function_name: function_name.into(),
                algorithm_class,
                complexity_class: complexity_class.into(),
            },
            func,
        }
    }
}
