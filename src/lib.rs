//! eulerbench - adaptive staged benchmarking with regression detection
//!
//! Measures competing solution candidates for a problem across staged input
//! ranges under a global time budget, persists the run as a JSON snapshot,
//! and compares snapshots against historical baselines to flag performance
//! regressions.

pub mod candidate;
pub mod cli;
pub mod config;
pub mod error;
pub mod measure;
pub mod problems;
pub mod regression;
pub mod scheduler;
pub mod snapshot;
pub mod stats;
pub mod timeout;
