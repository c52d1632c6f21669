//! Hard wall-clock timeout enforcement for a single candidate invocation
//!
//! The candidate runs on a dedicated worker thread that races against
//! `recv_timeout` on a channel. Cancellation is preemptive, not cooperative:
//! the candidate never polls for cancellation, and a worker that misses its
//! deadline is simply abandoned (detached thread). Any partial side effects
//! performed before abandonment are undefined and not cleaned up.
//!
//! Candidate panics and candidate `Err` returns are both reported as
//! `Errored`, distinct from `TimedOut`; downstream statistics treat both as
//! an unusable trial.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Outcome of one guarded candidate invocation
#[derive(Debug)]
pub enum TrialOutcome<T> {
    /// The candidate returned within the deadline
    Completed { value: T, elapsed: Duration },
    /// The deadline elapsed first; the worker was abandoned
    TimedOut,
    /// The candidate returned an error or panicked
    Errored { message: String },
}

impl<T> TrialOutcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, TrialOutcome::Completed { .. })
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self, TrialOutcome::TimedOut)
    }
}

/// Enforces a hard wall-clock ceiling on one guarded call at a time
///
/// Not reentrant: `run` takes `&mut self`, so only one guarded call can be
/// in flight per guard instance.
#[derive(Debug)]
pub struct TimeoutGuard {
    timeout: Duration,
}

impl TimeoutGuard {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Invoke `f` under the deadline and report how it ended
    ///
    /// The elapsed time is measured on the worker thread, around the call
    /// itself, so channel latency does not pollute the sample.
    pub fn run<T, F>(&mut self, f: F) -> TrialOutcome<T>
    where
        F: FnOnce() -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let start = Instant::now();
            let outcome = catch_unwind(AssertUnwindSafe(f));
            let elapsed = start.elapsed();
            // The receiver is gone if the deadline already expired.
            let _ = tx.send((outcome, elapsed));
        });

        match rx.recv_timeout(self.timeout) {
            Ok((Ok(Ok(value)), elapsed)) => TrialOutcome::Completed { value, elapsed },
            Ok((Ok(Err(err)), _)) => TrialOutcome::Errored {
                message: err.to_string(),
            },
            Ok((Err(panic), _)) => TrialOutcome::Errored {
                message: panic_message(panic.as_ref()),
            },
            Err(mpsc::RecvTimeoutError::Timeout) => TrialOutcome::TimedOut,
            Err(mpsc::RecvTimeoutError::Disconnected) => TrialOutcome::Errored {
                message: "worker exited without reporting a result".to_string(),
            },
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("candidate panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("candidate panicked: {s}")
    } else {
        "candidate panicked".to_string()
    }
}
