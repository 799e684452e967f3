//! Ordered fallback strategies
//!
//! A [`FallbackLadder`] holds labelled attempts in decreasing order of
//! capability. Climbing it runs each attempt in turn and stops at the first
//! one that reports a non-[`FallbackOutcome::Failed`] outcome. Errors raised
//! by an attempt are recorded and the climb moves on to the next rung.

use devbridge_core::prelude::*;
use devbridge_core::FallbackOutcome;

type Attempt<'a> = Box<dyn FnOnce() -> Result<FallbackOutcome> + 'a>;

struct Rung<'a, P> {
    path: P,
    attempt: Attempt<'a>,
}

/// An ordered list of strategies, each labelled with the path it represents
pub struct FallbackLadder<'a, P> {
    name: &'static str,
    rungs: Vec<Rung<'a, P>>,
}

/// Result of climbing a ladder
#[derive(Debug)]
pub struct LadderResult<P> {
    /// Outcome of the winning rung, or `Failed` when every rung failed
    pub outcome: FallbackOutcome,

    /// Path of the winning rung
    pub path: Option<P>,

    /// Errors raised by rungs that were passed over, in climb order
    pub errors: Vec<Error>,
}

impl<P> LadderResult<P> {
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    pub fn last_error(&self) -> Option<&Error> {
        self.errors.last()
    }
}

impl<'a, P: std::fmt::Debug> FallbackLadder<'a, P> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rungs: Vec::new(),
        }
    }

    /// Append a rung below the existing ones
    pub fn rung(
        mut self,
        path: P,
        attempt: impl FnOnce() -> Result<FallbackOutcome> + 'a,
    ) -> Self {
        self.rungs.push(Rung {
            path,
            attempt: Box::new(attempt),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.rungs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rungs.is_empty()
    }

    /// Run rungs top to bottom until one succeeds
    pub fn climb(self) -> LadderResult<P> {
        let mut errors = Vec::new();

        for Rung { path, attempt } in self.rungs {
            match attempt() {
                Ok(FallbackOutcome::Failed) => {
                    debug!("{}: {:?} not taken", self.name, path);
                }
                Ok(outcome) => {
                    debug!("{}: {:?} -> {}", self.name, path, outcome);
                    return LadderResult {
                        outcome,
                        path: Some(path),
                        errors,
                    };
                }
                Err(e) => {
                    if e.allows_fallback() {
                        warn!("{}: {:?} failed, falling back: {}", self.name, path, e);
                    } else {
                        error!("{}: {:?} raised unexpected error: {}", self.name, path, e);
                    }
                    errors.push(e);
                }
            }
        }

        error!("{}: all fallbacks exhausted", self.name);
        LadderResult {
            outcome: FallbackOutcome::Failed,
            path: None,
            errors,
        }
    }
}
