//! Collaborator seam: where candidate rows come from.
//!
//! The engine only consumes already-materialized candidate lists; producing
//! them (a browser-driven register search in the original deployment) is the
//! application layer's job. [`CandidateSource`] is that boundary as a trait,
//! and [`Retry`] reproduces the surrounding navigation behavior: live
//! searches intermittently return zero rows while the results table is still
//! loading, so the caller re-runs the search a few times with a short fixed
//! delay before giving up.
//!
//! Nothing in here performs I/O itself; implementations decide what a fetch
//! means.

use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::error::ResolveError;
use crate::{Candidate, Options, Query, resolve_with};

/// The upstream component failed to produce candidate rows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("candidate source failed: {0}")]
pub struct SourceError(pub String);

/// Produces candidate rows for a query.
///
/// Implementations may block, retry internally, or talk to anything; the
/// engine never cares. Returning an empty list is valid and means the search
/// genuinely found nothing.
pub trait CandidateSource {
    fn fetch(&mut self, query: &Query) -> Result<Vec<Candidate>, SourceError>;
}

/// Re-runs a flaky source a fixed number of times.
///
/// A fetch counts as failed when it errors *or* returns zero rows. After the
/// final attempt the last error is propagated; an empty final result is
/// returned as-is so the caller can report "no candidates" rather than a
/// transport failure.
pub struct Retry<S> {
    inner: S,
    attempts: u32,
    delay: Duration,
}

impl<S> Retry<S> {
    pub fn new(inner: S) -> Self {
        Retry { inner, attempts: 3, delay: Duration::from_secs(2) }
    }

    /// Total number of attempts (minimum 1).
    pub fn attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    /// Fixed delay between attempts.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl<S: CandidateSource> CandidateSource for Retry<S> {
    fn fetch(&mut self, query: &Query) -> Result<Vec<Candidate>, SourceError> {
        let mut last_error = None;

        for attempt in 1..=self.attempts {
            match self.inner.fetch(query) {
                Ok(rows) if !rows.is_empty() => return Ok(rows),
                Ok(_) => {
                    warn!(attempt, total = self.attempts, "candidate source returned no rows");
                    last_error = None;
                }
                Err(err) => {
                    warn!(attempt, total = self.attempts, error = %err, "candidate source failed");
                    last_error = Some(err);
                }
            }

            if attempt < self.attempts {
                thread::sleep(self.delay);
            }
        }

        match last_error {
            Some(err) => Err(err),
            None => Ok(Vec::new()),
        }
    }
}

/// Failure of the fetch-then-resolve convenience path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveFromError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Outcome of [`resolve_from`]: the fetched rows plus the winning index, so
/// the caller owns both the list and the selection.
#[derive(Debug, Clone)]
pub struct Selection {
    pub candidates: Vec<Candidate>,
    pub index: usize,
    pub final_score: f64,
    pub fallback: bool,
}

impl Selection {
    pub fn candidate(&self) -> &Candidate {
        &self.candidates[self.index]
    }
}

/// Fetch candidates from `source` and resolve `query` against them.
pub fn resolve_from<S: CandidateSource>(
    source: &mut S,
    query: &Query,
    options: &Options,
) -> Result<Selection, ResolveFromError> {
    let candidates = source.fetch(query)?;

    let (index, final_score, fallback) = {
        let best = resolve_with(query, &candidates, options)?;
        (best.index, best.final_score, best.fallback)
    };

    Ok(Selection { candidates, index, final_score, fallback })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Plays back a fixed script of fetch results.
    struct Scripted {
        responses: Vec<Result<Vec<Candidate>, SourceError>>,
        calls: usize,
    }

    impl Scripted {
        fn new(responses: Vec<Result<Vec<Candidate>, SourceError>>) -> Self {
            Scripted { responses, calls: 0 }
        }
    }

    impl CandidateSource for Scripted {
        fn fetch(&mut self, _query: &Query) -> Result<Vec<Candidate>, SourceError> {
            let response = self.responses.remove(0);
            self.calls += 1;
            response
        }
    }

    fn rows() -> Vec<Candidate> {
        vec![Candidate::new("Acme GmbH").with_registration("HRB 259502")]
    }

    #[test]
    fn retry_recovers_from_transient_failures() {
        let scripted = Scripted::new(vec![
            Err(SourceError("timeout".into())),
            Ok(Vec::new()),
            Ok(rows()),
        ]);
        let mut source = Retry::new(scripted).delay(Duration::ZERO);

        let fetched = source.fetch(&Query::new("Acme GmbH")).unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(source.inner.calls, 3);
    }

    #[test]
    fn retry_reports_empty_after_exhaustion() {
        let scripted =
            Scripted::new(vec![Ok(Vec::new()), Ok(Vec::new()), Ok(Vec::new())]);
        let mut source = Retry::new(scripted).delay(Duration::ZERO);

        assert_eq!(source.fetch(&Query::new("Acme GmbH")).unwrap(), Vec::new());
    }

    #[test]
    fn retry_propagates_the_last_error() {
        let scripted = Scripted::new(vec![
            Err(SourceError("timeout".into())),
            Err(SourceError("gone".into())),
        ]);
        let mut source = Retry::new(scripted).attempts(2).delay(Duration::ZERO);

        let err = source.fetch(&Query::new("Acme GmbH")).unwrap_err();
        assert_eq!(err, SourceError("gone".into()));
    }

    #[test]
    fn resolve_from_maps_an_empty_source_to_no_candidates() {
        let scripted = Scripted::new(vec![Ok(Vec::new())]);
        let mut source = Retry::new(scripted).attempts(1).delay(Duration::ZERO);

        let err = resolve_from(&mut source, &Query::new("Acme GmbH"), &Options::default())
            .unwrap_err();
        assert_eq!(err, ResolveFromError::Resolve(ResolveError::NoCandidates));
    }

    #[test]
    fn resolve_from_selects_out_of_the_fetched_rows() {
        let mut source = Scripted::new(vec![Ok(vec![
            Candidate::new("Acme Holding GmbH").with_registration("HRB 111111"),
            Candidate::new("Acme GmbH").with_registration("HRB 259502"),
        ])]);

        let query = Query::new("Acme GmbH").with_registration("259502");
        let selection = resolve_from(&mut source, &query, &Options::default()).unwrap();

        assert_eq!(selection.index, 1);
        assert_eq!(selection.candidate().name, "Acme GmbH");
    }
}
