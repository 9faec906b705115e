use std::time::Duration;

use crate::engine::canonical::canonicalize;
use crate::engine::matcher::{Matcher, query_registration};
use crate::engine::metrics::{PassMetrics, RunResult};
use crate::engine::registration::RegistrationId;
use crate::error::ResolveError;

pub use crate::engine::metrics::PassMode;

/// What the caller is looking for: a raw organization name and, optionally,
/// a raw registration identifier.
///
/// Both fields are free-form; canonicalization and identifier parsing happen
/// inside the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Raw organization name, possibly misspelled or abbreviated.
    pub name: String,
    /// Raw registration identifier, if the caller knows one.
    pub registration: Option<String>,
}

impl Query {
    pub fn new(name: impl Into<String>) -> Self {
        Query { name: name.into(), registration: None }
    }

    pub fn with_registration(mut self, registration: impl Into<String>) -> Self {
        self.registration = Some(registration.into());
        self
    }
}

/// One scraped candidate row.
///
/// Rows arrive in discovery order, which matters: ties resolve to the
/// earliest row. A missing identifier is expected, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Raw name cell as scraped.
    pub name: String,
    /// Raw registration cell as scraped, if the row had one.
    pub registration: Option<String>,
}

impl Candidate {
    pub fn new(name: impl Into<String>) -> Self {
        Candidate { name: name.into(), registration: None }
    }

    pub fn with_registration(mut self, registration: impl Into<String>) -> Self {
        self.registration = Some(registration.into());
        self
    }
}

/// Options that affect resolution behavior.
#[derive(Debug, Clone)]
pub struct Options {
    /// A candidate must score strictly above this to win. The original
    /// behavior is "any positive evidence", i.e. 0.0; it was never tuned,
    /// so it is a knob rather than a constant.
    pub viability_floor: f64,
}

impl Default for Options {
    fn default() -> Self {
        Options { viability_floor: 0.0 }
    }
}

/// A winning candidate, by reference into the caller's input list.
#[derive(Debug, Clone)]
pub struct Match<'a> {
    /// Index of the winner in the input list.
    pub index: usize,
    /// The winning row itself, borrowed from the input list.
    pub candidate: &'a Candidate,
    /// Name-similarity component of the winning score.
    pub name_score: f64,
    /// Registration-bonus component of the winning score.
    pub registration_bonus: f64,
    /// The combined score that won.
    pub final_score: f64,
    /// True when the winner was decided by the name-only fallback pass.
    pub fallback: bool,
}

/// Score breakdown for one candidate, for diagnostics.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    /// Index of the candidate in the input list.
    pub index: usize,
    /// Raw candidate name (for display).
    pub name: String,
    pub name_score: f64,
    pub registration_similarity: f64,
    pub registration_bonus: f64,
    pub final_score: f64,
}

/// One scoring pass as seen by [`resolve_verbose_with`].
#[derive(Debug, Clone)]
pub struct PassSummary {
    pub mode: PassMode,
    pub duration: Duration,
    pub scores: Vec<ScoredCandidate>,
}

/// Additional details returned by [`resolve_verbose_with`].
///
/// This is meant for debugging and for the CLI report; the plain
/// [`resolve_with`] path does not build these allocations' string copies.
#[derive(Debug, Clone)]
pub struct ResolveDetails {
    /// Total elapsed time.
    pub total: Duration,
    /// Canonical form of the query name the engine actually compared.
    pub query_canonical: String,
    /// The query's registration evidence: the explicit identifier when it
    /// parsed, else a register reference extracted from the query name.
    pub query_registration: Option<RegistrationId>,
    /// True when the query supplied an identifier that failed to parse and
    /// was therefore treated as absent.
    pub query_registration_invalid: bool,
    /// One entry per scoring pass, in execution order.
    pub passes: Vec<PassSummary>,
}

/// Result from [`resolve_verbose_with`]: the outcome plus its full trace.
#[derive(Debug, Clone)]
pub struct VerboseResolution<'a> {
    pub outcome: Result<Match<'a>, ResolveError>,
    pub details: ResolveDetails,
}

/// Resolve `query` against `candidates` with default [`Options`].
///
/// # Example
/// ```
/// use orgmatch::{Candidate, Query, resolve};
///
/// let candidates = vec![
///     Candidate::new("Acme GmbH").with_registration("HRB 259502"),
///     Candidate::new("Acme Holding GmbH").with_registration("HRB 111111"),
/// ];
/// let query = Query::new("Acme Gesellschaft mit beschränkter Haftung");
///
/// let best = resolve(&query, &candidates).unwrap();
/// assert_eq!(best.index, 0);
/// ```
pub fn resolve<'a>(
    query: &Query,
    candidates: &'a [Candidate],
) -> Result<Match<'a>, ResolveError> {
    resolve_with(query, candidates, &Options::default())
}

/// Resolve `query` against `candidates` with explicit `options`.
///
/// Returns the winning candidate by reference and index into `candidates`
/// (the input list is never cloned or reordered), or a typed failure:
/// [`ResolveError::NoCandidates`] for an empty list,
/// [`ResolveError::NoMatchFound`] when nothing clears the viability floor.
pub fn resolve_with<'a>(
    query: &Query,
    candidates: &'a [Candidate],
    options: &Options,
) -> Result<Match<'a>, ResolveError> {
    if candidates.is_empty() {
        return Err(ResolveError::NoCandidates);
    }

    let result = Matcher::new(query, candidates, options).run();
    outcome(result, candidates)
}

/// Resolve like [`resolve_with`], returning the full per-candidate score
/// trace alongside the outcome. Useful for the CLI report and for debugging
/// why a scrape row did or did not win.
pub fn resolve_verbose_with<'a>(
    query: &Query,
    candidates: &'a [Candidate],
    options: &Options,
) -> VerboseResolution<'a> {
    if candidates.is_empty() {
        let (parsed, invalid) = query_registration(query);
        let details = ResolveDetails {
            total: Duration::ZERO,
            query_canonical: canonicalize(&query.name),
            query_registration: parsed,
            query_registration_invalid: invalid,
            passes: Vec::new(),
        };
        return VerboseResolution { outcome: Err(ResolveError::NoCandidates), details };
    }

    let result = Matcher::new(query, candidates, options).run();

    let details = ResolveDetails {
        total: result.metrics.total,
        query_canonical: result.query_canonical.clone(),
        query_registration: result.query_registration.clone(),
        query_registration_invalid: result.query_registration_invalid,
        passes: result.metrics.passes.iter().map(|p| pass_summary(p, candidates)).collect(),
    };

    VerboseResolution { outcome: outcome(result, candidates), details }
}

fn outcome<'a>(result: RunResult, candidates: &'a [Candidate]) -> Result<Match<'a>, ResolveError> {
    match result.winner {
        Some(w) => Ok(Match {
            index: w.index,
            candidate: &candidates[w.index],
            name_score: w.name_score,
            registration_bonus: w.registration_bonus,
            final_score: w.final_score,
            fallback: result.fallback_used,
        }),
        None => Err(ResolveError::NoMatchFound),
    }
}

fn pass_summary(pass: &PassMetrics, candidates: &[Candidate]) -> PassSummary {
    PassSummary {
        mode: pass.mode,
        duration: pass.duration,
        scores: pass
            .scores
            .iter()
            .map(|s| ScoredCandidate {
                index: s.index,
                name: candidates[s.index].name.clone(),
                name_score: s.name_score,
                registration_similarity: s.registration_similarity,
                registration_bonus: s.registration_bonus,
                final_score: s.final_score,
            })
            .collect(),
    }
}
