//! Resolution failure taxonomy.
//!
//! Every failure here is a recoverable outcome the application layer decides
//! how to handle (retry the upstream search, report to the user, ...). The
//! engine itself never retries I/O and never panics on bad input.

use thiserror::Error;

/// Why a resolution produced no winning candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The candidate list was empty: the upstream search produced nothing,
    /// so there was nothing to score.
    #[error("no candidates to match against")]
    NoCandidates,

    /// Candidates were scored, but none cleared the viability floor even
    /// after the name-only fallback pass.
    #[error("no candidate scored above the viability floor")]
    NoMatchFound,
}
