//! Resolver run metrics.
//!
//! A resolution is one or two scoring passes over the candidate list. These
//! structs capture what each pass computed, per candidate, plus wall-clock
//! timing, so that `resolve_verbose_with` and the CLI report can show *why*
//! a candidate won without re-deriving anything.
//!
//! Metrics are collected unconditionally: the per-candidate trace is a
//! handful of floats per scraped row, far cheaper than the scoring itself.

use std::time::Duration;

use super::registration::RegistrationId;

/// Which scoring mode a pass ran with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassMode {
    /// Registration evidence dominates; name similarity is the tiebreaker.
    Weighted,
    /// Registration evidence ignored; the bonus is fixed at zero for every
    /// candidate. Used for the one-shot name-only fallback.
    NameOnly,
}

/// Score breakdown for one candidate within one pass.
#[derive(Debug, Clone)]
pub struct CandidateScore {
    /// Index of the candidate in the caller's input list.
    pub index: usize,
    /// Name-similarity tier result.
    pub name_score: f64,
    /// Registration similarity in `[0, 1]` (0.0 when either side lacks one).
    pub registration_similarity: f64,
    /// Bonus derived from the similarity tier (or a fixed presence bonus).
    pub registration_bonus: f64,
    /// `registration_bonus + 0.1 * name_score`.
    pub final_score: f64,
}

/// Per-pass trace: mode, elapsed time, and every candidate's breakdown.
#[derive(Debug, Clone)]
pub struct PassMetrics {
    pub mode: PassMode,
    pub duration: Duration,
    pub scores: Vec<CandidateScore>,
}

/// Timing and traces for a full resolver run.
#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time including query preparation.
    pub total: Duration,
    /// One entry per scoring pass, in execution order.
    pub passes: Vec<PassMetrics>,
}

/// Resolver output bundled with its metrics.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// The winning candidate's breakdown, if any cleared the viability floor.
    pub winner: Option<CandidateScore>,
    /// True when the winner was decided by the name-only fallback pass.
    pub fallback_used: bool,
    /// Canonical form of the query name.
    pub query_canonical: String,
    /// The query's registration evidence: the explicit identifier when it
    /// parsed, else a register reference extracted from the query name.
    pub query_registration: Option<RegistrationId>,
    /// True when the query supplied an identifier that failed to parse
    /// (treated as "no identifier supplied").
    pub query_registration_invalid: bool,
    /// Timing measurements and per-pass traces.
    pub metrics: RunMetrics,
}
