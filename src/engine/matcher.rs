//! Candidate scoring and selection.
//!
//! This module is the operational core of the engine: it prepares the query
//! once, scores every candidate, and picks the winner.
//!
//! ```text
//! Query ── canonicalize + parse id ──┐
//!                                    │ per candidate:
//! Candidate rows ── canonicalize ────┼── name_score      (similarity.rs)
//!                   + parse id       ├── registration_similarity -> bonus tier
//!                                    └── final = bonus + 0.1 * name_score
//!                                    │
//!                        select max (strict >, earliest wins ties)
//!                                    │
//!                 below floor? ── one-shot name-only pass ── winner / none
//! ```
//!
//! ## Scoring weights
//!
//! The bonus dwarfs the name term: a matching registration number is
//! authoritative, while the name cell is noisy scrape output and only
//! breaks ties. An undocumented candidate starts at −50; a documented one
//! against an identifier-less query gets +100 so documented rows are
//! preferred; with identifiers on both sides the similarity tier pays
//! 1000/800/500/200/50.
//!
//! ## Fallback
//!
//! When no candidate clears the viability floor, the scoring repeats exactly
//! once with every bonus forced to zero. This rescues the case where the
//! registration evidence is useless (wrong identifier, or a candidate list
//! with no identifiers at all) but one name matches well. It is a single
//! retry, never a loop, and tie-breaking stays by input order in both passes.

use std::time::Instant;

use tracing::{debug, info, warn};

use super::canonical::{canonicalize, core_words};
use super::metrics::{CandidateScore, PassMetrics, PassMode, RunMetrics, RunResult};
use super::registration::RegistrationId;
use super::similarity::{name_score, registration_similarity};
use crate::{Candidate, Options, Query};

/// Bonus for a candidate row with no parseable identifier.
const BONUS_UNDOCUMENTED: f64 = -50.0;
/// Bonus for a documented candidate when the query supplied no identifier.
const BONUS_DOCUMENTED: f64 = 100.0;

/// One resolution run: the prepared query plus the candidate list.
///
/// Stateless between runs; everything is derived from the inputs.
pub(crate) struct Matcher<'a> {
    query_canonical: String,
    query_registration: Option<RegistrationId>,
    query_registration_invalid: bool,
    candidates: &'a [Candidate],
    viability_floor: f64,
}

/// Candidate fields derived once and reused across both passes.
struct Prepared {
    canonical: String,
    registration: Option<RegistrationId>,
}

/// Determine the query's registration evidence.
///
/// An explicit identifier wins. When none was supplied, the query name itself
/// is searched for an embedded register reference ("Acme GmbH, HRB 259502").
/// An explicit identifier that fails to parse is logged and treated as
/// absent, keeping name-only matching available.
pub(crate) fn query_registration(query: &Query) -> (Option<RegistrationId>, bool) {
    match query.registration.as_deref() {
        None => {
            let embedded = RegistrationId::extract(&query.name);
            if let Some(id) = &embedded {
                debug!(registration = %id, "using register reference embedded in the query name");
            }
            (embedded, false)
        }
        Some(raw) => match RegistrationId::parse(raw) {
            Some(id) => (Some(id), false),
            None => {
                warn!(
                    identifier = raw,
                    "query registration identifier is unparseable; matching by name only"
                );
                (None, true)
            }
        },
    }
}

impl<'a> Matcher<'a> {
    pub fn new(query: &Query, candidates: &'a [Candidate], options: &Options) -> Self {
        let (query_registration, query_registration_invalid) = query_registration(query);

        Matcher {
            query_canonical: canonicalize(&query.name),
            query_registration,
            query_registration_invalid,
            candidates,
            viability_floor: options.viability_floor,
        }
    }

    pub fn run(self) -> RunResult {
        let started = Instant::now();

        let core = core_words(&self.query_canonical);
        let prepared: Vec<Prepared> = self
            .candidates
            .iter()
            .map(|c| Prepared {
                canonical: canonicalize(&c.name),
                registration: c.registration.as_deref().and_then(RegistrationId::parse),
            })
            .collect();

        let mut metrics = RunMetrics::default();

        let primary = self.score_pass(PassMode::Weighted, &core, &prepared);
        let mut winner = self.select(&primary.scores);
        metrics.passes.push(primary);

        let mut fallback_used = false;
        if winner.is_none() {
            debug!(
                floor = self.viability_floor,
                "no candidate cleared the viability floor; retrying name-only"
            );
            let fallback = self.score_pass(PassMode::NameOnly, &core, &prepared);
            winner = self.select(&fallback.scores);
            fallback_used = winner.is_some();
            metrics.passes.push(fallback);
        }

        metrics.total = started.elapsed();

        match &winner {
            Some(w) => info!(
                index = w.index,
                candidate = %self.candidates[w.index].name,
                score = w.final_score,
                fallback = fallback_used,
                "selected best match"
            ),
            None => warn!("no suitable candidate match found"),
        }

        RunResult {
            winner,
            fallback_used,
            query_canonical: self.query_canonical,
            query_registration: self.query_registration,
            query_registration_invalid: self.query_registration_invalid,
            metrics,
        }
    }

    fn score_pass(&self, mode: PassMode, core: &[&str], prepared: &[Prepared]) -> PassMetrics {
        let started = Instant::now();

        let mut scores = Vec::with_capacity(prepared.len());
        for (index, candidate) in prepared.iter().enumerate() {
            let name = name_score(&self.query_canonical, core, &candidate.canonical);
            let similarity = registration_similarity(
                self.query_registration.as_ref(),
                candidate.registration.as_ref(),
            );
            let bonus = match mode {
                PassMode::Weighted => self.registration_bonus(candidate, similarity),
                PassMode::NameOnly => 0.0,
            };
            let final_score = bonus + 0.1 * name;

            debug!(
                index,
                name_score = name,
                registration_similarity = similarity,
                registration_bonus = bonus,
                final_score,
                "scored candidate"
            );

            scores.push(CandidateScore {
                index,
                name_score: name,
                registration_similarity: similarity,
                registration_bonus: bonus,
                final_score,
            });
        }

        PassMetrics { mode, duration: started.elapsed(), scores }
    }

    fn registration_bonus(&self, candidate: &Prepared, similarity: f64) -> f64 {
        match (&self.query_registration, &candidate.registration) {
            (_, None) => BONUS_UNDOCUMENTED,
            (None, Some(_)) => BONUS_DOCUMENTED,
            (Some(_), Some(_)) => {
                if similarity >= 0.95 {
                    1000.0
                } else if similarity >= 0.8 {
                    800.0
                } else if similarity >= 0.6 {
                    500.0
                } else if similarity >= 0.4 {
                    200.0
                } else {
                    50.0
                }
            }
        }
    }

    /// Strict `>` keeps the earliest candidate on ties, so selection is
    /// reproducible for identical inputs.
    fn select(&self, scores: &[CandidateScore]) -> Option<CandidateScore> {
        let mut best: Option<&CandidateScore> = None;
        for score in scores {
            if best.is_none_or(|b| score.final_score > b.final_score) {
                best = Some(score);
            }
        }
        best.filter(|b| b.final_score > self.viability_floor).cloned()
    }
}
