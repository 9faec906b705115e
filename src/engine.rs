//! Matching and scoring engine.
//!
//! This module is the *internal entry point* for entity resolution. The
//! public API in `src/api.rs` is a thin shell over it.
//!
//! ## How the parts work together
//!
//! Resolving a query against scraped candidate rows is a pipeline:
//!
//! ```text
//! query name ───── canonicalize          (canonical.rs)
//! query id ─────── RegistrationId::parse (registration.rs)
//!                          │
//! candidate rows ──────────┼── per-candidate preparation (same two steps)
//!                          │
//!                          v
//!                  Matcher::run (matcher.rs)
//!                    - name_score + registration_similarity (similarity.rs)
//!                    - bonus tiers, final = bonus + 0.1 * name
//!                    - select max, strict >, earliest wins ties
//!                    - one-shot name-only fallback below the floor
//!                          │
//!                          v
//!                   RunResult (metrics.rs)
//! ```
//!
//! ## Responsibilities by module
//!
//! - `canonical.rs`: legal-form folding, registry-noise stripping, core
//!   words. All static configuration data lives here.
//! - `registration.rs`: the closed registry-type enum and identifier parsing.
//! - `similarity.rs`: the name-score tier ladder and the LCS-based
//!   registration similarity.
//! - `matcher.rs`: scoring passes, bonus tiers, selection, fallback.
//! - `metrics.rs`: per-pass timing and score traces for the verbose API.
//!
//! ## Invariants
//!
//! - Everything in this module is pure and synchronous: no I/O, no shared
//!   mutable state, no retries of external operations. Concurrent callers
//!   with disjoint inputs need no coordination.
//! - Candidate order is preserved end to end; it is the tiebreaker.

#[path = "engine/canonical.rs"]
pub(crate) mod canonical;
#[path = "engine/matcher.rs"]
pub(crate) mod matcher;
#[path = "engine/metrics.rs"]
pub(crate) mod metrics;
#[path = "engine/registration.rs"]
pub(crate) mod registration;
#[path = "engine/similarity.rs"]
pub(crate) mod similarity;
