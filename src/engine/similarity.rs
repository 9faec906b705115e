//! Name and registration similarity scoring.
//!
//! Two independent measures feed the resolver:
//!
//! - [`name_score`]: a tiered ladder over canonical names, 0-100-ish. The
//!   first matching tier wins; tiers are never summed.
//! - [`registration_similarity`]: 0.0-1.0 over parsed identifiers, falling
//!   back to a longest-common-subsequence ratio when no structural rule
//!   applies.
//!
//! ```text
//! name_score                      registration_similarity
//! ──────────                      ───────────────────────
//! equal                 -> 100    equal rendering      -> 1.0
//! all core words inside -> 95+n   one inside the other -> 0.9
//! query inside cand     -> 90+    digit bodies equal   -> 0.95
//! cand inside query     -> 80+    else max LCS ratio over
//! token overlap         -> ..60     full / digit strings
//! none                  -> 0
//! ```
//!
//! ## Design notes
//!
//! - The LCS is the one nontrivial algorithm here and determines ranking
//!   stability under formatting noise; it is the textbook O(m·n) dynamic
//!   program, kept as a full table since the inputs are short identifier
//!   strings.
//! - Length ratios count chars, not bytes, so umlauts do not skew scores.

use std::collections::HashSet;

use super::registration::RegistrationId;

/// Score how well a canonical candidate name matches a canonical query name.
///
/// Evaluated in priority order; the first matching tier decides. An empty
/// string on either side scores 0: scrape rows with no usable name cell must
/// not win through a vacuous substring tier.
pub(crate) fn name_score(query: &str, query_core_words: &[&str], candidate: &str) -> f64 {
    if query.is_empty() || candidate.is_empty() {
        return 0.0;
    }

    if query == candidate {
        return 100.0;
    }

    // Every distinguishing query word occurs inside the candidate. The count
    // rewards more specific queries.
    if !query_core_words.is_empty() && query_core_words.iter().all(|w| candidate.contains(w)) {
        return 95.0 + query_core_words.len() as f64;
    }

    let query_len = query.chars().count() as f64;
    let candidate_len = candidate.chars().count() as f64;

    if candidate.contains(query) {
        return 90.0 + 5.0 * query_len / candidate_len;
    }

    if query.contains(candidate) {
        return 80.0 + 5.0 * candidate_len / query_len;
    }

    let query_tokens: HashSet<&str> = query.split_whitespace().collect();
    let candidate_tokens: HashSet<&str> = candidate.split_whitespace().collect();
    let common = query_tokens.intersection(&candidate_tokens).count();
    if common > 0 {
        return 60.0 * common as f64 / query_tokens.len().max(candidate_tokens.len()) as f64;
    }

    0.0
}

/// Similarity of two registration identifiers in `[0, 1]`.
///
/// A missing identifier on either side scores 0.0; the caller decides what
/// absence means (see the bonus tiers in `matcher.rs`).
pub(crate) fn registration_similarity(
    a: Option<&RegistrationId>,
    b: Option<&RegistrationId>,
) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return 0.0;
    };

    let full_a = a.normalized();
    let full_b = b.normalized();

    if full_a == full_b {
        return 1.0;
    }

    if full_a.contains(&full_b) || full_b.contains(&full_a) {
        return 0.9;
    }

    // Identical numeric core under different formatting or prefix noise.
    if a.number == b.number {
        return 0.95;
    }

    let full_len = full_a.chars().count().max(full_b.chars().count());
    let full_ratio =
        if full_len > 0 { lcs_len(&full_a, &full_b) as f64 / full_len as f64 } else { 0.0 };

    let digit_len = a.number.len().max(b.number.len());
    let digit_ratio =
        if digit_len > 0 { lcs_len(&a.number, &b.number) as f64 / digit_len as f64 } else { 0.0 };

    full_ratio.max(digit_ratio)
}

/// Length of the longest common subsequence of `a` and `b`.
///
/// Standard O(m·n) recurrence: `dp[i][j] = dp[i-1][j-1] + 1` on a character
/// match, otherwise `max(dp[i-1][j], dp[i][j-1])`.
pub(crate) fn lcs_len(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut dp = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            dp[i][j] = if a[i - 1] == b[j - 1] {
                dp[i - 1][j - 1] + 1
            } else {
                dp[i - 1][j].max(dp[i][j - 1])
            };
        }
    }

    dp[a.len()][b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::canonical::{canonicalize, core_words};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn score(query_raw: &str, candidate_raw: &str) -> f64 {
        let query = canonicalize(query_raw);
        let candidate = canonicalize(candidate_raw);
        let core = core_words(&query);
        name_score(&query, &core, &candidate)
    }

    #[test]
    fn lcs_reference_cases() {
        // Array of (expected, a, b)
        let cases: Vec<(usize, &str, &str)> = vec![
            (0, "", "abc"),
            (0, "abc", ""),
            (0, "abc", "def"),
            (3, "abc", "abc"),
            (3, "abcde", "ace"),
            (4, "AGGTAB", "GXTXAYB"),
            (6, "HRB259502", "259502"),
        ];

        for (expected, a, b) in cases {
            assert_eq!(lcs_len(a, b), expected, "lcs({a:?}, {b:?})");
            assert_eq!(lcs_len(b, a), expected, "lcs({b:?}, {a:?})");
        }
    }

    #[test]
    fn name_score_tiers() {
        // Exact canonical match.
        assert!(approx(score("Acme GmbH", "Acme Gesellschaft mit beschränkter Haftung"), 100.0));

        // All core words inside the candidate: 95 + count.
        assert!(approx(score("Acme GmbH", "Acme Holding GmbH"), 96.0));
        assert!(approx(score("Acme Trading GmbH", "Acme Trading Partners AG"), 97.0));

        // Query inside candidate (only reachable when every query token is a
        // legal form): 90 + 5 * len ratio.
        assert!(approx(score("GmbH & Co. KG", "Acme GmbH & Co. KG"), 90.0 + 5.0 * 10.0 / 15.0));

        // Candidate inside query: 80 + 5 * len ratio.
        assert!(approx(score("Acme Holding GmbH", "Holding"), 80.0 + 5.0 * 7.0 / 17.0));

        // Token overlap: 60 * |common| / max(|tokens|).
        assert!(approx(score("Acme Trading GmbH", "Beta Trading AG"), 20.0));

        // Nothing shared.
        assert!(approx(score("Acme GmbH", "Zebra Logistics AG"), 0.0));
    }

    #[test]
    fn empty_names_never_score() {
        assert!(approx(name_score("", &[], "acme gmbh"), 0.0));
        assert!(approx(name_score("acme gmbh", &["acme"], ""), 0.0));
    }

    #[test]
    fn registration_similarity_tiers() {
        let parse = |s: &str| RegistrationId::parse(s).unwrap();

        // Identical canonical renderings.
        assert!(approx(
            registration_similarity(Some(&parse("HRB 259502 A")), Some(&parse("259502a"))),
            1.0
        ));

        // Suffix-only disagreement: one rendering contains the other.
        assert!(approx(
            registration_similarity(Some(&parse("HRB 259502")), Some(&parse("259502A"))),
            0.9
        ));

        // Same digit body under a different registry prefix.
        assert!(approx(
            registration_similarity(Some(&parse("VR 259502")), Some(&parse("259502"))),
            0.95
        ));

        // Unrelated numbers fall back to the best LCS ratio:
        // lcs("HRB259502", "HRB999999") = 4, max len 9.
        assert!(approx(
            registration_similarity(Some(&parse("259502")), Some(&parse("999999"))),
            4.0 / 9.0
        ));

        // A missing side scores zero.
        assert!(approx(registration_similarity(None, Some(&parse("259502"))), 0.0));
        assert!(approx(registration_similarity(Some(&parse("259502")), None), 0.0));
        assert!(approx(registration_similarity(None, None), 0.0));
    }
}
