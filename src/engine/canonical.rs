//! Organization-name canonicalization.
//!
//! Scraped result rows spell the same legal entity many ways: full legal-form
//! phrases vs abbreviations ("Gesellschaft mit beschränkter Haftung" vs
//! "GmbH"), diacritics vs ASCII-folded text, and registry fragments leaking
//! into the name cell ("Acme GmbH, Amtsgericht München HRB 259502"). This
//! module reduces a raw name to a canonical form so that two names refer to
//! the same entity iff their canonical strings are identical.
//!
//! The pipeline, in order:
//!
//! ```text
//! raw ── lowercase + trim
//!     ── legal-form folding        (ordered substring table, longest first)
//!     ── registry-noise removal    (prefix+digits references, court words)
//!     ── punctuation -> space, whitespace collapse, trim
//! ```
//!
//! ## Design notes
//!
//! - Folding is literal substring replacement, not tokenization: legal-form
//!   phrases routinely appear mid-string attached to punctuation.
//! - The fold table is ordered longest-phrase-first so that
//!   "europäische aktiengesellschaft" becomes `se` before the bare
//!   "aktiengesellschaft" entry can turn it into `europäische ag`.
//! - Bare registry-type tokens are only stripped when they cannot collide
//!   with a legal form or a real word: `se`, `ewiv`, `pr`, `vr` all occur in
//!   legitimate names, so those are removed only as part of a
//!   prefix-plus-digits registry reference.
//! - Everything here is pure and deterministic; `canonicalize` is idempotent.

/// Ordered legal-form fold table: full phrase -> canonical abbreviation.
///
/// Every diacritic phrase carries its transliterated (`ae`/`ue`) and
/// accent-stripped (`a`/`u`) twins so scrape text survives whatever the
/// upstream encoder did to umlauts.
const LEGAL_FORM_FOLDS: &[(&str, &str)] = &[
    ("europäische wirtschaftliche interessenvereinigung", "ewiv"),
    ("europaeische wirtschaftliche interessenvereinigung", "ewiv"),
    ("europaische wirtschaftliche interessenvereinigung", "ewiv"),
    ("gesellschaft mit beschränkter haftung", "gmbh"),
    ("gesellschaft mit beschraenkter haftung", "gmbh"),
    ("gesellschaft mit beschrankter haftung", "gmbh"),
    ("kommanditgesellschaft auf aktien", "kgaa"),
    ("gesellschaft bürgerlichen rechts", "gbr"),
    ("gesellschaft buergerlichen rechts", "gbr"),
    ("gesellschaft burgerlichen rechts", "gbr"),
    ("europäische aktiengesellschaft", "se"),
    ("europaeische aktiengesellschaft", "se"),
    ("europaische aktiengesellschaft", "se"),
    ("europäische genossenschaft", "sce"),
    ("europaeische genossenschaft", "sce"),
    ("europaische genossenschaft", "sce"),
    ("eingetragene genossenschaft", "eg"),
    ("partnerschaftsgesellschaft", "partg"),
    ("offene handelsgesellschaft", "ohg"),
    ("eingetragener kaufmann", "ek"),
    ("eingetragene kauffrau", "ek"),
    ("unternehmergesellschaft", "ug"),
    ("eingetragener verein", "ev"),
    ("kommanditgesellschaft", "kg"),
    ("aktiengesellschaft", "ag"),
];

/// Canonical legal-form abbreviations, excluded from a name's core words.
const LEGAL_FORM_ABBREVIATIONS: &[&str] = &[
    "ag", "co", "eg", "ek", "ev", "ewiv", "gbr", "gmbh", "kg", "kgaa", "mbh", "ohg", "partg",
    "sce", "se", "spe", "ug",
];

/// Reduce a raw organization name to its canonical form.
///
/// Two names denote the same entity iff their canonical forms are equal.
/// Canonicalizing an already-canonical name returns it unchanged.
///
/// # Example
/// ```
/// use orgmatch::canonicalize;
///
/// assert_eq!(canonicalize("Acme Aktiengesellschaft"), canonicalize("Acme AG"));
/// assert_eq!(canonicalize("Acme GmbH, Amtsgericht München HRB 259502"), "acme gmbh münchen");
/// ```
pub fn canonicalize(raw: &str) -> String {
    let mut name = raw.trim().to_lowercase();

    for (phrase, abbrev) in LEGAL_FORM_FOLDS {
        if name.contains(phrase) {
            name = name.replace(phrase, abbrev);
        }
    }

    // Registry references attached to a digit body, for every registry type.
    let name = regex!(r"\b(?:ewiv|hrb|hra|gnr|g[uü]r|sce|spe|pr|vr|se)\s*:?\s*[0-9]{1,8}(?:\s*[a-z])?\b")
        .replace_all(&name, " ");
    // Bare court/registry words that never collide with a legal form.
    let name = regex!(r"\b(?:amtsgericht|handelsregister|commercial register|register|hrb|hra|gnr)\b")
        .replace_all(&name, " ");

    let name = regex!(r"[^\w\s]").replace_all(&name, " ");
    let name = regex!(r"\s+").replace_all(&name, " ");
    name.trim().to_string()
}

/// Whitespace tokens of a canonical name, minus legal-form abbreviations.
///
/// These are the tokens that actually distinguish one organization from
/// another; "gmbh" matches half the register and carries no signal.
pub(crate) fn core_words(canonical: &str) -> Vec<&str> {
    canonical.split_whitespace().filter(|w| !is_legal_form(w)).collect()
}

/// True if `token` is a known legal-form abbreviation.
pub(crate) fn is_legal_form(token: &str) -> bool {
    LEGAL_FORM_ABBREVIATIONS.contains(&token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_form_folding() {
        // Array of (expected_canonical, input)
        let cases: Vec<(&str, &str)> = vec![
            ("acme ag", "Acme AG"),
            ("acme ag", "Acme Aktiengesellschaft"),
            ("acme ag", "ACME AKTIENGESELLSCHAFT"),
            ("muster gmbh", "Muster Gesellschaft mit beschränkter Haftung"),
            ("muster gmbh", "Muster Gesellschaft mit beschraenkter Haftung"),
            ("muster gmbh", "Muster Gesellschaft mit beschrankter Haftung"),
            ("muster gmbh", "Muster GmbH"),
            ("nord se", "Nord Europäische Aktiengesellschaft"),
            ("nord se", "Nord Europaeische Aktiengesellschaft"),
            ("alpha beta kgaa", "Alpha Beta Kommanditgesellschaft auf Aktien"),
            ("gamma kg", "Gamma Kommanditgesellschaft"),
            ("delta ewiv", "Delta Europäische Wirtschaftliche Interessenvereinigung"),
            ("weber ohg", "Weber Offene Handelsgesellschaft"),
            ("kultur ev", "Kultur eingetragener Verein"),
            ("agrar eg", "Agrar eingetragene Genossenschaft"),
            ("schmidt partg", "Schmidt Partnerschaftsgesellschaft"),
            ("huber gbr", "Huber Gesellschaft bürgerlichen Rechts"),
            ("innova ug", "Innova Unternehmergesellschaft"),
        ];

        for (expected, input) in cases {
            assert_eq!(canonicalize(input), expected, "input: {input:?}");
        }
    }

    #[test]
    fn registry_noise_is_stripped() {
        let cases: Vec<(&str, &str)> = vec![
            ("acme gmbh münchen", "Acme GmbH, Amtsgericht München HRB 259502"),
            ("acme se münchen", "Acme SE, Handelsregister Amtsgericht München"),
            ("beta ag", "Beta AG (VR 11111)"),
            ("bode projects e k", "Bode Projects e. K., HRA 57863 B"),
            ("gamma gmbh", "Gamma GmbH — HRB: 123456"),
            ("delta ohg berlin", "Delta OHG, commercial register Berlin"),
        ];

        for (expected, input) in cases {
            assert_eq!(canonicalize(input), expected, "input: {input:?}");
        }
    }

    #[test]
    fn legal_forms_survive_as_tokens() {
        // Registry-type letters that double as legal forms stay in the name
        // when they are not attached to a digit body.
        assert_eq!(canonicalize("Acme SE"), "acme se");
        assert_eq!(canonicalize("Muster EWIV"), "muster ewiv");
        assert_eq!(canonicalize("PR Agentur Nord GmbH"), "pr agentur nord gmbh");
    }

    #[test]
    fn canonicalize_is_idempotent() {
        let inputs = [
            "Acme Aktiengesellschaft",
            "Müller & Söhne Gesellschaft mit beschränkter Haftung",
            "Acme GmbH, Amtsgericht München HRB 259502",
            "Bode Projects e. K.",
            "  Weird   spacing\tGmbH  ",
            "Nord Europäische Aktiengesellschaft (SE 123)",
        ];

        for input in inputs {
            let once = canonicalize(input);
            assert_eq!(canonicalize(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn core_words_exclude_legal_forms() {
        let canonical = canonicalize("Acme Holding GmbH & Co. KG");
        assert_eq!(core_words(&canonical), vec!["acme", "holding"]);

        assert!(core_words(&canonicalize("Acme SE")) == vec!["acme"]);
        assert!(core_words("gmbh").is_empty());
    }
}
