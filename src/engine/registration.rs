//! Registration-identifier parsing.
//!
//! A registry identifier names a legal entity inside one of the German
//! commercial/association registers: a typed prefix (`HRB`, `HRA`, `VR`, ...),
//! a digit body, and an optional single-letter suffix added by some register
//! courts. Callers and scrape rows format these loosely (`HRB 259502`,
//! `hrb: 259502`, `259 502 A`), so parsing normalizes everything into a
//! [`RegistrationId`] with a digits-only number.
//!
//! ## Design notes
//!
//! - Registry types are a closed enum, not strings: an unknown register is a
//!   parse miss, never a value that flows into scoring.
//! - Parsing is total over garbage: input without a 1-8 digit body yields
//!   `None`, not an error, because the caller can still resolve by name alone.
//!   [`FromStr`] wraps the same logic into a typed error for boundary code
//!   that wants to report the rejection.
//! - Suffix letters are OCR-fragile, so equality of two identifiers ignores
//!   the suffix; it participates only in similarity scoring
//!   (see `similarity.rs`).

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use thiserror::Error;

/// The register a [`RegistrationId`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryType {
    /// Handelsregister B (corporations).
    Hrb,
    /// Handelsregister A (sole traders, partnerships).
    Hra,
    /// Partnerschaftsregister.
    Pr,
    /// Genossenschaftsregister.
    Gnr,
    /// Vereinsregister.
    Vr,
    /// Güterrechtsregister.
    Gur,
    /// Europäische Wirtschaftliche Interessenvereinigung.
    Ewiv,
    /// Europäische Aktiengesellschaft.
    Se,
    /// Europäische Genossenschaft.
    Sce,
    /// Europäische Privatgesellschaft.
    Spe,
}

impl RegistryType {
    /// Canonical upper-case prefix for this register.
    pub fn as_str(self) -> &'static str {
        match self {
            RegistryType::Hrb => "HRB",
            RegistryType::Hra => "HRA",
            RegistryType::Pr => "PR",
            RegistryType::Gnr => "GNR",
            RegistryType::Vr => "VR",
            RegistryType::Gur => "GUR",
            RegistryType::Ewiv => "EWIV",
            RegistryType::Se => "SE",
            RegistryType::Sce => "SCE",
            RegistryType::Spe => "SPE",
        }
    }
}

impl fmt::Display for RegistryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognized prefixes in match order: longest first, so `SCE`/`SPE`/`EWIV`
/// never lose their tail to a shorter sibling. `GüR` keeps its umlaut spelling
/// next to the folded one.
const PREFIXES: &[(&str, RegistryType)] = &[
    ("ewiv", RegistryType::Ewiv),
    ("hrb", RegistryType::Hrb),
    ("hra", RegistryType::Hra),
    ("gnr", RegistryType::Gnr),
    ("gür", RegistryType::Gur),
    ("gur", RegistryType::Gur),
    ("sce", RegistryType::Sce),
    ("spe", RegistryType::Spe),
    ("pr", RegistryType::Pr),
    ("vr", RegistryType::Vr),
    ("se", RegistryType::Se),
];

/// A parsed, canonical registration identifier.
#[derive(Debug, Clone)]
pub struct RegistrationId {
    /// The register this identifier belongs to. Defaults to HRB when the
    /// input carried digits without a recognizable prefix.
    pub registry: RegistryType,
    /// Digit body, exactly as written (leading zeros preserved).
    pub number: String,
    /// Optional register-court suffix letter, upper-cased.
    pub suffix: Option<char>,
}

impl RegistrationId {
    /// Parse a free-form registration string.
    ///
    /// Strips one known registry prefix (case-insensitive, optionally followed
    /// by `:` and/or whitespace), removes interior whitespace, and requires
    /// the remainder to be 1-8 digits with at most one trailing letter.
    /// Anything else yields `None`.
    ///
    /// # Example
    /// ```
    /// use orgmatch::{RegistrationId, RegistryType};
    ///
    /// let id = RegistrationId::parse("hrb: 259 502 a").unwrap();
    /// assert_eq!(id.registry, RegistryType::Hrb);
    /// assert_eq!(id.number, "259502");
    /// assert_eq!(id.suffix, Some('A'));
    /// assert!(RegistrationId::parse("abc").is_none());
    /// ```
    pub fn parse(raw: &str) -> Option<RegistrationId> {
        let lower = raw.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }

        let (registry, body) = strip_registry_prefix(&lower);
        let body: String = body.chars().filter(|c| !c.is_whitespace()).collect();

        let caps = regex!(r"^([0-9]{1,8})([a-z])?$").captures(&body)?;
        let number = caps[1].to_string();
        let suffix = caps
            .get(2)
            .and_then(|m| m.as_str().chars().next())
            .map(|c| c.to_ascii_uppercase());

        Some(RegistrationId { registry: registry.unwrap_or(RegistryType::Hrb), number, suffix })
    }

    /// Find a registration reference embedded in free text.
    ///
    /// Callers sometimes hand over a name with the register number baked in
    /// ("Acme GmbH, HRB 259502"); this pulls the first such reference out.
    /// Unlike [`RegistrationId::parse`] the digit body must sit directly
    /// behind a registry prefix, so plain numbers in a name never match.
    pub fn extract(text: &str) -> Option<RegistrationId> {
        let lower = text.to_lowercase();
        let caps = regex!(
            r"\b(ewiv|hrb|hra|gnr|g[uü]r|sce|spe|pr|vr|se)\s*:?\s*([0-9]{1,8})\s*([a-z])?\b"
        )
        .captures(&lower)?;

        let registry = registry_for_prefix(caps.get(1)?.as_str())?;
        let number = caps[2].to_string();
        let suffix = caps
            .get(3)
            .and_then(|m| m.as_str().chars().next())
            .map(|c| c.to_ascii_uppercase());

        Some(RegistrationId { registry, number, suffix })
    }

    /// Canonical upper-case, whitespace-free rendering (`HRB259502A`).
    ///
    /// This is the string similarity scoring operates on.
    pub fn normalized(&self) -> String {
        match self.suffix {
            Some(suffix) => format!("{}{}{}", self.registry.as_str(), self.number, suffix),
            None => format!("{}{}", self.registry.as_str(), self.number),
        }
    }
}

fn registry_for_prefix(spelling: &str) -> Option<RegistryType> {
    PREFIXES.iter().find(|(prefix, _)| *prefix == spelling).map(|(_, registry)| *registry)
}

fn strip_registry_prefix(lower: &str) -> (Option<RegistryType>, &str) {
    for (prefix, registry) in PREFIXES {
        if let Some(rest) = lower.strip_prefix(prefix) {
            let rest = rest.trim_start();
            let rest = rest.strip_prefix(':').map(str::trim_start).unwrap_or(rest);
            return (Some(*registry), rest);
        }
    }
    (None, lower)
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized())
    }
}

// Suffix letters are formatting/OCR noise; identity is (registry, number).
impl PartialEq for RegistrationId {
    fn eq(&self, other: &Self) -> bool {
        self.registry == other.registry && self.number == other.number
    }
}

impl Eq for RegistrationId {}

impl Hash for RegistrationId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.registry.hash(state);
        self.number.hash(state);
    }
}

/// The input did not contain a parseable registration identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized registration identifier {0:?}: expected an optional registry prefix followed by 1-8 digits and at most one letter")]
pub struct ParseRegistrationError(pub String);

impl FromStr for RegistrationId {
    type Err = ParseRegistrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RegistrationId::parse(s).ok_or_else(|| ParseRegistrationError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(registry: RegistryType, number: &str, suffix: Option<char>) -> RegistrationId {
        RegistrationId { registry, number: number.to_string(), suffix }
    }

    #[test]
    fn hrb_formats_normalize_identically() {
        // Array of (input, expected)
        let cases: Vec<(&str, RegistrationId)> = vec![
            ("259502", id(RegistryType::Hrb, "259502", None)),
            ("259 502", id(RegistryType::Hrb, "259502", None)),
            ("HRB 259502", id(RegistryType::Hrb, "259502", None)),
            ("hrb: 259502", id(RegistryType::Hrb, "259502", None)),
            ("HRB : 259 502", id(RegistryType::Hrb, "259502", None)),
            ("HRB259502", id(RegistryType::Hrb, "259502", None)),
            ("259502A", id(RegistryType::Hrb, "259502", Some('A'))),
            ("HRB 259 502 A", id(RegistryType::Hrb, "259502", Some('A'))),
        ];

        for (input, expected) in cases {
            let parsed = RegistrationId::parse(input).unwrap_or_else(|| panic!("{input:?} failed"));
            assert_eq!(parsed, expected, "input: {input:?}");
            assert_eq!(parsed.suffix, expected.suffix, "suffix for input: {input:?}");
        }
    }

    #[test]
    fn every_registry_prefix_is_recognized() {
        let cases: Vec<(&str, RegistryType)> = vec![
            ("HRB 123456", RegistryType::Hrb),
            ("HRA 789012", RegistryType::Hra),
            ("PR 345678", RegistryType::Pr),
            ("GnR 901234", RegistryType::Gnr),
            ("VR 567890", RegistryType::Vr),
            ("GüR 234567", RegistryType::Gur),
            ("GUR 234567", RegistryType::Gur),
            ("EWIV 456123", RegistryType::Ewiv),
            ("SE 890567", RegistryType::Se),
            ("SCE 012345", RegistryType::Sce),
            ("SPE 678901", RegistryType::Spe),
        ];

        for (input, registry) in cases {
            let parsed = RegistrationId::parse(input).unwrap_or_else(|| panic!("{input:?} failed"));
            assert_eq!(parsed.registry, registry, "input: {input:?}");
        }
    }

    #[test]
    fn garbage_yields_no_identifier() {
        let inputs = ["abc", "", "   ", "HRB", "HRB ABC", "123456789", "259502AB", "A259502"];

        for input in inputs {
            assert!(RegistrationId::parse(input).is_none(), "input: {input:?}");
        }
    }

    #[test]
    fn extract_finds_the_first_embedded_reference() {
        let cases: Vec<(&str, RegistrationId)> = vec![
            (
                "Acme GmbH, Amtsgericht München HRB 259502",
                id(RegistryType::Hrb, "259502", None),
            ),
            ("Acme GmbH hrb: 259502a", id(RegistryType::Hrb, "259502", Some('A'))),
            ("Beta eG (GnR 123)", id(RegistryType::Gnr, "123", None)),
            ("VR 11111 Kultur e.V.", id(RegistryType::Vr, "11111", None)),
        ];

        for (input, expected) in cases {
            let found =
                RegistrationId::extract(input).unwrap_or_else(|| panic!("{input:?} failed"));
            assert_eq!(found, expected, "input: {input:?}");
            assert_eq!(found.suffix, expected.suffix, "suffix for input: {input:?}");
        }
    }

    #[test]
    fn extract_ignores_plain_numbers_and_bare_prefixes() {
        let inputs = ["Acme GmbH", "Agentur 2000 GmbH", "Acme SE", "HRB", "Nordsee 49"];

        for input in inputs {
            assert!(RegistrationId::extract(input).is_none(), "input: {input:?}");
        }
    }

    #[test]
    fn equality_ignores_suffix_but_not_registry() {
        let plain = RegistrationId::parse("HRB 259502").unwrap();
        let suffixed = RegistrationId::parse("259502A").unwrap();
        let other_registry = RegistrationId::parse("VR 259502").unwrap();

        assert_eq!(plain, suffixed);
        assert_ne!(plain, other_registry);
    }

    #[test]
    fn normalized_rendering() {
        assert_eq!(RegistrationId::parse("hrb 259 502 a").unwrap().normalized(), "HRB259502A");
        assert_eq!(RegistrationId::parse("GüR 7").unwrap().normalized(), "GUR7");
        // Leading zeros are part of the identifier.
        assert_eq!(RegistrationId::parse("SCE 012345").unwrap().normalized(), "SCE012345");
    }

    #[test]
    fn from_str_reports_the_rejected_input() {
        let err = "not-a-number".parse::<RegistrationId>().unwrap_err();
        assert_eq!(err, ParseRegistrationError("not-a-number".to_string()));

        assert!("hrb 259502".parse::<RegistrationId>().is_ok());
    }
}
