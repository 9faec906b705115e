#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
mod source;

pub use api::{
    Candidate, Match, Options, PassMode, PassSummary, Query, ResolveDetails, ScoredCandidate,
    VerboseResolution, resolve, resolve_verbose_with, resolve_with,
};
pub use engine::canonical::canonicalize;
pub use engine::registration::{ParseRegistrationError, RegistrationId, RegistryType};
pub use error::ResolveError;
pub use source::{
    CandidateSource, ResolveFromError, Retry, Selection, SourceError, resolve_from,
};
