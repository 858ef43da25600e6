//! Error types for result-scrape
//!
//! Failures are classified so callers (and the retry layer) can tell
//! terminal outcomes apart from transient transport trouble:
//! - document-level classifications (`RollNumberNotFound`, `InvalidHtmlStructure`, ...)
//! - collaborator failures (`TokenNotFound`, `Network`)
//! - orchestrator outcomes (`RetriesExhausted`)

use thiserror::Error;

/// Result type alias for result-scrape operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for result-scrape
///
/// This is the primary error type used throughout the library. Each variant
/// corresponds to one failure classification of the scrape pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// The document carries the explicit "Kindly Check the Roll Number"
    /// marker — the identifier does not exist on the remote service.
    /// A normal terminal outcome, never retried.
    #[error("roll number does not exist")]
    RollNumberNotFound,

    /// The document parsed as HTML but its table layout does not match the
    /// expected positional structure.
    #[error("invalid HTML structure: {0}")]
    InvalidHtmlStructure(String),

    /// The response body could not be treated as a result document at all
    /// (empty or unreadable).
    #[error("document could not be parsed as HTML")]
    UnknownParsing,

    /// The identifier's programme shape is not recognized by the
    /// classification tables.
    #[error("unknown programme for roll number {roll_number}")]
    UnknownProgramme {
        /// The roll number whose programme code was unrecognized
        roll_number: String,
    },

    /// A required anti-forgery form field was missing from the token page.
    #[error("form token not found: {0}")]
    TokenNotFound(String),

    /// No result path could be resolved for the identifier.
    #[error("no result path found for roll number {0}")]
    NoResultPath(String),

    /// Retry budget exhausted for one identifier in sequential mode.
    #[error(
        "retries exhausted for roll number {roll_number} after {attempts} attempts: {last_error}"
    )]
    RetriesExhausted {
        /// The roll number that kept failing
        roll_number: String,
        /// Total attempts made (first try plus retries)
        attempts: u32,
        /// Display form of the last error observed
        last_error: String,
    },

    /// Network/transport error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A result path could not be parsed as a URL
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
