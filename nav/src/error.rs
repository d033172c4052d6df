use thiserror::Error;

/// Failures surfaced by the navigation core.
///
/// Nothing here is fatal: a malformed location fails the read and the
/// sidebar keeps its previous state, while a cancelled rebuild is expected
/// control flow and is discarded without being treated as an error.
#[derive(Debug, Error)]
pub enum NavError {
    /// The input could not be parsed as a URI at all.
    #[error("malformed uri: {0}")]
    MalformedUri(String),

    /// A debounced rebuild was superseded by a newer location change.
    #[error("rebuild cancelled by a newer location change")]
    RebuildCancelled,
}
