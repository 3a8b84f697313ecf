use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced while building a rule set. All of these are
/// construction-time failures; a scan that has started never returns
/// an `Error` and instead records per-entry problems in its result.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: globset::Error,
    },
    #[error("invalid size '{0}'")]
    InvalidSize(String),
    #[error("invalid duration '{0}'")]
    InvalidDuration(String),
    #[error("extension rule requires at least one extension")]
    EmptyExtensions,
    #[error("no filter rules provided")]
    NoRules,
}
