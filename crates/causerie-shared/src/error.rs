use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// The stored string does not match the canonical time format.
    #[error("Invalid stored timestamp: {0:?}")]
    InvalidTimestamp(String),
}
