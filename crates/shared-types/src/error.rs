use thiserror::Error;

/// Failure modes of the small fallible helpers (date and amount parsing).
///
/// These never cross the public API boundary: callers catch them and keep
/// the offending entity with `valid = false` instead of dropping it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unrecognized date format: {0:?}")]
    UnrecognizedDate(String),

    #[error("unparseable amount: {0:?}")]
    UnparseableAmount(String),

    #[error("value out of range: {0}")]
    OutOfRange(String),
}
