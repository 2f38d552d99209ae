//! Error type shared across the workspace.

/// Error returned when a caller violates an input contract.
///
/// There is deliberately a single kind: length violations, malformed inputs,
/// and every key-unwrap integrity failure all surface as
/// [`Error::InvalidArgument`], so callers cannot distinguish a wrong key from
/// corrupted ciphertext.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The argument does not satisfy the documented length or format contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// Result alias used across the workspace.
pub type Result<T> = core::result::Result<T, Error>;
