use std::io;

use thiserror::Error;

/// Result type alias using [`NanopubError`].
pub type Result<T> = std::result::Result<T, NanopubError>;

/// Errors surfaced by the nanopublication pipeline.
///
/// Each variant is a distinct failure kind; the payload only carries detail
/// for humans. Errors are never retried inside the core.
#[derive(Debug, Error)]
pub enum NanopubError {
    /// Four-graph structure missing, ambiguous or incomplete.
    #[error("malformed nanopublication: {0}")]
    Malformed(String),

    /// RSA verification failed against the recomputed canonical bytes.
    #[error("bad signature: {0}")]
    BadSignature(String),

    /// Recomputed artifact code does not match the head-subject suffix.
    #[error("trusty URI mismatch: URI carries {expected}, content hashes to {computed}")]
    BadTrusty {
        /// Artifact code found in the head-subject.
        expected: String,
        /// Artifact code recomputed from the quads.
        computed: String,
    },

    /// `npx:hasAlgorithm` is anything other than `"RSA"`.
    #[error("unsupported signature algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Key file missing, malformed or not a valid DER/PEM encoding.
    #[error("key error: {0}")]
    Key(String),

    /// Profile YAML missing, incomplete or unreadable.
    #[error("profile error: {0}")]
    Profile(String),

    /// Assembler configuration contradicts itself or the caller's graphs.
    #[error("conflicting configuration: {0}")]
    ConflictingConfig(String),

    /// Underlying filesystem or network failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Fieldless mirror of [`NanopubError`] for branching on the failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Malformed,
    BadSignature,
    BadTrusty,
    UnsupportedAlgorithm,
    Key,
    Profile,
    ConflictingConfig,
    Io,
}

impl NanopubError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            NanopubError::Malformed(_) => ErrorKind::Malformed,
            NanopubError::BadSignature(_) => ErrorKind::BadSignature,
            NanopubError::BadTrusty { .. } => ErrorKind::BadTrusty,
            NanopubError::UnsupportedAlgorithm(_) => ErrorKind::UnsupportedAlgorithm,
            NanopubError::Key(_) => ErrorKind::Key,
            NanopubError::Profile(_) => ErrorKind::Profile,
            NanopubError::ConflictingConfig(_) => ErrorKind::ConflictingConfig,
            NanopubError::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        NanopubError::Malformed(msg.into())
    }

    pub(crate) fn conflict(msg: impl Into<String>) -> Self {
        NanopubError::ConflictingConfig(msg.into())
    }
}

impl From<serde_yaml::Error> for NanopubError {
    fn from(err: serde_yaml::Error) -> Self {
        NanopubError::Profile(err.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for NanopubError {
    fn from(err: reqwest::Error) -> Self {
        NanopubError::Io(io::Error::other(err))
    }
}
