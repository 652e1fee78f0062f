//! Error types for release lookup and deprecation marking.

use crate::releases::Release;

/// Errors raised while resolving releases or decorating targets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeprecationError {
    /// Text did not match any release name or code.
    #[error("No known release '{text}'")]
    UnknownRelease {
        /// The text that failed to resolve.
        text: String,
    },

    /// The removal offset walks past the last known release.
    #[error("No known release that is {release} + {delta}")]
    OutOfRange {
        /// Release the offset was applied to.
        release: Release,
        /// Number of positions requested.
        delta: usize,
    },

    /// The marker was applied to something that is neither function-like
    /// nor constructor-like.
    #[error("deprecated can be used only with functions or constructors, not {kind} '{name}'")]
    InvalidTarget {
        /// Display name of the rejected target.
        name: String,
        /// What kind of thing it was.
        kind: String,
    },
}

/// Result type for deprecation operations.
pub type Result<T> = std::result::Result<T, DeprecationError>;
