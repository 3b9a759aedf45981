//! Error handling for chartdraw.
//!
//! The overlay distinguishes two failure classes. Lifecycle violations
//! (using a shape or tool before its host handles are attached) are fatal
//! and surface as [`OverlayError`] at construction/attachment boundaries.
//! Out-of-domain coordinate conversions and degenerate configuration are
//! recovered locally and never become errors.

use thiserror::Error;

/// Overlay error type
///
/// Represents unrecoverable lifecycle errors in the drawing overlay.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverlayError {
    /// A host handle was required before it was attached
    #[error("{what} is not attached")]
    NotAttached {
        /// The handle that was missing (e.g. "chart", "series").
        what: &'static str,
    },

    /// Generic overlay error
    #[error("{0}")]
    Other(String),
}

impl OverlayError {
    /// Create a `NotAttached` error for the named host handle.
    pub fn not_attached(what: &'static str) -> Self {
        OverlayError::NotAttached { what }
    }

    /// Create an error from a string message.
    pub fn other(msg: impl Into<String>) -> Self {
        OverlayError::Other(msg.into())
    }
}

/// Result type using OverlayError
pub type Result<T> = std::result::Result<T, OverlayError>;
