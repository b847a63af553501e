//! Shared error types.

use crate::types::SectionId;

/// Errors surfaced to consumers of a capability projection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The user tried to open a section that is visible but disabled.
    #[error("Insufficient permission to open {}", .section.title())]
    InsufficientPermission { section: SectionId },

    /// The section is not part of the projection at all.
    #[error("Unknown section: {0}")]
    UnknownSection(String),
}

/// Result alias for shared operations.
pub type Result<T> = std::result::Result<T, Error>;
