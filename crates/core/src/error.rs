//! Error types for the core data model.

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised when input does not fit the data model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// Age is negative, fractional, or not a finite number.
    #[error("Invalid age: {0}")]
    InvalidAge(String),

    /// Child profile is missing a required field.
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    /// Catalog failed validation.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// A write referenced a milestone the catalog does not define.
    #[error("Unknown milestone: {area}/{milestone}")]
    UnknownMilestone {
        /// Area key
        area: String,
        /// Milestone key
        milestone: String,
    },
}
