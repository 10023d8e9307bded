//! Error types shared by the projection engine.

/// Error type for projection runs.
pub type Result<T> = std::result::Result<T, ProjectionError>;

/// Errors that can abort a projection run.
///
/// Degenerate projection inputs (nothing remaining, no velocity signal) are
/// not errors; they surface as `None` projections on the timeline record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    /// An input event carries a date that cannot be normalized
    #[error("Invalid date, index '{index}': '{value}'")]
    InvalidDate {
        /// Position of the offending event in the caller's sequence
        index: usize,
        /// The raw date value
        value: String,
    },

    /// The run configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The engine reached a state its own invariants rule out
    #[error("Unexpected: {0}")]
    UnexpectedState(String),
}

/// Errors produced while normalizing a date value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// The value does not match any supported date or date-time layout
    #[error("Unable to parse '{0}' as a date")]
    Unparseable(String),
}
