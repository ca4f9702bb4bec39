//! Error types for the Haunt core library.

use thiserror::Error;

/// Top-level error type for all Haunt operations.
///
/// Nothing in the per-tick path returns these: runtime faults degrade
/// behaviour instead. Errors surface only at load / construction time.
#[derive(Error, Debug)]
pub enum HauntError {
    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A settings field holds a value the core cannot work with.
    #[error("Invalid setting `{field}`: {reason}")]
    InvalidSettings {
        /// Which field was rejected.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// A sound event was constructed with an unusable radius or origin.
    #[error("Invalid sound event: {0}")]
    InvalidSound(String),

    /// No agent with the given ID is registered.
    #[error("Agent not found: {0}")]
    UnknownAgent(crate::AgentId),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, HauntError>;
