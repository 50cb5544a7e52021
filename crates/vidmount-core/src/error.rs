//! Error types for Vidmount Core

use thiserror::Error;

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Adapter error types
#[derive(Error, Debug)]
pub enum Error {
    // Acquisition errors
    #[error("Failed to load player module: {0}")]
    ModuleLoad(String),

    #[error("Failed to load player styles: {0}")]
    StyleLoad(String),

    #[error("Failed to create player: {0}")]
    PlayerCreate(String),

    // Playback errors
    #[error("Playback request blocked: {0}")]
    PlaybackBlocked(String),

    // Errors surfaced by the wrapped player library
    #[error("Player backend error: {0}")]
    Backend(String),

    // Teardown errors
    #[error("Player disposal failed: {0}")]
    Disposal(String),

    // Reconciliation errors
    #[error("Failed to update {field}: {reason}")]
    FieldUpdate { field: &'static str, reason: String },

    // Lifecycle errors
    #[error("Invalid mount state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a per-field reconciliation error
    pub fn field(field: &'static str, source: Error) -> Self {
        Error::FieldUpdate {
            field,
            reason: source.to_string(),
        }
    }

    /// Returns true if this error is recoverable
    ///
    /// Recoverable errors are contained at the adapter boundary: they are
    /// reported and the mount keeps going. Non-recoverable errors leave the
    /// mount inert until the host re-mounts it.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::StyleLoad(_)
                | Error::PlaybackBlocked(_)
                | Error::Disposal(_)
                | Error::FieldUpdate { .. }
        )
    }

    /// Returns the error code for diagnostics
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::ModuleLoad(_) => "MODULE_LOAD",
            Error::StyleLoad(_) => "STYLE_LOAD",
            Error::PlayerCreate(_) => "PLAYER_CREATE",
            Error::PlaybackBlocked(_) => "PLAYBACK_BLOCKED",
            Error::Backend(_) => "BACKEND",
            Error::Disposal(_) => "DISPOSAL",
            Error::FieldUpdate { .. } => "FIELD_UPDATE",
            Error::InvalidStateTransition { .. } => "INVALID_STATE",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}
