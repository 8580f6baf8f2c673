//! Error types for the simulation engine.
//!
//! Only setup and referential failures surface as errors. Per-tick numeric
//! edge cases (degenerate bearings, vertical bisector lines, minimizers that
//! fail to improve) are recovered locally so a run always keeps advancing.

use crate::entity::PlayerId;

/// Errors that can occur while configuring or running a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A field-level configuration value is non-physical.
    #[error("invalid field configuration `{field}`: {reason}")]
    InvalidConfig {
        /// Name of the offending setting.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A player stat is non-physical.
    #[error("invalid player stat `{field}`: {reason}")]
    InvalidPlayer {
        /// Name of the offending stat.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// An operation referenced a player id that is not on the roster.
    #[error("player {0} is not registered on this field")]
    UnknownPlayer(PlayerId),

    /// Tuning constants could not be parsed.
    #[error("tuning error: {0}")]
    Tuning(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimError>;
