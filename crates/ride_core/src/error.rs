//! Error taxonomy for the engine.
//!
//! Everything here is a value the caller branches on; nothing is fatal at
//! process level. Two deliberate absences: an empty match result is a valid
//! outcome (a `Vec`, not an error), and an unavailable trip distance is an
//! `Option` that triggers the documented fallback estimate.

use thiserror::Error;

use crate::ecs::RideState;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Malformed input, rejected at the boundary before any state mutation.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Missing, unknown, or expired session token. Deliberately uniform so
    /// callers cannot distinguish the cases.
    #[error("unauthorized")]
    Unauthorized,

    /// OTP code wrong, already consumed, or expired. Uniform for the same
    /// reason as [CoreError::Unauthorized].
    #[error("invalid or expired code")]
    InvalidCredential,

    /// Lifecycle operation attempted from a state that forbids it.
    #[error("operation not allowed while ride is {state:?}")]
    InvalidTransition { state: RideState },

    #[error("unknown ride")]
    UnknownRide,
}
