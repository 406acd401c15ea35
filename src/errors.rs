//! Error taxonomy shared by every public entry point.
//!
//! Verification failure is deliberately part of this enum rather than a
//! bare `bool`: the public `verify` methods return `Result<(), Error>` so
//! that callers can `.is_ok()` for the boolean outcome while malformed
//! input and a merely-rejected-but-well-formed proof stay distinguishable
//! in logs and `?`-propagation.

use thiserror::Error as ThisError;

/// Errors produced by setup, proving, or verification.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// `Setup`/`SetupGeneric` was called with an invalid range configuration.
    #[error("invalid range: {0}")]
    InvalidRange(&'static str),

    /// Two vectors that are required to have equal length did not.
    #[error("shape mismatch: expected length {expected}, got {actual}")]
    ShapeMismatch {
        /// The length every argument was expected to share.
        expected: usize,
        /// The length actually observed.
        actual: usize,
    },

    /// A Fiat-Shamir challenge was the additive identity after the bounded
    /// number of resampling attempts; recomputing with a fresh transcript
    /// nonce is the only recourse.
    #[error("derived challenge was zero after retrying")]
    ChallengeZero,

    /// The supplied randomness source failed to produce entropy.
    #[error("entropy source failed: {0}")]
    EntropyError(&'static str),

    /// The prover's secret value fell outside the interval being proven.
    #[error("value out of range")]
    OutOfRange,

    /// A proof or parameter byte-encoding was malformed.
    #[error("serialization error: {0}")]
    SerializationError(&'static str),

    /// A well-formed proof failed its verification equation.
    #[error("verification failed")]
    VerificationFailed,
}
