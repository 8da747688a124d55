//! Engine error types.
//!
//! Every failure here is non-fatal to the caller: challenge-state violations
//! are rejected results, and store failures are logged at the orchestrator
//! while the in-memory aggregate stays authoritative for the session.

use thiserror::Error;

/// Errors surfaced by the engagement engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A challenge is already active; the caller must complete or clear it first.
    #[error("a challenge is already active: {0}")]
    ChallengeAlreadyActive(String),

    /// `complete_challenge` was called with no active challenge.
    #[error("no active challenge to complete")]
    NoActiveChallenge,

    /// Unknown challenge id requested from the catalog.
    #[error("unknown challenge: {0}")]
    UnknownChallenge(String),

    /// Underlying store I/O failure.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Underlying SQLite failure.
    #[error("store database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Persisted payload failed to serialize.
    #[error("state serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
