//! Error types for shipsplit

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the fulfillment engine
#[derive(Debug, Error)]
pub enum Error {
    /// A single rate quote failed; sibling quotes keep running
    #[error("rate quote failed: {0}")]
    RateQuote(String),

    /// A single shipment submission failed; sibling submissions keep running
    #[error("shipment submission failed: {0}")]
    Submission(String),

    /// Submission rejected with a rate-limit status; eligible for exactly one
    /// deferred batch-level retry
    #[error("submission rate limited by carrier API")]
    RateLimited,

    /// The active preset table has no entry for a capacity usage key
    #[error("preset resolution failed: {0}")]
    PresetNotFound(String),

    /// Capacity or conservation accounting failed to balance
    #[error("allocation invariant violated: {0}")]
    Invariant(String),

    /// Bad or missing configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Missing or rejected API credentials
    #[error("authentication error: {0}")]
    Auth(String),

    /// HTTP transport failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization failure
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A spawned task panicked or was cancelled before joining
    #[error("task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// A batch finished with at least one unplanned or unsubmitted order
    #[error("batch incomplete: {0}")]
    Incomplete(String),

    /// Internal logic error
    #[error("internal error: {0}")]
    Internal(String),
}
