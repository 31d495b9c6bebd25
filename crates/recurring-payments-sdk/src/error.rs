use thiserror::Error;

/// Errors surfaced by the client SDK.
///
/// Account absence is never an error on the read path; nullable fetches
/// return `Option` instead. Variants here are either input validation
/// (`MissingField`, `MissingCustomInterval`), transport failures, or
/// ledger-side rejections surfaced verbatim.
#[derive(Debug, Error)]
pub enum SdkError {
    /// A required field could not be resolved from the policy account or
    /// from caller-supplied fallbacks.
    #[error("missing required field `{0}`: provide it or reference an existing payment policy")]
    MissingField(&'static str),

    /// An account that the operation depends on does not exist.
    #[error("account not found: {0}")]
    AccountNotFound(String),

    /// Fetched account bytes did not decode as the expected record type.
    #[error("invalid account data: {0}")]
    InvalidAccountData(String),

    /// Custom payment frequency was requested without an interval.
    #[error("custom payment frequency requires an interval in seconds")]
    MissingCustomInterval,

    /// Unknown payment frequency label at the boundary.
    #[error("unknown payment frequency `{0}`")]
    UnknownFrequency(String),

    /// Transport-level RPC failure (after bounded retries).
    #[error("rpc transport failure: {0}")]
    Rpc(String),

    /// The ledger rejected the transaction during simulation. Never retried.
    #[error("transaction simulation failed: {err}")]
    Simulation {
        err: String,
        logs: Vec<String>,
    },

    /// Submission was rejected. Side effects must not be assumed absent.
    #[error("transaction submission failed: {0}")]
    Submission(String),

    /// The transaction failed or never reached the requested commitment.
    #[error("transaction confirmation failed: {0}")]
    Confirmation(String),
}
