use thiserror::Error;

/// Errors surfaced by the purchasing SDK.
///
/// Every asynchronous operation resolves exactly once with either a success
/// payload or one of these kinds. The vendor queue is opaque, so underlying
/// vendor causes are carried as plain strings. Results may fan out to several
/// waiters (restore, receipt refresh), hence `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IapError {
    /// A product fetch could not be completed.
    #[error("failed to fetch products: {reason}")]
    FetchFailed { reason: String },

    /// The signature of a promotional offer is not valid base64.
    ///
    /// Carries the offending signature string verbatim.
    #[error("failed to decode offer signature as base64: {signature:?}")]
    FailedToDecodeSignature { signature: String },

    /// The vendor queue reported a failed purchase transaction.
    #[error("purchase failed: {reason}")]
    PurchaseFailed { reason: String },

    /// Restoring completed transactions failed.
    #[error("restore failed: {reason}")]
    RestoreFailed { reason: String },

    /// The vendor queue could not refresh the local receipt.
    #[error("receipt refresh failed: {reason}")]
    ReceiptRefreshFailed { reason: String },
}
