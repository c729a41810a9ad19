use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// SDK-specific error types for offer operations
#[derive(Debug, Error)]
pub enum OffersSdkError {
    /// Action requires signing but no wallet session is connected
    #[error("wallet not connected")]
    NotConnected,

    /// Wallet provider rejected or errored during connect
    #[error("wallet connection failed: {0}")]
    WalletConnectionFailed(String),

    /// A take for the current selection is already in flight
    #[error("take already submitting")]
    AlreadySubmitting,

    /// Confirm was invoked without a selected offer
    #[error("no offer selected")]
    NothingSelected,

    /// Take submission was rejected by the user or errored on the ledger
    #[error("take offer failed: {0}")]
    TakeOfferFailed(String),

    /// Make-offer submission was rejected or errored
    #[error("make offer failed: {0}")]
    MakeOfferFailed(String),

    /// Indexing-service query failed after retries
    #[error("offers fetch failed: {0}")]
    OffersFetchFailed(String),

    /// Connection or RPC error
    #[error("connection error: {0}")]
    Connection(String),

    /// Account not found on-chain
    #[error("account not found: {0}")]
    AccountNotFound(Pubkey),

    /// Invalid account data or deserialization error
    #[error("invalid account data: {0}")]
    InvalidAccountData(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, OffersSdkError>;
