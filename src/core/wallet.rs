use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::error::Error;
use std::sync::Arc;

/// Abstraction over the user's wallet provider.
///
/// This allows the SDK to work with:
/// 1. Local keypairs (backend/CLI)
/// 2. Wallet adapters (frontend - the adapter signs and submits)
///
/// A `connect` rejection and a network failure are distinct causes but
/// equally terminal for the attempt; the SDK never retries a signed
/// submission on the caller's behalf.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Prompt the provider to establish a session; resolves to the
    /// connected address.
    async fn connect(&self) -> Result<Pubkey, Box<dyn Error + Send + Sync>>;

    /// Tear down the provider session.
    async fn disconnect(&self) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Address of an already-active session, if the provider persisted one.
    fn connected_address(&self) -> Option<Pubkey>;

    /// Sign and submit a transaction, resolving once the ledger confirms it.
    async fn submit_transaction(
        &self,
        transaction: Transaction,
    ) -> Result<Signature, Box<dyn Error + Send + Sync>>;
}

#[async_trait]
impl<T: WalletProvider + ?Sized> WalletProvider for Arc<T> {
    async fn connect(&self) -> Result<Pubkey, Box<dyn Error + Send + Sync>> {
        self.as_ref().connect().await
    }

    async fn disconnect(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.as_ref().disconnect().await
    }

    fn connected_address(&self) -> Option<Pubkey> {
        self.as_ref().connected_address()
    }

    async fn submit_transaction(
        &self,
        transaction: Transaction,
    ) -> Result<Signature, Box<dyn Error + Send + Sync>> {
        self.as_ref().submit_transaction(transaction).await
    }
}
