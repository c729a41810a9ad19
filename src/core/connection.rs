use async_trait::async_trait;
use solana_sdk::account::Account;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use std::error::Error;
use std::sync::Arc;

/// On-chain read boundary.
///
/// The SDK only ever reads accounts (mint lookups for metadata) and fetches
/// a recent blockhash for transaction construction; submission goes through
/// the wallet provider, which holds the signing capability.
#[async_trait]
pub trait SolConnection: Send + Sync {
    async fn get_account(
        &self,
        pubkey: &Pubkey,
    ) -> Result<Option<Account>, Box<dyn Error + Send + Sync>>;

    async fn get_latest_blockhash(&self) -> Result<Hash, Box<dyn Error + Send + Sync>>;
}

#[async_trait]
impl<T: SolConnection + ?Sized> SolConnection for Arc<T> {
    async fn get_account(
        &self,
        pubkey: &Pubkey,
    ) -> Result<Option<Account>, Box<dyn Error + Send + Sync>> {
        self.as_ref().get_account(pubkey).await
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, Box<dyn Error + Send + Sync>> {
        self.as_ref().get_latest_blockhash().await
    }
}
