use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::actions::MakeOfferBuilder;
use crate::core::config::ClientConfig;
use crate::core::connection::SolConnection;
use crate::core::indexer::OfferIndexer;
use crate::core::wallet::WalletProvider;
use crate::error::{OffersSdkError, Result};
use crate::flow::{TakeOfferFlow, TakeState};
use crate::metadata::TokenResolver;
use crate::session::{SessionState, WalletSession};
use crate::store::{OfferPage, OfferStore};
use crate::types::{Offer, TokenMetadata};

/// Facade over the offer lifecycle: one process-wide instance composes the
/// offer store, wallet session, metadata resolver and take-offer flow over
/// the injected external boundaries.
pub struct OffersClient<C, W, I> {
    config: ClientConfig,
    connection: Arc<C>,
    wallet: Arc<W>,
    indexer: I,
    resolver: TokenResolver,
    store: OfferStore,
    session: WalletSession,
    flow: TakeOfferFlow,
}

impl<C, W, I> OffersClient<C, W, I>
where
    C: SolConnection + 'static,
    W: WalletProvider + 'static,
    I: OfferIndexer,
{
    pub fn new(config: ClientConfig, connection: C, wallet: W, indexer: I) -> Self {
        let resolver = TokenResolver::from_config(&config);
        let flow = TakeOfferFlow::new(config.escrow_program_id);
        Self {
            config,
            connection: Arc::new(connection),
            wallet: Arc::new(wallet),
            indexer,
            resolver,
            store: OfferStore::new(),
            session: WalletSession::new(),
            flow,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    //=========================================================================
    // Wallet session
    //=========================================================================

    pub async fn connect_wallet(&self) -> Result<Pubkey> {
        self.session.begin_connect(Arc::clone(&self.wallet)).await
    }

    /// Adopt a provider session persisted from an earlier visit, if any.
    pub async fn adopt_provider_session(&self) -> Option<Pubkey> {
        let address = self.wallet.connected_address()?;
        self.session.observe_connected(address).await;
        Some(address)
    }

    /// Disconnect the wallet. A selection whose take has not started
    /// submitting is cleared; an in-flight take keeps running to
    /// settlement or failure.
    pub async fn disconnect_wallet(&self) {
        if let Err(err) = self.wallet.disconnect().await {
            warn!(error = %err, "wallet provider disconnect failed");
        }
        self.session.disconnect().await;
        self.flow.clear_unsubmitted().await;
    }

    pub async fn session_state(&self) -> SessionState {
        self.session.state().await
    }

    pub async fn wallet_address(&self) -> Option<Pubkey> {
        self.session.address().await
    }

    //=========================================================================
    // Offer views
    //=========================================================================

    pub async fn refresh_offers(&self) -> Result<usize> {
        self.store.refresh(&self.indexer).await
    }

    pub async fn all_offers(&self, page: usize) -> OfferPage {
        self.store.page_all(page, self.config.items_per_page).await
    }

    pub async fn open_offers(&self, page: usize) -> OfferPage {
        self.store.page_open(page, self.config.items_per_page).await
    }

    pub async fn offers_for(&self, address: &Pubkey) -> Vec<Offer> {
        self.store.for_address(address).await
    }

    /// Offers the connected wallet participates in.
    pub async fn my_offers(&self) -> Result<Vec<Offer>> {
        let address = self.session.require_connected().await?;
        Ok(self.store.for_address(&address).await)
    }

    //=========================================================================
    // Take-offer flow
    //=========================================================================

    pub async fn select_offer(&self, offer: Offer) -> Result<()> {
        self.flow.select_offer(offer).await
    }

    pub async fn clear_selection(&self) -> Result<()> {
        self.flow.clear_selection().await
    }

    pub async fn take_state(&self) -> TakeState {
        self.flow.state().await
    }

    pub async fn pending_offer(&self) -> Option<Offer> {
        self.flow.pending_offer().await
    }

    /// Submit the take-transaction for the selected offer, then schedule a
    /// store refresh. The index is eventually consistent, so the refresh
    /// is best-effort and may not observe the settlement yet.
    pub async fn confirm_take(&self) -> Result<Signature> {
        let signature = self
            .flow
            .confirm_take(
                &self.session,
                Arc::clone(&self.connection),
                Arc::clone(&self.wallet),
            )
            .await?;
        if let Err(err) = self.store.refresh(&self.indexer).await {
            warn!(error = %err, "post-settlement refresh failed, views are stale");
        }
        Ok(signature)
    }

    //=========================================================================
    // Make-offer
    //=========================================================================

    /// Create a new offer from the connected wallet.
    pub async fn make_offer(
        &self,
        id: u64,
        token_mint_a: Pubkey,
        amount_a_offered: u64,
        token_mint_b: Pubkey,
        amount_b_wanted: u64,
    ) -> Result<Signature> {
        let maker = self.session.require_connected().await?;
        let transaction = MakeOfferBuilder::new(self.config.escrow_program_id)
            .with_maker(maker)
            .with_id(id)
            .offering(token_mint_a, amount_a_offered)
            .wanting(token_mint_b, amount_b_wanted)
            .build_transaction(&self.connection)
            .await?;

        let signature = self
            .wallet
            .submit_transaction(transaction)
            .await
            .map_err(|err| OffersSdkError::MakeOfferFailed(err.to_string()))?;

        if let Err(err) = self.store.refresh(&self.indexer).await {
            warn!(error = %err, "post-make refresh failed, views are stale");
        }
        Ok(signature)
    }

    //=========================================================================
    // Token metadata
    //=========================================================================

    pub async fn token_metadata(&self, mint: Pubkey) -> TokenMetadata {
        self.resolver.resolve(&self.connection, mint).await
    }

    pub async fn token_metadata_many(&self, mints: &[Pubkey]) -> HashMap<Pubkey, TokenMetadata> {
        self.resolver.resolve_many(&self.connection, mints).await
    }
}
