use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::actions::TakeOfferBuilder;
use crate::core::connection::SolConnection;
use crate::core::wallet::WalletProvider;
use crate::error::{OffersSdkError, Result};
use crate::session::WalletSession;
use crate::types::Offer;

/// Take-offer flow state: `idle → selected → confirming → settled | failed`.
///
/// `Confirming` is the submitting selection; `Failed` retains the offer so
/// the UI can offer a retry without reselecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TakeState {
    Idle,
    Selected(Offer),
    Confirming(Offer),
    Settled,
    Failed(Offer),
}

impl TakeState {
    pub fn pending_offer(&self) -> Option<&Offer> {
        match self {
            TakeState::Selected(offer) | TakeState::Confirming(offer) | TakeState::Failed(offer) => {
                Some(offer)
            }
            TakeState::Idle | TakeState::Settled => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, TakeState::Confirming(_))
    }
}

/// Coordinates offer selection, the wallet-connection gate, transaction
/// construction and submission.
///
/// At most one selection exists at a time. While a take is `Confirming` the
/// selection cannot be replaced or cleared, and a second confirm is
/// rejected with [`OffersSdkError::AlreadySubmitting`], so a double-click
/// cannot submit twice. The submission runs on a detached task with no
/// lock held: neither a disconnect nor dropping the caller's future
/// cancels it, and the flow always resolves to `Settled` or `Failed`.
pub struct TakeOfferFlow {
    program_id: Pubkey,
    state: Arc<Mutex<TakeState>>,
}

impl TakeOfferFlow {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            state: Arc::new(Mutex::new(TakeState::Idle)),
        }
    }

    pub async fn state(&self) -> TakeState {
        self.state.lock().await.clone()
    }

    pub async fn pending_offer(&self) -> Option<Offer> {
        self.state.lock().await.pending_offer().cloned()
    }

    /// Select an offer to take. Selection never requires a connected
    /// wallet; gating happens at submission. Replaces a prior
    /// non-submitting selection.
    pub async fn select_offer(&self, offer: Offer) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.is_submitting() {
            return Err(OffersSdkError::AlreadySubmitting);
        }
        debug!(offer_id = %offer.id, "offer selected");
        *state = TakeState::Selected(offer);
        Ok(())
    }

    /// Drop the current selection. Valid whenever no take is in flight.
    pub async fn clear_selection(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.is_submitting() {
            return Err(OffersSdkError::AlreadySubmitting);
        }
        *state = TakeState::Idle;
        Ok(())
    }

    /// Clear a selection whose take has not started submitting; called on
    /// disconnect, since a take requires an active matching session. A
    /// `Confirming` take is left to run to completion.
    pub async fn clear_unsubmitted(&self) {
        let mut state = self.state.lock().await;
        if !state.is_submitting() {
            *state = TakeState::Idle;
        }
    }

    /// Submit the take-transaction for the current selection.
    ///
    /// Requires a selection and a connected session; `NotConnected` leaves
    /// the selection in place so the UI can prompt to connect instead of
    /// losing it. May be invoked again from `Failed` to retry.
    pub async fn confirm_take<C, W>(
        &self,
        session: &WalletSession,
        connection: Arc<C>,
        wallet: Arc<W>,
    ) -> Result<Signature>
    where
        C: SolConnection + 'static,
        W: WalletProvider + 'static,
    {
        let (offer, taker) = {
            let mut state = self.state.lock().await;
            let offer = match &*state {
                TakeState::Confirming(_) => return Err(OffersSdkError::AlreadySubmitting),
                TakeState::Selected(offer) | TakeState::Failed(offer) => offer.clone(),
                TakeState::Idle | TakeState::Settled => {
                    return Err(OffersSdkError::NothingSelected)
                }
            };
            let taker = session.require_connected().await?;
            *state = TakeState::Confirming(offer.clone());
            (offer, taker)
        };

        // Construction and submission run on a detached task with no lock
        // held: the flow keeps serving reads, and dropping the caller's
        // future detaches instead of cancelling. The task always moves the
        // state out of `Confirming`.
        let program_id = self.program_id;
        let state = Arc::clone(&self.state);
        let task = tokio::spawn(async move {
            let submitted =
                submit(program_id, &offer, taker, connection.as_ref(), wallet.as_ref()).await;

            let mut state = state.lock().await;
            match submitted {
                Ok(signature) => {
                    info!(offer_id = %offer.id, %signature, "take settled");
                    *state = TakeState::Settled;
                    Ok(signature)
                }
                Err(err) => {
                    warn!(offer_id = %offer.id, error = %err, "take failed");
                    *state = TakeState::Failed(offer);
                    Err(err)
                }
            }
        });

        task.await
            .map_err(|err| OffersSdkError::TakeOfferFailed(err.to_string()))?
    }
}

async fn submit(
    program_id: Pubkey,
    offer: &Offer,
    taker: Pubkey,
    connection: &impl SolConnection,
    wallet: &impl WalletProvider,
) -> Result<Signature> {
    let transaction = TakeOfferBuilder::new(program_id, offer)
        .with_taker(taker)
        .build_transaction(connection)
        .await
        .map_err(|err| OffersSdkError::TakeOfferFailed(err.to_string()))?;

    wallet
        .submit_transaction(transaction)
        .await
        .map_err(|err| OffersSdkError::TakeOfferFailed(err.to_string()))
}
