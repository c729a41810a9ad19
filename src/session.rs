use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::core::wallet::WalletProvider;
use crate::error::{OffersSdkError, Result};

/// Wallet session status. The address exists if and only if the session is
/// connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected(Pubkey),
}

/// Process-wide wallet session state machine.
///
/// `disconnected → connecting → connected`, with `disconnect` back to the
/// start. A failed connect attempt returns to `disconnected` and surfaces
/// [`OffersSdkError::WalletConnectionFailed`]; there is no separate failure
/// state.
#[derive(Default)]
pub struct WalletSession {
    state: Arc<RwLock<SessionState>>,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Disconnected
    }
}

impl WalletSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn state(&self) -> SessionState {
        *self.state.read().await
    }

    pub async fn address(&self) -> Option<Pubkey> {
        match *self.state.read().await {
            SessionState::Connected(address) => Some(address),
            _ => None,
        }
    }

    /// Gate for signing actions.
    pub async fn require_connected(&self) -> Result<Pubkey> {
        self.address().await.ok_or(OffersSdkError::NotConnected)
    }

    /// Drive a connect attempt through the provider. Only valid from
    /// `Disconnected`; an already-connected session returns its address,
    /// and a concurrent attempt is rejected rather than queued.
    ///
    /// The provider call runs on a detached task: dropping this future
    /// leaves the attempt running, and the task always moves the state
    /// out of `Connecting`.
    pub async fn begin_connect<W>(&self, provider: Arc<W>) -> Result<Pubkey>
    where
        W: WalletProvider + 'static,
    {
        {
            let mut state = self.state.write().await;
            match *state {
                SessionState::Connected(address) => return Ok(address),
                SessionState::Connecting => {
                    return Err(OffersSdkError::WalletConnectionFailed(
                        "connection already in progress".to_string(),
                    ))
                }
                SessionState::Disconnected => *state = SessionState::Connecting,
            }
        }

        let state = Arc::clone(&self.state);
        let task = tokio::spawn(async move {
            match provider.connect().await {
                Ok(address) => {
                    *state.write().await = SessionState::Connected(address);
                    info!(%address, "wallet connected");
                    Ok(address)
                }
                Err(err) => {
                    *state.write().await = SessionState::Disconnected;
                    Err(OffersSdkError::WalletConnectionFailed(err.to_string()))
                }
            }
        });

        task.await
            .map_err(|err| OffersSdkError::WalletConnectionFailed(err.to_string()))?
    }

    /// Adopt an already-active provider session (e.g. session persistence)
    /// without going through `Connecting`. Idempotent: observing the same
    /// address while connected is a no-op; a different address is adopted,
    /// since the provider owns session identity.
    pub async fn observe_connected(&self, address: Pubkey) {
        let mut state = self.state.write().await;
        if *state != SessionState::Connected(address) {
            debug!(%address, "adopting provider session");
            *state = SessionState::Connected(address);
        }
    }

    /// Drop the session and its address.
    pub async fn disconnect(&self) {
        let mut state = self.state.write().await;
        if *state != SessionState::Disconnected {
            debug!("wallet disconnected");
            *state = SessionState::Disconnected;
        }
    }
}
