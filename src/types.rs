use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

/// An escrowed token-swap offer as reported by the indexing service.
///
/// Records are append-only on the service side: an offer is never deleted,
/// only marked `closed` once taken or cancelled. The SDK never mutates
/// `closed`/`taker` locally; they only change through a fresh fetch after a
/// settling transaction confirms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer {
    /// Stable identifier assigned by the indexing service
    pub id: String,

    /// Creator of the offer
    pub maker: Pubkey,

    /// Counterparty, present once the offer has been taken
    pub taker: Option<Pubkey>,

    /// Token being offered (locked in the vault)
    pub token_mint_a: Pubkey,

    /// Token wanted in return
    pub token_mint_b: Pubkey,

    /// Offered amount in base units of mint A
    pub amount_a_offered: u64,

    /// Wanted amount in base units of mint B
    pub amount_b_wanted: u64,

    /// Maker/taker token accounts for each leg, where the service knows them
    pub maker_token_account_a: Option<Pubkey>,
    pub maker_token_account_b: Option<Pubkey>,
    pub taker_token_account_a: Option<Pubkey>,
    pub taker_token_account_b: Option<Pubkey>,

    /// Escrow-controlled offer state account
    pub offer_account: Pubkey,

    /// Custody account holding the locked leg-A tokens
    pub vault_account: Pubkey,

    /// Token program owning both legs
    pub token_program: Pubkey,

    /// True once the offer has been taken or cancelled
    pub closed: bool,

    /// Transaction hash of the make instruction
    pub offer_tx_hash: String,

    /// Transaction hash of the take instruction, once settled
    pub take_tx_hash: Option<String>,
}

impl Offer {
    pub fn is_open(&self) -> bool {
        !self.closed
    }

    /// Whether the given address participates in this offer as maker or taker.
    pub fn involves(&self, address: &Pubkey) -> bool {
        self.maker == *address || self.taker.as_ref() == Some(address)
    }
}

/// Display metadata for a token mint.
///
/// `decimals` is authoritative for amount formatting and comes from an
/// on-chain mint read whenever one succeeds; curated entries only supply
/// symbol/name/icon in that case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub address: Pubkey,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub icon: Option<String>,
}
