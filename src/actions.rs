use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::Transaction;

use crate::core::connection::SolConnection;
use crate::error::{OffersSdkError, Result};
use crate::instructions;
use crate::types::Offer;

/// Builds the unsigned take-transaction for a selected offer.
pub struct TakeOfferBuilder {
    program_id: Pubkey,
    offer: Offer,
    taker: Option<Pubkey>,
}

impl TakeOfferBuilder {
    pub fn new(program_id: Pubkey, offer: &Offer) -> Self {
        Self {
            program_id,
            offer: offer.clone(),
            taker: None,
        }
    }

    pub fn with_taker(mut self, taker: Pubkey) -> Self {
        self.taker = Some(taker);
        self
    }

    pub async fn build_transaction(&self, connection: &impl SolConnection) -> Result<Transaction> {
        let taker = self.taker.ok_or(OffersSdkError::NotConnected)?;

        let ix = instructions::take_offer(&self.program_id, &taker, &self.offer);
        let blockhash = connection
            .get_latest_blockhash()
            .await
            .map_err(|err| OffersSdkError::Connection(err.to_string()))?;

        Ok(Transaction::new_unsigned(Message::new_with_blockhash(
            &[ix],
            Some(&taker),
            &blockhash,
        )))
    }
}

/// Builds the unsigned make-transaction for a new offer.
pub struct MakeOfferBuilder {
    program_id: Pubkey,
    maker: Option<Pubkey>,
    id: Option<u64>,
    token_mint_a: Option<Pubkey>,
    token_mint_b: Option<Pubkey>,
    token_program: Pubkey,
    amount_a_offered: u64,
    amount_b_wanted: u64,
}

impl MakeOfferBuilder {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            maker: None,
            id: None,
            token_mint_a: None,
            token_mint_b: None,
            token_program: crate::core::config::TOKEN_PROGRAM_ID,
            amount_a_offered: 0,
            amount_b_wanted: 0,
        }
    }

    pub fn with_maker(mut self, maker: Pubkey) -> Self {
        self.maker = Some(maker);
        self
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn offering(mut self, mint: Pubkey, amount: u64) -> Self {
        self.token_mint_a = Some(mint);
        self.amount_a_offered = amount;
        self
    }

    pub fn wanting(mut self, mint: Pubkey, amount: u64) -> Self {
        self.token_mint_b = Some(mint);
        self.amount_b_wanted = amount;
        self
    }

    pub fn with_token_program(mut self, token_program: Pubkey) -> Self {
        self.token_program = token_program;
        self
    }

    pub async fn build_transaction(&self, connection: &impl SolConnection) -> Result<Transaction> {
        let maker = self
            .maker
            .ok_or_else(|| OffersSdkError::Other("maker required".to_string()))?;
        let id = self
            .id
            .ok_or_else(|| OffersSdkError::Other("offer id required".to_string()))?;
        let token_mint_a = self
            .token_mint_a
            .ok_or_else(|| OffersSdkError::Other("offered mint required".to_string()))?;
        let token_mint_b = self
            .token_mint_b
            .ok_or_else(|| OffersSdkError::Other("wanted mint required".to_string()))?;
        if token_mint_a == token_mint_b {
            return Err(OffersSdkError::Other(
                "token mints must be different".to_string(),
            ));
        }
        if self.amount_a_offered == 0 {
            return Err(OffersSdkError::Other(
                "offered amount must be greater than zero".to_string(),
            ));
        }
        if self.amount_b_wanted == 0 {
            return Err(OffersSdkError::Other(
                "wanted amount must be greater than zero".to_string(),
            ));
        }

        let ix = instructions::make_offer(
            &self.program_id,
            &maker,
            id,
            &token_mint_a,
            &token_mint_b,
            &self.token_program,
            self.amount_a_offered,
            self.amount_b_wanted,
        );
        let blockhash = connection
            .get_latest_blockhash()
            .await
            .map_err(|err| OffersSdkError::Connection(err.to_string()))?;

        Ok(Transaction::new_unsigned(Message::new_with_blockhash(
            &[ix],
            Some(&maker),
            &blockhash,
        )))
    }
}
