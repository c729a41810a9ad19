use borsh::BorshSerialize;
use sha2::{Digest, Sha256};
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_program;

use crate::core::config::ASSOCIATED_TOKEN_PROGRAM_ID;
use crate::types::Offer;
use crate::utils::{derive_associated_token_account, derive_offer_pda};

/// Anchor instruction discriminator: first 8 bytes of sha256("global:<name>")
pub fn anchor_discriminator(name: &str) -> [u8; 8] {
    let hash = Sha256::digest(format!("global:{name}").as_bytes());
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash[..8]);
    discriminator
}

#[derive(BorshSerialize)]
struct MakeOfferArgs {
    id: u64,
    token_a_offered_amount: u64,
    token_b_wanted_amount: u64,
}

/// Build the escrow program's `make_offer` instruction.
///
/// Derives the offer PDA from the maker and offer id; the vault is the
/// offer PDA's associated token account for mint A.
pub fn make_offer(
    program_id: &Pubkey,
    maker: &Pubkey,
    id: u64,
    token_mint_a: &Pubkey,
    token_mint_b: &Pubkey,
    token_program: &Pubkey,
    amount_a_offered: u64,
    amount_b_wanted: u64,
) -> Instruction {
    let (offer_pda, _) = derive_offer_pda(program_id, maker, id);
    let maker_token_account_a = derive_associated_token_account(maker, token_mint_a, token_program);
    let vault = derive_associated_token_account(&offer_pda, token_mint_a, token_program);

    let args = MakeOfferArgs {
        id,
        token_a_offered_amount: amount_a_offered,
        token_b_wanted_amount: amount_b_wanted,
    };
    let mut data = anchor_discriminator("make_offer").to_vec();
    data.extend(borsh::to_vec(&args).unwrap());

    let accounts = vec![
        AccountMeta::new(*maker, true),
        AccountMeta::new_readonly(*token_mint_a, false),
        AccountMeta::new_readonly(*token_mint_b, false),
        AccountMeta::new(maker_token_account_a, false),
        AccountMeta::new(offer_pda, false),
        AccountMeta::new(vault, false),
        AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
        AccountMeta::new_readonly(*token_program, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Instruction {
        program_id: *program_id,
        accounts,
        data,
    }
}

/// Build the escrow program's `take_offer` instruction for the connected
/// taker against an indexed offer.
///
/// Maker/offer/mint/vault accounts come straight from the offer record;
/// the taker's token accounts and the maker's mint-B account are the
/// canonical associated token accounts (the program initializes them when
/// absent).
pub fn take_offer(program_id: &Pubkey, taker: &Pubkey, offer: &Offer) -> Instruction {
    let taker_token_account_a =
        derive_associated_token_account(taker, &offer.token_mint_a, &offer.token_program);
    let taker_token_account_b =
        derive_associated_token_account(taker, &offer.token_mint_b, &offer.token_program);
    let maker_token_account_b =
        derive_associated_token_account(&offer.maker, &offer.token_mint_b, &offer.token_program);

    let accounts = vec![
        AccountMeta::new(*taker, true),
        AccountMeta::new(offer.maker, false),
        AccountMeta::new_readonly(offer.token_mint_a, false),
        AccountMeta::new_readonly(offer.token_mint_b, false),
        AccountMeta::new(taker_token_account_a, false),
        AccountMeta::new(taker_token_account_b, false),
        AccountMeta::new(maker_token_account_b, false),
        AccountMeta::new(offer.offer_account, false),
        AccountMeta::new(offer.vault_account, false),
        AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
        AccountMeta::new_readonly(offer.token_program, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Instruction {
        program_id: *program_id,
        accounts,
        data: anchor_discriminator("take_offer").to_vec(),
    }
}
