use solana_sdk::pubkey::Pubkey;

use crate::core::config::ASSOCIATED_TOKEN_PROGRAM_ID;
use crate::error::{OffersSdkError, Result};

//=============================================================================
// PDA Derivation Helpers
//=============================================================================

/// Derive the associated token account for a wallet and mint
pub fn derive_associated_token_account(
    wallet: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> Pubkey {
    Pubkey::find_program_address(
        &[wallet.as_ref(), token_program.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .0
}

/// Derive the offer state PDA from program ID, maker and offer id
pub fn derive_offer_pda(program_id: &Pubkey, maker: &Pubkey, id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[b"offer", maker.as_ref(), &id.to_le_bytes()], program_id)
}

//=============================================================================
// Account Decoding
//=============================================================================

/// Serialized length of an SPL mint account
pub const MINT_ACCOUNT_LEN: usize = 82;

// COption<Pubkey> mint_authority (36) + u64 supply (8)
const MINT_DECIMALS_OFFSET: usize = 44;

/// Read the `decimals` field out of raw SPL mint account data
pub fn decode_mint_decimals(data: &[u8]) -> Result<u8> {
    if data.len() < MINT_ACCOUNT_LEN {
        return Err(OffersSdkError::InvalidAccountData(
            "account data too small for a mint".to_string(),
        ));
    }
    Ok(data[MINT_DECIMALS_OFFSET])
}

//=============================================================================
// Display Helpers
//=============================================================================

/// Render a base-unit amount with the mint's decimals, trimming trailing
/// zeros from the fractional part. The stored integer is never mutated;
/// this is display conversion only.
pub fn format_token_amount(amount: u64, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }
    let scale = 10u128.pow(decimals as u32);
    let whole = amount as u128 / scale;
    let frac = amount as u128 % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:0width$}", width = decimals as usize);
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

/// Shorten an address or hash for display: `abcd1234...wxyz5678`
pub fn truncate_address(address: &str, length: usize) -> String {
    if address.len() <= length * 2 {
        return address.to_string();
    }
    format!(
        "{}...{}",
        &address[..length],
        &address[address.len() - length..]
    )
}
