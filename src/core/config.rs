use serde::{Deserialize, Serialize};
use solana_sdk::pubkey;
use solana_sdk::pubkey::Pubkey;
use std::time::Duration;

/// Default escrow program ID for Devnet
pub const DEFAULT_ESCROW_PROGRAM_ID: Pubkey =
    pubkey!("6PrMYET1UjrdPQ8SA9XUP7fFn9mvhveVWe1zj2g9cZpC");

/// SPL Token program
pub const TOKEN_PROGRAM_ID: Pubkey = pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

/// SPL Associated Token Account program
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// Client configuration.
///
/// All fields have reference defaults so a config file only needs to name
/// what it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// JSON-RPC endpoint for on-chain reads
    pub rpc_url: String,

    /// GraphQL endpoint of the offer indexing service
    pub subgraph_url: String,

    /// Escrow program the offers live under
    pub escrow_program_id: Pubkey,

    /// Offers per page in the derived views
    pub items_per_page: usize,

    /// How long a resolved token metadata entry is considered fresh
    pub metadata_fresh_secs: u64,

    /// How long a metadata entry is retained before eviction
    pub metadata_retention_secs: u64,

    /// Attempts per indexing-service fetch before giving up
    pub fetch_attempts: u32,

    /// Initial backoff between fetch attempts, doubled per retry
    pub fetch_backoff_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            subgraph_url: "http://localhost:8000/subgraphs/name/escrow-offers".to_string(),
            escrow_program_id: DEFAULT_ESCROW_PROGRAM_ID,
            items_per_page: 5,
            metadata_fresh_secs: 5 * 60,
            metadata_retention_secs: 30 * 60,
            fetch_attempts: 3,
            fetch_backoff_ms: 250,
        }
    }
}

impl ClientConfig {
    pub fn metadata_fresh_window(&self) -> Duration {
        Duration::from_secs(self.metadata_fresh_secs)
    }

    pub fn metadata_retention_window(&self) -> Duration {
        Duration::from_secs(self.metadata_retention_secs)
    }

    pub fn fetch_backoff(&self) -> Duration {
        Duration::from_millis(self.fetch_backoff_ms)
    }
}
