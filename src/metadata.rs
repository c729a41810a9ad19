use futures::future::join_all;
use solana_sdk::pubkey;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

use crate::core::config::ClientConfig;
use crate::core::connection::SolConnection;
use crate::error::{OffersSdkError, Result};
use crate::types::TokenMetadata;
use crate::utils::decode_mint_decimals;

pub const UNKNOWN_SYMBOL: &str = "UNKNOWN";
pub const UNKNOWN_NAME: &str = "Unknown Token";

/// Base-unit convention on Solana when nothing better is known.
pub const FALLBACK_DECIMALS: u8 = 9;
pub const FALLBACK_ICON: &str = "👁";

/// Curated display entries for the mints the platform trades.
///
/// `decimals` here is only trusted when the on-chain read fails; a
/// successful read always wins.
#[derive(Debug, Clone)]
struct CuratedEntry {
    symbol: &'static str,
    name: &'static str,
    decimals: u8,
    icon: Option<&'static str>,
}

fn curated_table() -> HashMap<Pubkey, CuratedEntry> {
    HashMap::from([
        (
            pubkey!("GdHsojisNu8RH92k4JzF1ULzutZgfg8WRL5cHkoW2HCK"),
            CuratedEntry {
                symbol: "HOT",
                name: "Hot",
                decimals: 9,
                icon: Some("🌭"),
            },
        ),
        (
            pubkey!("9NCKufE7BQrTXTang2WjXjBe2vdrfKArRMq2Nwmn4o8S"),
            CuratedEntry {
                symbol: "Burger",
                name: "Burger",
                decimals: 9,
                icon: Some("🍔"),
            },
        ),
        (
            pubkey!("So11111111111111111111111111111111111111112"),
            CuratedEntry {
                symbol: "SOL",
                name: "Wrapped SOL",
                decimals: 9,
                icon: Some("https://raw.githubusercontent.com/solana-labs/token-list/main/assets/mainnet/So11111111111111111111111111111111111111112/logo.png"),
            },
        ),
        (
            pubkey!("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"),
            CuratedEntry {
                symbol: "USDC",
                name: "USD Coin",
                decimals: 6,
                icon: Some("https://raw.githubusercontent.com/solana-labs/token-list/main/assets/mainnet/EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v/logo.png"),
            },
        ),
    ])
}

struct CacheEntry {
    metadata: TokenMetadata,
    fetched_at: Instant,
}

/// Tiered token-metadata resolver.
///
/// Resolution order, first success wins:
/// 1. on-chain mint read + curated entry: curated symbol/name/icon with the
///    authoritative on-chain decimals
/// 2. on-chain read alone: UNKNOWN display with authoritative decimals
/// 3. read failed, curated entry exists: the curated entry as-is
/// 4. terminal fallback: UNKNOWN, decimals 9, placeholder icon
///
/// `resolve` never fails: metadata is best-effort display data and must not
/// gate fund-moving actions. Results are cached per mint with a freshness
/// window, and concurrent resolutions of one mint collapse to a single read.
pub struct TokenResolver {
    curated: HashMap<Pubkey, CuratedEntry>,
    fresh: Duration,
    retention: Duration,
    cache: Mutex<HashMap<Pubkey, CacheEntry>>,
    in_flight: Mutex<HashMap<Pubkey, Arc<Mutex<()>>>>,
}

impl TokenResolver {
    pub fn new(fresh: Duration, retention: Duration) -> Self {
        Self {
            curated: curated_table(),
            fresh,
            retention,
            cache: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            config.metadata_fresh_window(),
            config.metadata_retention_window(),
        )
    }

    /// Resolve display metadata for a mint, degrading through the fallback
    /// tiers rather than failing.
    pub async fn resolve(&self, connection: &impl SolConnection, mint: Pubkey) -> TokenMetadata {
        if let Some(hit) = self.cached(&mint).await {
            return hit;
        }

        // Collapse concurrent resolutions of the same mint onto one read:
        // whoever holds the per-mint gate does the fetch, later holders see
        // the cache hit.
        let gate = {
            let mut in_flight = self.in_flight.lock().await;
            in_flight
                .entry(mint)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let _held = gate.lock().await;

        if let Some(hit) = self.cached(&mint).await {
            return hit;
        }

        let metadata = self.lookup(connection, &mint).await;
        self.store_entry(mint, metadata.clone()).await;
        self.in_flight.lock().await.remove(&mint);
        metadata
    }

    /// Resolve a batch of mints independently and in parallel; one mint's
    /// fallback never affects another's result.
    pub async fn resolve_many(
        &self,
        connection: &impl SolConnection,
        mints: &[Pubkey],
    ) -> HashMap<Pubkey, TokenMetadata> {
        let resolved = join_all(mints.iter().map(|mint| self.resolve(connection, *mint))).await;
        mints.iter().copied().zip(resolved).collect()
    }

    async fn lookup(&self, connection: &impl SolConnection, mint: &Pubkey) -> TokenMetadata {
        match read_mint_decimals(connection, mint).await {
            Ok(decimals) => match self.curated.get(mint) {
                Some(entry) => TokenMetadata {
                    address: *mint,
                    symbol: entry.symbol.to_string(),
                    name: entry.name.to_string(),
                    decimals,
                    icon: entry.icon.map(str::to_string),
                },
                None => TokenMetadata {
                    address: *mint,
                    symbol: UNKNOWN_SYMBOL.to_string(),
                    name: UNKNOWN_NAME.to_string(),
                    decimals,
                    icon: None,
                },
            },
            Err(err) => {
                debug!(%mint, error = %err, "mint read failed, using fallback metadata");
                match self.curated.get(mint) {
                    Some(entry) => TokenMetadata {
                        address: *mint,
                        symbol: entry.symbol.to_string(),
                        name: entry.name.to_string(),
                        decimals: entry.decimals,
                        icon: entry.icon.map(str::to_string),
                    },
                    None => TokenMetadata {
                        address: *mint,
                        symbol: UNKNOWN_SYMBOL.to_string(),
                        name: UNKNOWN_NAME.to_string(),
                        decimals: FALLBACK_DECIMALS,
                        icon: Some(FALLBACK_ICON.to_string()),
                    },
                }
            }
        }
    }

    async fn cached(&self, mint: &Pubkey) -> Option<TokenMetadata> {
        let cache = self.cache.lock().await;
        cache
            .get(mint)
            .filter(|entry| entry.fetched_at.elapsed() < self.fresh)
            .map(|entry| entry.metadata.clone())
    }

    async fn store_entry(&self, mint: Pubkey, metadata: TokenMetadata) {
        let mut cache = self.cache.lock().await;
        // Retention sweep bounds cache memory to recently-used mints.
        cache.retain(|_, entry| entry.fetched_at.elapsed() < self.retention);
        cache.insert(
            mint,
            CacheEntry {
                metadata,
                fetched_at: Instant::now(),
            },
        );
    }
}

const MINT_READ_ATTEMPTS: u32 = 2;
const MINT_READ_BACKOFF: Duration = Duration::from_millis(100);

async fn read_mint_decimals(connection: &impl SolConnection, mint: &Pubkey) -> Result<u8> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match connection.get_account(mint).await {
            Ok(Some(account)) => return decode_mint_decimals(&account.data),
            // A missing account is deterministic; only transport errors
            // earn a retry.
            Ok(None) => return Err(OffersSdkError::AccountNotFound(*mint)),
            Err(err) if attempt < MINT_READ_ATTEMPTS => {
                debug!(%mint, error = %err, attempt, "retrying mint read");
                tokio::time::sleep(MINT_READ_BACKOFF).await;
            }
            Err(err) => return Err(OffersSdkError::Connection(err.to_string())),
        }
    }
}
