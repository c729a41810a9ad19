use solana_sdk::pubkey::Pubkey;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::core::indexer::OfferIndexer;
use crate::error::{OffersSdkError, Result};
use crate::types::Offer;

/// One page of a derived offer view.
#[derive(Debug, Clone)]
pub struct OfferPage {
    pub offers: Vec<Offer>,
    pub page: usize,
    pub total_pages: usize,
}

/// Process-wide holder of the last fetched offer set.
///
/// Offers are kept in indexing-service return order and only replaced
/// wholesale by [`OfferStore::refresh`]; the store never flips
/// `closed`/`taker` locally. After a take settles, a refresh may still
/// observe the pre-take state for a while (the index is eventually
/// consistent), so consumers must treat a recently-taken offer that still
/// reads `closed = false` as possibly stale, not authoritative.
#[derive(Default)]
pub struct OfferStore {
    offers: RwLock<Vec<Offer>>,
}

impl OfferStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the offer set from the indexing service. On failure the
    /// previous set is kept so views degrade to stale data with a notice
    /// rather than going blank.
    pub async fn refresh(&self, indexer: &impl OfferIndexer) -> Result<usize> {
        match indexer.fetch_offers().await {
            Ok(fetched) => {
                let count = fetched.len();
                *self.offers.write().await = fetched;
                debug!(count, "offer set refreshed");
                Ok(count)
            }
            Err(err) => {
                warn!(error = %err, "offers fetch failed, keeping stale set");
                Err(OffersSdkError::OffersFetchFailed(err.to_string()))
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.offers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.offers.read().await.is_empty()
    }

    /// All offers, paginated. `page` is 1-based.
    pub async fn page_all(&self, page: usize, page_size: usize) -> OfferPage {
        paginate(&self.offers.read().await, page, page_size)
    }

    /// Open offers only, with a pagination cursor independent of
    /// [`OfferStore::page_all`].
    pub async fn page_open(&self, page: usize, page_size: usize) -> OfferPage {
        let offers = self.offers.read().await;
        let open: Vec<Offer> = offers.iter().filter(|o| o.is_open()).cloned().collect();
        paginate(&open, page, page_size)
    }

    /// Every offer the address participates in, as maker or taker. Bounded
    /// by wallet-scoped volume, so not paginated; consumers partition into
    /// open/closed groups.
    pub async fn for_address(&self, address: &Pubkey) -> Vec<Offer> {
        self.offers
            .read()
            .await
            .iter()
            .filter(|offer| offer.involves(address))
            .cloned()
            .collect()
    }
}

/// `max(1, ceil(count / page_size))`: pagination controls never show zero
/// pages, even over an empty set.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    debug_assert!(page_size >= 1);
    count.div_ceil(page_size).max(1)
}

fn paginate(offers: &[Offer], page: usize, page_size: usize) -> OfferPage {
    let page = page.max(1);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(offers.len());
    let slice = if start < offers.len() {
        offers[start..end].to_vec()
    } else {
        Vec::new()
    };
    OfferPage {
        offers: slice,
        page,
        total_pages: total_pages(offers.len(), page_size),
    }
}
