use async_trait::async_trait;
use serde::{de, Deserialize, Deserializer};
use solana_sdk::pubkey::Pubkey;
use std::error::Error;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::core::config::{ClientConfig, TOKEN_PROGRAM_ID};
use crate::error::OffersSdkError;
use crate::types::Offer;

/// Read-only query boundary to the offer indexing service.
#[async_trait]
pub trait OfferIndexer: Send + Sync {
    async fn fetch_offers(&self) -> Result<Vec<Offer>, Box<dyn Error + Send + Sync>>;
}

#[async_trait]
impl<T: OfferIndexer + ?Sized> OfferIndexer for std::sync::Arc<T> {
    async fn fetch_offers(&self) -> Result<Vec<Offer>, Box<dyn Error + Send + Sync>> {
        self.as_ref().fetch_offers().await
    }
}

/// [`OfferIndexer`] over the subgraph's GraphQL endpoint.
///
/// Issues a single "all offers" query and leaves view derivation to the
/// store; the service offers no cursoring, so results past
/// [`GraphqlIndexer::FETCH_LIMIT`] are silently truncated by the service.
/// Failed attempts are retried with a bounded doubling backoff.
pub struct GraphqlIndexer {
    endpoint: String,
    http: reqwest::Client,
    max_attempts: u32,
    initial_backoff: Duration,
}

const OFFERS_QUERY: &str = "{ offers(first: 100) { \
id closed trxHashOffer trxHashTake \
tokenAOfferedAmount tokenBWantedAmount \
acctMaker acctTaker \
acctTokenMintA acctTokenMintB \
acctMakerTokenAccountA acctTakerTokenAccountA \
acctTakerTokenAccountB acctMakerTokenAccountB \
acctOffer acctVault acctTokenProgram } }";

impl GraphqlIndexer {
    /// Largest result set the service returns for one query.
    pub const FETCH_LIMIT: usize = 100;

    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: reqwest::Client::new(),
            max_attempts: 3,
            initial_backoff: Duration::from_millis(250),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            endpoint: config.subgraph_url.clone(),
            http: reqwest::Client::new(),
            max_attempts: config.fetch_attempts.max(1),
            initial_backoff: config.fetch_backoff(),
        }
    }

    async fn query_once(&self) -> Result<Vec<OfferRecord>, Box<dyn Error + Send + Sync>> {
        let body = serde_json::json!({ "query": OFFERS_QUERY });
        let response: GraphqlResponse = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(errors) = response.errors {
            if let Some(first) = errors.first() {
                return Err(format!("indexer error: {}", first.message).into());
            }
        }

        Ok(response.data.map(|data| data.offers).unwrap_or_default())
    }
}

#[async_trait]
impl OfferIndexer for GraphqlIndexer {
    async fn fetch_offers(&self) -> Result<Vec<Offer>, Box<dyn Error + Send + Sync>> {
        let mut backoff = self.initial_backoff;
        let mut last_error: Option<Box<dyn Error + Send + Sync>> = None;

        for attempt in 1..=self.max_attempts {
            match self.query_once().await {
                Ok(records) => {
                    let offers = records
                        .into_iter()
                        .filter_map(|record| match record.into_offer() {
                            Ok(offer) => Some(offer),
                            Err(err) => {
                                warn!(error = %err, "skipping malformed offer record");
                                None
                            }
                        })
                        .collect();
                    return Ok(offers);
                }
                Err(err) => {
                    warn!(attempt, error = %err, "offers query attempt failed");
                    last_error = Some(err);
                    if attempt < self.max_attempts {
                        tokio::time::sleep(backoff).await;
                        backoff *= 2;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| "offers query failed".into()))
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<OffersData>,
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct OffersData {
    #[serde(default)]
    offers: Vec<OfferRecord>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

/// Wire shape of one subgraph offer record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OfferRecord {
    id: String,
    closed: bool,
    trx_hash_offer: String,
    trx_hash_take: Option<String>,
    #[serde(deserialize_with = "de_base_units")]
    token_a_offered_amount: u64,
    #[serde(deserialize_with = "de_base_units")]
    token_b_wanted_amount: u64,
    acct_maker: String,
    acct_taker: Option<String>,
    acct_token_mint_a: String,
    acct_token_mint_b: String,
    acct_maker_token_account_a: Option<String>,
    acct_maker_token_account_b: Option<String>,
    acct_taker_token_account_a: Option<String>,
    acct_taker_token_account_b: Option<String>,
    acct_offer: String,
    acct_vault: String,
    acct_token_program: Option<String>,
}

impl OfferRecord {
    fn into_offer(self) -> Result<Offer, OffersSdkError> {
        Ok(Offer {
            maker: parse_pubkey(&self.acct_maker)?,
            taker: parse_opt_pubkey(self.acct_taker.as_deref())?,
            token_mint_a: parse_pubkey(&self.acct_token_mint_a)?,
            token_mint_b: parse_pubkey(&self.acct_token_mint_b)?,
            amount_a_offered: self.token_a_offered_amount,
            amount_b_wanted: self.token_b_wanted_amount,
            maker_token_account_a: parse_opt_pubkey(self.acct_maker_token_account_a.as_deref())?,
            maker_token_account_b: parse_opt_pubkey(self.acct_maker_token_account_b.as_deref())?,
            taker_token_account_a: parse_opt_pubkey(self.acct_taker_token_account_a.as_deref())?,
            taker_token_account_b: parse_opt_pubkey(self.acct_taker_token_account_b.as_deref())?,
            offer_account: parse_pubkey(&self.acct_offer)?,
            vault_account: parse_pubkey(&self.acct_vault)?,
            token_program: match self.acct_token_program.as_deref() {
                Some(address) => parse_pubkey(address)?,
                None => TOKEN_PROGRAM_ID,
            },
            closed: self.closed,
            offer_tx_hash: self.trx_hash_offer,
            take_tx_hash: self.trx_hash_take,
            id: self.id,
        })
    }
}

fn parse_pubkey(address: &str) -> Result<Pubkey, OffersSdkError> {
    Pubkey::from_str(address)
        .map_err(|err| OffersSdkError::InvalidAccountData(format!("bad pubkey {address}: {err}")))
}

fn parse_opt_pubkey(address: Option<&str>) -> Result<Option<Pubkey>, OffersSdkError> {
    match address {
        Some(address) if !address.is_empty() => parse_pubkey(address).map(Some),
        _ => Ok(None),
    }
}

/// The subgraph serializes BigInt amounts as decimal strings, but some
/// deployments emit plain numbers; accept both.
fn de_base_units<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    struct BaseUnits;

    impl de::Visitor<'_> for BaseUnits {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a base-unit amount as a string or integer")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<u64, E> {
            Ok(value)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<u64, E> {
            value.parse().map_err(de::Error::custom)
        }
    }

    deserializer.deserialize_any(BaseUnits)
}
