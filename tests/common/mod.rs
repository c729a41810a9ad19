#![allow(dead_code)]

use async_trait::async_trait;
use escrow_offers_sdk::core::config::TOKEN_PROGRAM_ID;
use escrow_offers_sdk::core::connection::SolConnection;
use escrow_offers_sdk::core::indexer::OfferIndexer;
use escrow_offers_sdk::core::wallet::WalletProvider;
use escrow_offers_sdk::types::Offer;
use escrow_offers_sdk::utils::MINT_ACCOUNT_LEN;
use solana_sdk::account::Account;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::collections::HashMap;
use std::error::Error;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory ledger with a read counter, standing in for an RPC node.
pub struct MockConnection {
    accounts: Mutex<HashMap<Pubkey, Account>>,
    reads: AtomicUsize,
    fail_reads: AtomicBool,
    read_delay: Duration,
}

impl MockConnection {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            reads: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
            read_delay: Duration::ZERO,
        }
    }

    /// Register a mint account with the given decimals.
    pub fn with_mint(self, mint: Pubkey, decimals: u8) -> Self {
        let mut data = vec![0u8; MINT_ACCOUNT_LEN];
        data[44] = decimals;
        self.accounts.lock().unwrap().insert(
            mint,
            Account {
                lamports: 1_000_000,
                data,
                owner: TOKEN_PROGRAM_ID,
                executable: false,
                rent_epoch: 0,
            },
        );
        self
    }

    /// Delay each read so concurrent resolutions actually overlap.
    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = delay;
        self
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SolConnection for MockConnection {
    async fn get_account(
        &self,
        pubkey: &Pubkey,
    ) -> Result<Option<Account>, Box<dyn Error + Send + Sync>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if !self.read_delay.is_zero() {
            tokio::time::sleep(self.read_delay).await;
        }
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err("rpc unavailable".into());
        }
        Ok(self.accounts.lock().unwrap().get(pubkey).cloned())
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, Box<dyn Error + Send + Sync>> {
        Ok(Hash::default())
    }
}

/// Wallet provider double: scripted connect outcome, counted submissions.
pub struct MockWallet {
    address: Pubkey,
    connect_fails: AtomicBool,
    submit_fails: AtomicBool,
    connect_delay: Duration,
    submit_delay: Duration,
    submissions: AtomicUsize,
    persisted_session: Mutex<Option<Pubkey>>,
}

impl MockWallet {
    pub fn new() -> Self {
        Self {
            address: Pubkey::new_unique(),
            connect_fails: AtomicBool::new(false),
            submit_fails: AtomicBool::new(false),
            connect_delay: Duration::ZERO,
            submit_delay: Duration::ZERO,
            submissions: AtomicUsize::new(0),
            persisted_session: Mutex::new(None),
        }
    }

    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = delay;
        self
    }

    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = delay;
        self
    }

    pub fn address(&self) -> Pubkey {
        self.address
    }

    pub fn fail_connect(&self, fail: bool) {
        self.connect_fails.store(fail, Ordering::SeqCst);
    }

    pub fn fail_submit(&self, fail: bool) {
        self.submit_fails.store(fail, Ordering::SeqCst);
    }

    pub fn persist_session(&self) {
        *self.persisted_session.lock().unwrap() = Some(self.address);
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn connect(&self) -> Result<Pubkey, Box<dyn Error + Send + Sync>> {
        if !self.connect_delay.is_zero() {
            tokio::time::sleep(self.connect_delay).await;
        }
        if self.connect_fails.load(Ordering::SeqCst) {
            return Err("user rejected the request".into());
        }
        Ok(self.address)
    }

    async fn disconnect(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        *self.persisted_session.lock().unwrap() = None;
        Ok(())
    }

    fn connected_address(&self) -> Option<Pubkey> {
        *self.persisted_session.lock().unwrap()
    }

    async fn submit_transaction(
        &self,
        _transaction: Transaction,
    ) -> Result<Signature, Box<dyn Error + Send + Sync>> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        if !self.submit_delay.is_zero() {
            tokio::time::sleep(self.submit_delay).await;
        }
        if self.submit_fails.load(Ordering::SeqCst) {
            return Err("submission rejected".into());
        }
        Ok(Signature::default())
    }
}

/// Indexer double serving a scripted offer set.
pub struct MockIndexer {
    offers: Mutex<Vec<Offer>>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl MockIndexer {
    pub fn new(offers: Vec<Offer>) -> Self {
        Self {
            offers: Mutex::new(offers),
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_offers(&self, offers: Vec<Offer>) {
        *self.offers.lock().unwrap() = offers;
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OfferIndexer for MockIndexer {
    async fn fetch_offers(&self) -> Result<Vec<Offer>, Box<dyn Error + Send + Sync>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err("indexer unreachable".into());
        }
        Ok(self.offers.lock().unwrap().clone())
    }
}

pub fn sample_offer(id: &str, closed: bool) -> Offer {
    offer_between(id, Pubkey::new_unique(), None, closed)
}

pub fn offer_between(id: &str, maker: Pubkey, taker: Option<Pubkey>, closed: bool) -> Offer {
    Offer {
        id: id.to_string(),
        maker,
        taker,
        token_mint_a: Pubkey::new_unique(),
        token_mint_b: Pubkey::new_unique(),
        amount_a_offered: 1_000_000_000,
        amount_b_wanted: 500_000,
        maker_token_account_a: None,
        maker_token_account_b: None,
        taker_token_account_a: None,
        taker_token_account_b: None,
        offer_account: Pubkey::new_unique(),
        vault_account: Pubkey::new_unique(),
        token_program: TOKEN_PROGRAM_ID,
        closed,
        offer_tx_hash: format!("0xmake-{id}"),
        take_tx_hash: taker.map(|_| format!("0xtake-{id}")),
    }
}
