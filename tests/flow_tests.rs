use escrow_offers_sdk::core::config::ClientConfig;
use escrow_offers_sdk::error::OffersSdkError;
use escrow_offers_sdk::flow::TakeState;
use escrow_offers_sdk::session::SessionState;
use escrow_offers_sdk::types::Offer;
use escrow_offers_sdk::utils::format_token_amount;
use escrow_offers_sdk::OffersClient;
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::{sample_offer, MockConnection, MockIndexer, MockWallet};

type TestClient = OffersClient<Arc<MockConnection>, Arc<MockWallet>, Arc<MockIndexer>>;

struct Harness {
    client: Arc<TestClient>,
    wallet: Arc<MockWallet>,
    indexer: Arc<MockIndexer>,
}

fn harness_with(wallet: MockWallet, offers: Vec<Offer>) -> Harness {
    let connection = Arc::new(MockConnection::new());
    let wallet = Arc::new(wallet);
    let indexer = Arc::new(MockIndexer::new(offers));
    let client = Arc::new(OffersClient::new(
        ClientConfig::default(),
        connection,
        wallet.clone(),
        indexer.clone(),
    ));
    Harness {
        client,
        wallet,
        indexer,
    }
}

fn harness(offers: Vec<Offer>) -> Harness {
    harness_with(MockWallet::new(), offers)
}

#[tokio::test]
async fn confirm_without_session_keeps_the_selection() {
    let h = harness(vec![sample_offer("1", false)]);
    h.client.select_offer(sample_offer("1", false)).await.unwrap();

    let err = h.client.confirm_take().await.unwrap_err();
    assert!(matches!(err, OffersSdkError::NotConnected));
    // Selection survives so the UI can prompt to connect instead.
    assert!(matches!(h.client.take_state().await, TakeState::Selected(_)));
    assert!(h.client.pending_offer().await.is_some());
    assert_eq!(h.wallet.submission_count(), 0);
}

#[tokio::test]
async fn confirm_without_selection_is_rejected() {
    let h = harness(Vec::new());
    h.client.connect_wallet().await.unwrap();

    let err = h.client.confirm_take().await.unwrap_err();
    assert!(matches!(err, OffersSdkError::NothingSelected));
}

#[tokio::test]
async fn select_then_connect_then_settle() {
    let offer = sample_offer("1", false);
    // 1_000_000_000 base units at 9 decimals displays as "1".
    assert_eq!(format_token_amount(offer.amount_a_offered, 9), "1");

    let h = harness(vec![offer.clone()]);
    h.client.refresh_offers().await.unwrap();

    h.client.select_offer(offer).await.unwrap();
    let err = h.client.confirm_take().await.unwrap_err();
    assert!(matches!(err, OffersSdkError::NotConnected));
    assert!(matches!(h.client.take_state().await, TakeState::Selected(_)));

    let address = h.client.connect_wallet().await.unwrap();
    assert_eq!(h.client.session_state().await, SessionState::Connected(address));

    h.client.confirm_take().await.unwrap();
    assert_eq!(h.client.take_state().await, TakeState::Settled);
    assert!(h.client.pending_offer().await.is_none());
    assert_eq!(h.wallet.submission_count(), 1);
    // Settlement schedules a (best-effort) refresh of the view.
    assert!(h.indexer.call_count() >= 2);
}

#[tokio::test]
async fn double_confirm_submits_exactly_once() {
    let h = harness_with(
        MockWallet::new().with_submit_delay(Duration::from_millis(50)),
        Vec::new(),
    );
    h.client.connect_wallet().await.unwrap();
    h.client.select_offer(sample_offer("1", false)).await.unwrap();

    let first = {
        let client = h.client.clone();
        tokio::spawn(async move { client.confirm_take().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    let err = h.client.confirm_take().await.unwrap_err();
    assert!(matches!(err, OffersSdkError::AlreadySubmitting));

    first.await.unwrap().unwrap();
    assert_eq!(h.wallet.submission_count(), 1);
    assert_eq!(h.client.take_state().await, TakeState::Settled);
}

#[tokio::test]
async fn selection_cannot_change_while_confirming() {
    let h = harness_with(
        MockWallet::new().with_submit_delay(Duration::from_millis(50)),
        Vec::new(),
    );
    h.client.connect_wallet().await.unwrap();
    h.client.select_offer(sample_offer("1", false)).await.unwrap();

    let pending = {
        let client = h.client.clone();
        tokio::spawn(async move { client.confirm_take().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(matches!(
        h.client.select_offer(sample_offer("2", false)).await,
        Err(OffersSdkError::AlreadySubmitting)
    ));
    assert!(matches!(
        h.client.clear_selection().await,
        Err(OffersSdkError::AlreadySubmitting)
    ));

    pending.await.unwrap().unwrap();
}

#[tokio::test]
async fn disconnect_does_not_cancel_an_inflight_take() {
    let h = harness_with(
        MockWallet::new().with_submit_delay(Duration::from_millis(50)),
        Vec::new(),
    );
    h.client.connect_wallet().await.unwrap();
    h.client.select_offer(sample_offer("1", false)).await.unwrap();

    let pending = {
        let client = h.client.clone();
        tokio::spawn(async move { client.confirm_take().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    h.client.disconnect_wallet().await;
    assert_eq!(h.client.session_state().await, SessionState::Disconnected);

    // The submission still runs to settlement.
    pending.await.unwrap().unwrap();
    assert_eq!(h.wallet.submission_count(), 1);
    assert_eq!(h.client.take_state().await, TakeState::Settled);
}

#[tokio::test]
async fn dropped_confirm_future_still_resolves_the_take() {
    let h = harness_with(
        MockWallet::new().with_submit_delay(Duration::from_millis(100)),
        Vec::new(),
    );
    h.client.connect_wallet().await.unwrap();
    h.client.select_offer(sample_offer("1", false)).await.unwrap();

    // The caller goes away mid-submission.
    let raced = tokio::time::timeout(Duration::from_millis(20), h.client.confirm_take()).await;
    assert!(raced.is_err());

    // The detached submission runs to settlement anyway.
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(h.client.take_state().await, TakeState::Settled);
    assert_eq!(h.wallet.submission_count(), 1);

    // The flow accepts a fresh selection afterwards.
    h.client.select_offer(sample_offer("2", false)).await.unwrap();
    h.client.clear_selection().await.unwrap();
}

#[tokio::test]
async fn dropped_connect_attempt_still_completes() {
    let h = harness_with(
        MockWallet::new().with_connect_delay(Duration::from_millis(100)),
        Vec::new(),
    );

    let raced = tokio::time::timeout(Duration::from_millis(20), h.client.connect_wallet()).await;
    assert!(raced.is_err());

    // The detached attempt finishes and the session leaves `Connecting`.
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(
        h.client.session_state().await,
        SessionState::Connected(h.wallet.address())
    );
    assert_eq!(h.client.connect_wallet().await.unwrap(), h.wallet.address());
}

#[tokio::test]
async fn failed_take_retains_the_offer_for_retry() {
    let h = harness(Vec::new());
    h.client.connect_wallet().await.unwrap();
    h.client.select_offer(sample_offer("1", false)).await.unwrap();

    h.wallet.fail_submit(true);
    let err = h.client.confirm_take().await.unwrap_err();
    assert!(matches!(err, OffersSdkError::TakeOfferFailed(_)));
    assert!(matches!(h.client.take_state().await, TakeState::Failed(_)));
    assert!(h.client.pending_offer().await.is_some());

    h.wallet.fail_submit(false);
    h.client.confirm_take().await.unwrap();
    assert_eq!(h.client.take_state().await, TakeState::Settled);
    assert_eq!(h.wallet.submission_count(), 2);
}

#[tokio::test]
async fn connect_failure_returns_to_disconnected() {
    let h = harness(Vec::new());
    h.wallet.fail_connect(true);

    let err = h.client.connect_wallet().await.unwrap_err();
    assert!(matches!(err, OffersSdkError::WalletConnectionFailed(_)));
    assert_eq!(h.client.session_state().await, SessionState::Disconnected);

    // The attempt is retryable.
    h.wallet.fail_connect(false);
    h.client.connect_wallet().await.unwrap();
    assert!(matches!(
        h.client.session_state().await,
        SessionState::Connected(_)
    ));
}

#[tokio::test]
async fn provider_session_is_adopted_idempotently() {
    let h = harness(Vec::new());
    assert!(h.client.adopt_provider_session().await.is_none());

    h.wallet.persist_session();
    let address = h.client.adopt_provider_session().await.unwrap();
    assert_eq!(h.client.session_state().await, SessionState::Connected(address));

    // Observing the same session again changes nothing.
    let again = h.client.adopt_provider_session().await.unwrap();
    assert_eq!(again, address);
    assert_eq!(h.client.session_state().await, SessionState::Connected(address));
}

#[tokio::test]
async fn observing_a_new_provider_address_replaces_the_session() {
    use escrow_offers_sdk::session::WalletSession;
    use solana_sdk::pubkey::Pubkey;

    let session = WalletSession::new();
    let first = Pubkey::new_unique();
    session.observe_connected(first).await;
    assert_eq!(session.state().await, SessionState::Connected(first));

    // The provider owns session identity: a different address wins.
    let second = Pubkey::new_unique();
    session.observe_connected(second).await;
    assert_eq!(session.state().await, SessionState::Connected(second));
    assert_eq!(session.address().await, Some(second));
}

#[tokio::test]
async fn disconnect_clears_an_unsubmitted_selection() {
    let h = harness(Vec::new());
    h.client.connect_wallet().await.unwrap();
    h.client.select_offer(sample_offer("1", false)).await.unwrap();

    h.client.disconnect_wallet().await;
    assert_eq!(h.client.take_state().await, TakeState::Idle);
    assert!(h.client.pending_offer().await.is_none());
}

#[tokio::test]
async fn my_offers_requires_a_session() {
    let h = harness(Vec::new());
    assert!(matches!(
        h.client.my_offers().await,
        Err(OffersSdkError::NotConnected)
    ));

    let address = h.client.connect_wallet().await.unwrap();
    h.indexer
        .set_offers(vec![common::offer_between("mine", address, None, false)]);
    h.client.refresh_offers().await.unwrap();
    assert_eq!(h.client.my_offers().await.unwrap().len(), 1);
}

#[tokio::test]
async fn make_offer_submits_from_the_connected_wallet() {
    let h = harness(Vec::new());
    let mint_a = solana_sdk::pubkey::Pubkey::new_unique();
    let mint_b = solana_sdk::pubkey::Pubkey::new_unique();

    assert!(matches!(
        h.client.make_offer(1, mint_a, 10, mint_b, 20).await,
        Err(OffersSdkError::NotConnected)
    ));

    h.client.connect_wallet().await.unwrap();
    h.client.make_offer(1, mint_a, 10, mint_b, 20).await.unwrap();
    assert_eq!(h.wallet.submission_count(), 1);

    // Zero amounts never reach the wallet.
    assert!(h.client.make_offer(2, mint_a, 0, mint_b, 20).await.is_err());
    assert_eq!(h.wallet.submission_count(), 1);
}
