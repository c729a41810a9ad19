pub mod actions;
pub mod client;
pub mod core;
pub mod error;
pub mod flow;
pub mod instructions;
pub mod metadata;
pub mod session;
pub mod store;
pub mod types;
pub mod utils;

pub use crate::client::OffersClient;
pub use crate::core::config::ClientConfig;
pub use crate::core::connection::SolConnection;
pub use crate::core::indexer::{GraphqlIndexer, OfferIndexer};
pub use crate::core::rpc::RpcConnection;
pub use crate::core::wallet::WalletProvider;
pub use crate::error::{OffersSdkError, Result};
pub use crate::flow::{TakeOfferFlow, TakeState};
pub use crate::metadata::TokenResolver;
pub use crate::session::{SessionState, WalletSession};
pub use crate::store::{OfferPage, OfferStore};
pub use crate::types::{Offer, TokenMetadata};
pub use crate::utils::{format_token_amount, truncate_address};
