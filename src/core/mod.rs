pub mod config;
pub mod connection;
pub mod indexer;
pub mod rpc;
pub mod wallet;
