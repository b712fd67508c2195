pub mod catalog;
pub mod config;
pub mod intake;
pub mod review_store;
pub mod server;
