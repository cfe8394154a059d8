//! Public extension contracts.
//!
//! The coordinator only depends on [`RefreshExchange`], so tests and downstream services can
//! swap the HTTP-backed token endpoint client for any other way of minting tokens.

pub mod refresh_exchange;

pub use refresh_exchange::*;
