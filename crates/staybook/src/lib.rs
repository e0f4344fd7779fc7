//! Client-side core for the Staybook marketplace.
//!
//! The interesting logic of the product (availability matching, profit
//! aggregation, host statistics, and poll-based notification reconciliation)
//! lives in [`marketplace`] as pure functions over data fetched from the
//! remote marketplace API. Networking is isolated behind the
//! [`marketplace::client::MarketplaceApi`] trait so every component can be
//! exercised without a server.

pub mod config;
pub mod error;
pub mod marketplace;
pub mod telemetry;
