//! Core types and trait definitions for the Pathway career-navigation store.
//!
//! This crate is deliberately free of database dependencies. Seed records
//! arrive as already-parsed field mappings (`serde_json::Value` objects) and
//! are turned into typed seeds here; storage backends consume those.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
#![allow(async_fn_in_trait)]

pub mod activity;
pub mod error;
pub mod report;
pub mod schema;
pub mod seed;
pub mod store;

pub use error::{Error, Result};
