//! SQLite backend for the Pathway career-navigation store.
//!
//! The engine ([`schema`], [`probe`], [`upsert`], [`resolve`], [`seed`]) is
//! synchronous and works on a plain [`rusqlite::Connection`]. [`SqliteStore`]
//! wraps [`tokio_rusqlite`] so the engine runs on a dedicated thread without
//! blocking the async runtime.

mod encode;
mod store;

pub mod error;
pub mod probe;
pub mod resolve;
pub mod schema;
pub mod seed;
pub mod upsert;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
