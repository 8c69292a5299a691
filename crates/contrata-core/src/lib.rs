//! Core types and workflows for the Contrata recruiting tool.
//!
//! This crate has no HTTP or database dependencies. Storage and identity
//! are reached through the traits in [`store`] and [`identity`]; the server
//! implements them over SQLite and the terminal client over HTTP.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod candidate;
pub mod demo;
pub mod error;
pub mod identity;
pub mod intake;
pub mod review;
pub mod session;
pub mod store;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
