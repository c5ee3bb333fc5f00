//! Core domain + orchestration logic for the Crypto Oracle Bot.
//!
//! This crate is intentionally framework-agnostic. Telegram / Coinbase /
//! CoinGecko / OpenAI live behind ports (traits) implemented in adapter
//! crates; everything here runs against stubs in tests.

pub mod classifier;
pub mod composer;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handler;
pub mod logging;
pub mod ports;

pub use errors::{Error, Result};
