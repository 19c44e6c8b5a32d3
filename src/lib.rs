// src/lib.rs

//! coinpoll library
//!
//! Fetches CoinMarketCap listings on a fixed interval, prints them, writes a
//! JSON snapshot and upserts every coin into a key-value table.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
