//! shortlinks - short links with visit quotas and expiry
//!
//! Users are anonymous UUIDs. Each link maps a random code to a destination
//! URL, may be followed at most `max_visits` times and lives for a fixed TTL.
//! All state sits in one JSON file behind a read/write lock; a background
//! reaper thread removes expired links.
//!
//! # Architecture
//! - `storage`: data model and the JSON file repository
//! - `services`: link and user operations, the expiry reaper
//! - `interfaces`: one-shot CLI commands and the interactive console
//! - `config`: Configuration management
//! - `runtime`: Application startup wiring
//! - `system`: logging, notifications and the browser opener

pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
