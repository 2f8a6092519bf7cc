//! carepoint-cli library root.
//!
//! Re-exports internal modules so integration tests can exercise config
//! handling and command output without a terminal or AWS.

pub mod aws;
pub mod commands;
pub mod config;
pub mod logging;
