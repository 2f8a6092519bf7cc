//! carepoint-core
//!
//! Domain types, the symptom catalog, list filtering and record key
//! conventions. Nothing here talks to AWS.

pub mod catalog;
pub mod error;
pub mod filter;
pub mod models;
pub mod record_keys;
pub mod summary;
