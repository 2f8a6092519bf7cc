//! carepoint-storage
//!
//! The record service boundary. A [`service::RecordService`] trait over three
//! tables of loosely-shaped records, backed either by S3 (thin wrapper around
//! the AWS S3 SDK) or by memory.

pub mod client;
pub mod error;
pub mod memory;
pub mod objects;
pub mod s3;
pub mod sequence;
pub mod service;
