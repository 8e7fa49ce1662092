//! Posterdeck - poster and metadata aggregation
//!
//! This library crate exposes the core functionality for integration testing.

pub mod cache;
pub mod caption;
pub mod config;
pub mod images;
pub mod metadata;
pub mod query;
pub mod server;
pub mod session;
pub mod sources;

#[cfg(test)]
pub(crate) mod testing;
