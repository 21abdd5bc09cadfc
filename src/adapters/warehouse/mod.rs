//! Analytical warehouse adapter (primary sink)
//!
//! REST client for the networked warehouse, addressed by project and
//! dataset identifiers. Every write is a whole-table replace, so loading
//! the same table set twice leaves exactly one copy of the final state.

pub mod client;

pub use client::WarehouseClient;
