//! External integrations
//!
//! Adapters for everything outside the transform core: the staging
//! source the raw batches come from, the analytical warehouse the tables
//! land in, and the local Parquet fallback used when the warehouse is
//! unavailable.

pub mod parquet;
pub mod staging;
pub mod warehouse;
