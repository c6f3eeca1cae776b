//! Filename parsing, address matching, freshness, storage, and config loading.

pub mod config;
pub mod device_memory;
pub mod device_pg;
pub mod filename;
pub mod freshness;
pub mod ip_range;
pub mod logger;
pub mod repository;
pub mod store;
