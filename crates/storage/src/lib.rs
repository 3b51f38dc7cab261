//! Storage abstractions for the forecast grid loader.
//!
//! Provides:
//! - A geo-indexed store interface with Redis (GEOADD) and in-memory backends
//! - The record writer that turns forecast entries into positioned members

pub mod geo_store;
pub mod memory;
pub mod record;

pub use geo_store::{redis_url, GeoMember, GeoStore, RedisGeoStore};
pub use memory::MemoryGeoStore;
pub use record::{record_key, GeoRecordWriter, IdentityStrategy, StoredRecord};
