//! Geo-indexed key/value store interface and its Redis backend.

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, Client};
use serde::{Deserialize, Serialize};
use tracing::debug;

use forecast_common::{LoaderError, LoaderResult};

/// A named member positioned at a coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoMember {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// A store mapping each key to a set of positioned members.
///
/// Implementations must accept concurrent `put` calls; each call is atomic.
#[async_trait]
pub trait GeoStore: Send + Sync {
    /// Add or reposition `member` under `key`.
    ///
    /// Returns the number of members newly added (0 when the member already
    /// existed and was only repositioned).
    async fn put(&self, key: &str, member: &GeoMember) -> LoaderResult<u64>;
}

/// Turn a bare `host:port` address into a Redis connection URL.
pub fn redis_url(address: &str) -> String {
    let address = address.trim();
    if address.contains("://") {
        address.to_string()
    } else {
        format!("redis://{}", address)
    }
}

/// Redis-backed geo store using `GEOADD`.
///
/// Redis rejects latitudes beyond ±85.05112878°; such writes fail with a
/// store error like any other.
#[derive(Clone)]
pub struct RedisGeoStore {
    conn: MultiplexedConnection,
}

impl RedisGeoStore {
    /// Connect to Redis. Accepts either a URL or a bare `host:port`.
    pub async fn connect(address: &str) -> LoaderResult<Self> {
        let url = redis_url(address);
        let client = Client::open(url.as_str())
            .map_err(|e| LoaderError::Store(format!("Redis connection failed: {}", e)))?;

        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| LoaderError::Store(format!("Redis connection failed: {}", e)))?;

        debug!(url = %url, "Connected to Redis");
        Ok(Self { conn })
    }
}

#[async_trait]
impl GeoStore for RedisGeoStore {
    async fn put(&self, key: &str, member: &GeoMember) -> LoaderResult<u64> {
        // Multiplexed connections are cheap to clone and safe to share.
        let mut conn = self.conn.clone();

        let added: u64 = redis::cmd("GEOADD")
            .arg(key)
            .arg(member.lon)
            .arg(member.lat)
            .arg(&member.name)
            .query_async(&mut conn)
            .await
            .map_err(|e| LoaderError::Store(format!("GEOADD failed: {}", e)))?;

        Ok(added)
    }
}
