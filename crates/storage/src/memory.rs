//! In-memory geo store.
//!
//! Mirrors the add/reposition semantics of Redis `GEOADD` without a server.
//! Used by tests and by dry runs of the loader.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use forecast_common::LoaderResult;

use crate::geo_store::{GeoMember, GeoStore};

#[derive(Default)]
pub struct MemoryGeoStore {
    keys: RwLock<HashMap<String, HashMap<String, (f64, f64)>>>,
    puts: AtomicU64,
}

impl MemoryGeoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Members stored under `key`, sorted by name.
    pub async fn members(&self, key: &str) -> Vec<GeoMember> {
        let keys = self.keys.read().await;
        let mut members: Vec<GeoMember> = keys
            .get(key)
            .map(|set| {
                set.iter()
                    .map(|(name, (lat, lon))| GeoMember {
                        name: name.clone(),
                        lat: *lat,
                        lon: *lon,
                    })
                    .collect()
            })
            .unwrap_or_default();
        members.sort_by(|a, b| a.name.cmp(&b.name));
        members
    }

    /// All keys, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.keys.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Total number of members across all keys.
    pub async fn member_count(&self) -> usize {
        self.keys.read().await.values().map(HashMap::len).sum()
    }

    /// Number of `put` calls received, including repositions.
    pub fn put_count(&self) -> u64 {
        self.puts.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl GeoStore for MemoryGeoStore {
    async fn put(&self, key: &str, member: &GeoMember) -> LoaderResult<u64> {
        self.puts.fetch_add(1, Ordering::Relaxed);

        let mut keys = self.keys.write().await;
        let previous = keys
            .entry(key.to_string())
            .or_default()
            .insert(member.name.clone(), (member.lat, member.lon));

        Ok(if previous.is_none() { 1 } else { 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, lat: f64, lon: f64) -> GeoMember {
        GeoMember {
            name: name.to_string(),
            lat,
            lon,
        }
    }

    #[tokio::test]
    async fn test_put_new_member() {
        let store = MemoryGeoStore::new();
        let added = store.put("100", &member("a", 1.0, 2.0)).await.unwrap();
        assert_eq!(added, 1);
        assert_eq!(store.members("100").await, vec![member("a", 1.0, 2.0)]);
    }

    #[tokio::test]
    async fn test_put_existing_member_repositions() {
        let store = MemoryGeoStore::new();
        store.put("100", &member("a", 1.0, 2.0)).await.unwrap();
        let added = store.put("100", &member("a", 3.0, 4.0)).await.unwrap();

        assert_eq!(added, 0);
        assert_eq!(store.members("100").await, vec![member("a", 3.0, 4.0)]);
        assert_eq!(store.put_count(), 2);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = MemoryGeoStore::new();
        store.put("100", &member("a", 1.0, 2.0)).await.unwrap();
        store.put("200", &member("a", 1.0, 2.0)).await.unwrap();

        assert_eq!(store.keys().await, vec!["100", "200"]);
        assert_eq!(store.member_count().await, 2);
        assert!(store.members("300").await.is_empty());
    }
}
