//! Geo record writer tests against the in-memory store.

use std::sync::Arc;

use forecast_common::Coordinate;
use storage::{record_key, GeoRecordWriter, IdentityStrategy, MemoryGeoStore, StoredRecord};
use test_utils::{sample_entry, BASE_EPOCH};

fn setup(strategy: IdentityStrategy) -> (Arc<MemoryGeoStore>, GeoRecordWriter) {
    let store = Arc::new(MemoryGeoStore::new());
    let writer = GeoRecordWriter::new(store.clone(), strategy);
    (store, writer)
}

// ============================================================================
// Collision tests
// ============================================================================

#[tokio::test]
async fn test_same_timestamp_different_coordinates_both_stored() {
    let (store, writer) = setup(IdentityStrategy::Coordinate);
    let entry = sample_entry(BASE_EPOCH);

    let a = writer.write(&entry, Coordinate::new(40.0, -100.0)).await.unwrap();
    let b = writer.write(&entry, Coordinate::new(40.0, -99.5)).await.unwrap();

    assert_eq!((a, b), (1, 1));
    let members = store.members(&record_key(&entry)).await;
    assert_eq!(members.len(), 2);
    assert_ne!(members[0].name, members[1].name);
}

#[tokio::test]
async fn test_rewrite_same_coordinate_is_idempotent() {
    let (store, writer) = setup(IdentityStrategy::Coordinate);
    let entry = sample_entry(BASE_EPOCH);
    let c = Coordinate::new(12.0, 34.0);

    assert_eq!(writer.write(&entry, c).await.unwrap(), 1);
    assert_eq!(writer.write(&entry, c).await.unwrap(), 0);
    assert_eq!(store.member_count().await, 1);
}

#[tokio::test]
async fn test_random_identity_never_overwrites() {
    let (store, writer) = setup(IdentityStrategy::Random);
    let entry = sample_entry(BASE_EPOCH);
    let c = Coordinate::new(12.0, 34.0);

    writer.write(&entry, c).await.unwrap();
    writer.write(&entry, c).await.unwrap();

    assert_eq!(store.members(&record_key(&entry)).await.len(), 2);
}

#[tokio::test]
async fn test_entries_keyed_by_hour() {
    let (store, writer) = setup(IdentityStrategy::Coordinate);
    let c = Coordinate::new(0.0, 0.0);

    writer.write(&sample_entry(BASE_EPOCH), c).await.unwrap();
    writer.write(&sample_entry(BASE_EPOCH + 3600), c).await.unwrap();

    assert_eq!(
        store.keys().await,
        vec![BASE_EPOCH.to_string(), (BASE_EPOCH + 3600).to_string()]
    );
}

// ============================================================================
// Concurrency tests
// ============================================================================

#[tokio::test]
async fn test_concurrent_writes_all_land() {
    let (store, writer) = setup(IdentityStrategy::Coordinate);
    let entry = sample_entry(BASE_EPOCH);

    let writes = (0..50).map(|i| {
        let writer = writer.clone();
        let entry = entry.clone();
        tokio::spawn(async move {
            writer
                .write(&entry, Coordinate::new(10.0, i as f64 * 0.5))
                .await
        })
    });

    for result in futures::future::join_all(writes).await {
        assert_eq!(result.unwrap().unwrap(), 1);
    }
    assert_eq!(store.members(&BASE_EPOCH.to_string()).await.len(), 50);
}

#[test]
fn test_stored_member_is_positioned_at_given_coordinate() {
    let (store, writer) = setup(IdentityStrategy::Coordinate);
    let entry = sample_entry(BASE_EPOCH);
    let c = Coordinate::new(-12.5, 130.25);

    let members = tokio_test::block_on(async {
        writer.write(&entry, c).await.unwrap();
        store.members(&record_key(&entry)).await
    });

    assert_eq!(members.len(), 1);
    assert_eq!((members[0].lat, members[0].lon), (-12.5, 130.25));
    let record: StoredRecord = serde_json::from_str(&members[0].name).unwrap();
    assert_eq!(record.hourly, entry);
}
