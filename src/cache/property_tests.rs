//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store contract over arbitrary keys, records
//! and operation sequences.

use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{ManualClock, MemoryBackend, RecordStore};
use crate::error::CacheError;
use crate::models::{Price, Record};

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 1000;
const TEST_TTL: Duration = Duration::from_secs(30 * 60);

fn new_store() -> (RecordStore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let backend = Arc::new(MemoryBackend::with_clock(TEST_MAX_ENTRIES, clock.clone()));
    (RecordStore::new(backend).with_prefix("prop:"), clock)
}

// == Strategies ==
/// Generates valid cache keys (non-empty, within length limit)
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:-]{1,64}"
}

fn price_strategy() -> impl Strategy<Value = Price> {
    (0u32..100_000, 0u32..100).prop_map(|(whole, cents)| {
        format!("{}.{:02}", whole, cents)
            .parse()
            .expect("generated price is a decimal")
    })
}

fn record_strategy() -> impl Strategy<Value = Record> {
    (valid_key_strategy(), "[a-zA-Z ]{0,32}", price_strategy())
        .prop_map(|(id, name, price)| Record::new(id, name, price))
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, record: Record },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    // Small key space so operations collide
    let key = "k[0-4]";
    prop_oneof![
        (key, record_strategy()).prop_map(|(key, record)| CacheOp::Put { key, record }),
        key.prop_map(|key| CacheOp::Get { key }),
        key.prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Keys never written always miss.
    #[test]
    fn prop_unwritten_key_misses(key in valid_key_strategy()) {
        let (store, _) = new_store();
        let result: Option<Record> = tokio_test::block_on(store.get(&key)).unwrap();
        prop_assert!(result.is_none());
    }

    // A put followed immediately by a get returns an equal record.
    #[test]
    fn prop_roundtrip_fidelity(key in valid_key_strategy(), record in record_strategy()) {
        let (store, _) = new_store();

        tokio_test::block_on(store.put(&key, &record, TEST_TTL)).unwrap();
        let cached: Option<Record> = tokio_test::block_on(store.get(&key)).unwrap();

        prop_assert_eq!(cached, Some(record));
    }

    // Delete after put leaves a miss; a second delete still succeeds.
    #[test]
    fn prop_delete_removes_entry(key in valid_key_strategy(), record in record_strategy()) {
        let (store, _) = new_store();

        tokio_test::block_on(store.put(&key, &record, TEST_TTL)).unwrap();
        tokio_test::block_on(store.delete(&key)).unwrap();
        tokio_test::block_on(store.delete(&key)).unwrap();

        let cached: Option<Record> = tokio_test::block_on(store.get(&key)).unwrap();
        prop_assert!(cached.is_none());
    }

    // The later of two puts wins.
    #[test]
    fn prop_last_write_wins(
        key in valid_key_strategy(),
        first in record_strategy(),
        second in record_strategy()
    ) {
        let (store, _) = new_store();

        tokio_test::block_on(store.put(&key, &first, TEST_TTL)).unwrap();
        tokio_test::block_on(store.put(&key, &second, TEST_TTL)).unwrap();

        let cached: Option<Record> = tokio_test::block_on(store.get(&key)).unwrap();
        prop_assert_eq!(cached, Some(second));
    }

    // Once the TTL has elapsed a read misses; before it, it hits.
    #[test]
    fn prop_ttl_expiration(
        key in valid_key_strategy(),
        record in record_strategy(),
        ttl_ms in 1u64..10_000
    ) {
        let (store, clock) = new_store();
        let ttl = Duration::from_millis(ttl_ms);

        tokio_test::block_on(store.put(&key, &record, ttl)).unwrap();
        clock.advance(ttl - Duration::from_millis(1));
        let before: Option<Record> = tokio_test::block_on(store.get(&key)).unwrap();
        prop_assert!(before.is_some());

        clock.advance(Duration::from_millis(1));
        let after: Option<Record> = tokio_test::block_on(store.get(&key)).unwrap();
        prop_assert!(after.is_none());
    }

    // A zero TTL is always rejected as malformed input.
    #[test]
    fn prop_zero_ttl_rejected(key in valid_key_strategy(), record in record_strategy()) {
        let (store, _) = new_store();

        let result = tokio_test::block_on(store.put(&key, &record, Duration::ZERO));
        prop_assert!(matches!(result, Err(CacheError::MalformedInput(_))));
        let cached: Option<Record> = tokio_test::block_on(store.get(&key)).unwrap();
        prop_assert!(cached.is_none());
    }

    // The store agrees with a plain map model over any operation sequence,
    // and the hit/miss counters match what callers observed.
    #[test]
    fn prop_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let (store, _) = new_store();
        let mut model: HashMap<String, Record> = HashMap::new();
        let mut expected_hits = 0u64;
        let mut expected_misses = 0u64;

        for op in ops {
            match op {
                CacheOp::Put { key, record } => {
                    tokio_test::block_on(store.put(&key, &record, TEST_TTL)).unwrap();
                    model.insert(key, record);
                }
                CacheOp::Get { key } => {
                    let cached: Option<Record> = tokio_test::block_on(store.get(&key)).unwrap();
                    if cached.is_some() {
                        expected_hits += 1;
                    } else {
                        expected_misses += 1;
                    }
                    prop_assert_eq!(cached.as_ref(), model.get(&key));
                }
                CacheOp::Delete { key } => {
                    tokio_test::block_on(store.delete(&key)).unwrap();
                    model.remove(&key);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.errors, 0);
    }
}

// Capacity bound on the memory backend
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_capacity_enforcement(keys in prop::collection::vec(valid_key_strategy(), 1..200)) {
        let max_entries = 50;
        let backend = Arc::new(MemoryBackend::new(max_entries));
        let store = RecordStore::new(backend.clone());

        for key in keys {
            let record = Record::new(key.clone(), "item", "1.00".parse().unwrap());
            tokio_test::block_on(store.put(&key, &record, TEST_TTL)).unwrap();
            let len = tokio_test::block_on(backend.len());
            prop_assert!(len <= max_entries, "Cache size {} exceeds max {}", len, max_entries);
        }
    }
}
