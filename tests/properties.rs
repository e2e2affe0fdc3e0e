//! Property tests for write preconditions and snapshots.

use expiring_cache::{Cache, CacheError, Expiration};
use proptest::collection::hash_map;
use proptest::prelude::*;
use std::collections::HashMap;

fn key() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

proptest! {
    #[test]
    fn missing_keys_read_as_none(keys in proptest::collection::vec(key(), 1..20), probe in key()) {
        let cache = Cache::default();
        for key in &keys {
            cache.set(key.clone(), 0u8, Expiration::Never);
        }
        prop_assert_eq!(cache.get(&probe).is_some(), keys.contains(&probe));
    }

    #[test]
    fn add_only_fills_missing_keys(existing in hash_map(key(), any::<i64>(), 0..20), key in key(), value in any::<i64>()) {
        let cache = Cache::default();
        for (k, v) in &existing {
            cache.set(k.clone(), *v, Expiration::Never);
        }

        let result = cache.add(key.clone(), value, Expiration::Never);
        match existing.get(&key) {
            Some(old) => {
                prop_assert!(matches!(result, Err(CacheError::AlreadyExists(_))));
                prop_assert_eq!(cache.get(&key), Some(*old));
            }
            None => {
                prop_assert!(result.is_ok());
                prop_assert_eq!(cache.get(&key), Some(value));
            }
        }
        prop_assert_eq!(cache.item_count(), existing.len() + usize::from(!existing.contains_key(&key)));
    }

    #[test]
    fn replace_only_overwrites_existing_keys(existing in hash_map(key(), any::<i64>(), 0..20), key in key(), value in any::<i64>()) {
        let cache = Cache::default();
        for (k, v) in &existing {
            cache.set(k.clone(), *v, Expiration::Never);
        }

        let result = cache.replace(key.clone(), value, Expiration::Never);
        if existing.contains_key(&key) {
            prop_assert!(result.is_ok());
            prop_assert_eq!(cache.get(&key), Some(value));
        } else {
            prop_assert!(matches!(result, Err(CacheError::KeyNotFound(_))));
            prop_assert_eq!(cache.get(&key), None);
        }
        prop_assert_eq!(cache.item_count(), existing.len());
    }

    #[test]
    fn snapshot_restores_live_items(entries in hash_map(key(), any::<String>(), 0..50)) {
        let source = Cache::default();
        for (k, v) in &entries {
            source.set(k.clone(), v.clone(), Expiration::Never);
        }

        let mut snapshot = Vec::new();
        source.save(&mut snapshot).unwrap();

        let target = Cache::default();
        prop_assert_eq!(target.load(snapshot.as_slice()).unwrap(), entries.len());

        let restored: HashMap<String, String> = target
            .items()
            .into_iter()
            .map(|(k, entry)| (k, entry.into_value()))
            .collect();
        prop_assert_eq!(restored, entries);
    }

    #[test]
    fn load_never_clobbers_live_entries(
        snapshot_entries in hash_map(key(), any::<u32>(), 0..30),
        live_entries in hash_map(key(), any::<u32>(), 0..30),
    ) {
        let source = Cache::default();
        for (k, v) in &snapshot_entries {
            source.set(k.clone(), *v, Expiration::Never);
        }
        let mut snapshot = Vec::new();
        source.save(&mut snapshot).unwrap();

        let target = Cache::default();
        for (k, v) in &live_entries {
            target.set(k.clone(), *v, Expiration::Never);
        }
        target.load(snapshot.as_slice()).unwrap();

        for (k, v) in &live_entries {
            prop_assert_eq!(target.get(k), Some(*v));
        }
        for (k, v) in &snapshot_entries {
            if !live_entries.contains_key(k) {
                prop_assert_eq!(target.get(k), Some(*v));
            }
        }
    }
}
