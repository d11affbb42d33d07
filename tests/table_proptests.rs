use std::collections::HashSet;

use proptest::prelude::*;
use robin_table::KeyHasher;
use robin_table::SpookyHash;
use robin_table::Table;
use robin_table::TableConfig;
use robin_table::capacity::fast_index;
use robin_table::capacity::next_growth_size;
use robin_table::capacity::usable_capacity;

proptest! {
    // Every key with a unique digest reads back its own value, and the size
    // invariants hold after each insert.
    #[test]
    fn prop_round_trip(
        seed in any::<u32>(),
        initial_size in 2usize..300,
        keys in proptest::collection::hash_set(proptest::collection::vec(any::<u8>(), 0..24), 1..400),
    ) {
        let config = TableConfig::default().initial_size(initial_size);
        let mut table = Table::with_config(config, SpookyHash::with_seed(seed)).unwrap();

        let mut digests = HashSet::new();
        let mut inserted = Vec::new();
        for (i, key) in keys.into_iter().enumerate() {
            if !digests.insert(table.hasher().fold32(&key)) {
                continue;
            }
            table.add(&key, i);
            inserted.push((key, i));

            prop_assert!(table.len() <= table.capacity());
            prop_assert!(table.capacity() < table.length());
        }

        prop_assert_eq!(table.len(), inserted.len());
        for (key, i) in &inserted {
            prop_assert_eq!(table.get(key), Some(i));
        }
    }

    // Identical key material and insertion order give bit-identical tables.
    #[test]
    fn prop_deterministic_layout(
        seed in any::<u32>(),
        keys in proptest::collection::vec(any::<u64>(), 0..500),
    ) {
        let mut a = Table::new(SpookyHash::with_seed(seed));
        let mut b = Table::new(SpookyHash::with_seed(seed));
        for key in &keys {
            a.add(key.to_le_bytes(), *key);
            b.add(key.to_le_bytes(), *key);
        }

        prop_assert_eq!(a.length(), b.length());
        prop_assert_eq!(a.buckets(), b.buckets());
    }

    // Entries only ever move forward from their ideal index, and the run
    // between them is never broken by an empty slot.
    #[test]
    fn prop_placement(
        seed in any::<u32>(),
        count in 0usize..2000,
    ) {
        let mut table = Table::new(SpookyHash::with_seed(seed));
        for i in 0..count {
            table.add(i.to_string(), ());
        }

        let buckets = table.buckets();
        for (index, bucket) in buckets.iter().enumerate() {
            if !bucket.is_occupied() {
                continue;
            }
            let ideal = fast_index(bucket.hash(), table.capacity());
            prop_assert_eq!(ideal + bucket.probe_distance() as usize, index);
            for between in &buckets[ideal..index] {
                prop_assert!(between.is_occupied());
            }
        }
    }

    #[test]
    fn prop_growth_is_monotonic(len in 2usize..(1 << 48)) {
        let next = next_growth_size(len);
        prop_assert!(next > len);
        prop_assert!(usable_capacity(next) >= usable_capacity(len));
    }
}
