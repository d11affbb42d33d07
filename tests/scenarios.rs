use robin_table::KeyHasher;
use robin_table::SpookyHash;
use robin_table::Table;
use robin_table::capacity::fast_index;
use test_log::test;

#[derive(Debug, Clone, PartialEq)]
struct Carrier {
    val: usize,
}

/// Sends `alice` and `bob` to the same digest and everything else through
/// SpookyHash.
struct CollidingPair {
    inner: SpookyHash,
}

impl KeyHasher for CollidingPair {
    fn fold32(&self, payload: &[u8]) -> u32 {
        match payload {
            b"alice" | b"bob" => 0x1234_5678,
            other => self.inner.fold32(other),
        }
    }
}

#[test]
fn ten_keys_round_trip() {
    let mut table = Table::new(SpookyHash::new().unwrap());
    assert_eq!(table.length(), 50);

    for i in 0..10 {
        table.add(i.to_string(), Carrier { val: i });
    }

    for i in 0..10 {
        assert_eq!(
            table.get(i.to_string()),
            Some(&Carrier { val: i }),
            "{table:#?}"
        );
    }
    assert_eq!(table.get("999"), None);
    assert_eq!(table.len(), 10);
}

#[test]
#[cfg_attr(miri, ignore)]
fn million_keys_round_trip() {
    const COUNT: usize = 1_000_000;

    let mut table = Table::new(SpookyHash::with_seed(0x5EED));
    let initial_length = table.length();

    for i in 0..COUNT {
        table.add(i.to_string(), Carrier { val: i });
        assert!(table.len() <= table.capacity());
    }

    assert_eq!(table.len(), COUNT);
    assert!(table.length() > initial_length);
    assert!(table.capacity() < table.length());

    // keys whose digests collide may return each other's value
    let digest = |i: usize| table.hasher().fold32(i.to_string().as_bytes());
    for i in 0..COUNT {
        let found = table.get(i.to_string()).map(|c| c.val);
        assert!(found.is_some(), "key {i} missing");
        if let Some(val) = found.filter(|&val| val != i) {
            assert_eq!(digest(val), digest(i), "key {i} returned {val}");
        }
    }
}

#[test]
fn colliding_digests_share_a_run() {
    let mut table = Table::new(CollidingPair {
        inner: SpookyHash::with_seed(42),
    });

    table.add("alice", 1);
    table.add("bob", 2);

    let occupied = table
        .buckets()
        .iter()
        .filter(|b| b.is_occupied())
        .collect::<Vec<_>>();
    assert_eq!(occupied.len(), 2);
    assert!(occupied.iter().all(|b| b.hash() == 0x1234_5678));
    assert_eq!(
        occupied
            .iter()
            .filter(|b| b.probe_distance() > 0)
            .count(),
        1
    );

    assert!(table.get("alice").is_some());
    assert!(table.get("bob").is_some());

    let mut stored = table.iter().map(|(_, v)| *v).collect::<Vec<_>>();
    stored.sort();
    assert_eq!(stored, vec![1, 2]);
}

#[test]
fn identical_keys_give_identical_layouts() {
    let seed = SpookyHash::new().unwrap();
    let mut a = Table::new(seed);
    let mut b = Table::new(seed);

    for i in 0..5000u32 {
        a.add(i.to_string(), i);
        b.add(i.to_string(), i);
    }

    assert_eq!(a.length(), b.length());
    assert_eq!(a.capacity(), b.capacity());
    assert_eq!(a.buckets(), b.buckets());
}

#[test]
#[cfg_attr(miri, ignore)]
fn probe_distances_stay_small() {
    let mut table = Table::new(SpookyHash::new().unwrap());
    for i in 0..200_000u64 {
        table.add(format!("key-{i:x}"), i);
    }

    let max = table
        .buckets()
        .iter()
        .filter(|b| b.is_occupied())
        .map(|b| b.probe_distance())
        .max()
        .unwrap();
    let mean = table
        .buckets()
        .iter()
        .filter(|b| b.is_occupied())
        .map(|b| b.probe_distance() as f64)
        .sum::<f64>()
        / table.len() as f64;

    let bound = 4.0 * (table.len() as f64).ln() + 16.0;
    assert!((max as f64) < bound, "max probe distance {max} >= {bound}");
    assert!(mean < 4.0, "mean probe distance {mean}");
}

#[test]
fn every_entry_sits_at_or_after_its_ideal_index() {
    let mut table = Table::new(SpookyHash::new().unwrap());
    for i in 0..20_000u32 {
        table.add(i.to_le_bytes(), ());
    }

    for (index, bucket) in table.buckets().iter().enumerate() {
        if bucket.is_occupied() {
            let ideal = fast_index(bucket.hash(), table.capacity());
            assert_eq!(ideal + bucket.probe_distance() as usize, index);
        }
    }
}
