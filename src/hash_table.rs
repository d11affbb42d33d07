use core::fmt::Debug;
use std::time::Instant;

use crate::bucket::Bucket;
use crate::capacity::fast_index;
use crate::capacity::next_growth_size;
use crate::capacity::usable_capacity;
use crate::config::TableConfig;
use crate::error::Error;
use crate::error::Result;
use crate::hasher::AnyHasher;
use crate::hasher::DefaultHasher;
use crate::hasher::HasherKind;
use crate::hasher::KeyHasher;

/// The entry the displacement engine was still carrying when it ran off the
/// end of the array. This is not necessarily the entry the caller asked to
/// place: an eviction along the way hands the caller's slot to the new entry
/// and continues with the evicted occupant.
#[derive(Debug)]
pub(crate) struct Overflow<V> {
    hash: u32,
    value: V,
}

/// Robin Hood insertion into `buckets`, whose first `capacity` slots are the
/// valid ideal indexes.
///
/// Walks forward from the ideal index. An occupant that sits closer to its
/// own ideal index than the carried entry does is evicted and carried on in
/// its place. The walk never wraps around.
pub(crate) fn place<V>(
    buckets: &mut [Bucket<V>],
    capacity: usize,
    mut hash: u32,
    mut value: V,
) -> core::result::Result<(), Overflow<V>> {
    let mut pos = fast_index(hash, capacity);
    let mut distance = 0u32;

    loop {
        let Some(bucket) = buckets.get_mut(pos) else {
            return Err(Overflow { hash, value });
        };

        if !bucket.is_occupied() {
            *bucket = Bucket {
                hash,
                probe_distance: distance,
                value: Some(value),
            };
            return Ok(());
        }

        if bucket.probe_distance < distance {
            if let Some(resident) = bucket.value.as_mut() {
                core::mem::swap(resident, &mut value);
            }
            core::mem::swap(&mut bucket.hash, &mut hash);
            core::mem::swap(&mut bucket.probe_distance, &mut distance);
        }

        pos += 1;
        distance += 1;
    }
}

fn empty_buckets<V>(length: usize) -> Vec<Bucket<V>> {
    let mut buckets = Vec::with_capacity(length);
    buckets.resize_with(length, Bucket::default);
    buckets
}

/// Statistics about the bucket array.
///
/// Compiled with the `stats` feature or in tests.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of occupied buckets
    pub load: usize,
    /// Number of slots that may serve as an ideal index
    pub capacity: usize,
    /// Physical number of buckets
    pub length: usize,
    /// Load factor as used by the growth trigger (load / length)
    pub load_factor: f64,
    /// Capacity utilization (load / capacity)
    pub capacity_utilization: f64,
    /// Largest probe distance of any entry
    pub max_probe_distance: u32,
    /// Mean probe distance over all entries
    pub mean_probe_distance: f64,
    /// Total memory in bytes used by the bucket array
    pub total_bytes: usize,
    /// Memory in bytes held by empty buckets
    pub wasted_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the statistics.
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Load: {}/{} buckets ({:.2}% load factor)",
            self.load,
            self.length,
            self.load_factor * 100.0
        );
        println!(
            "Capacity: {} usable ({:.2}% utilization)",
            self.capacity,
            self.capacity_utilization * 100.0
        );
        println!(
            "Probe distance: max {}, mean {:.3}",
            self.max_probe_distance, self.mean_probe_distance
        );
        println!("Total Allocated: {} bytes", self.total_bytes);
        println!(
            "Memory: {} bytes wasted ({:.02}%)",
            self.wasted_bytes,
            if self.total_bytes == 0 {
                0.0
            } else {
                (self.wasted_bytes as f64 / self.total_bytes as f64) * 100.0
            }
        );
    }
}

/// An open-addressing hash table keyed by byte strings, using Robin Hood
/// hashing with forward, non-wrapping displacement.
///
/// Keys are never stored. Each bucket keeps only the key's 32-bit digest as
/// produced by the table's [`KeyHasher`], so distinct keys whose digests
/// collide cannot be told apart. [`add`](Self::add) does not look for an
/// existing entry: adding a key twice stores it twice.
///
/// The table never shrinks. It grows before an insert once
/// `load / length` reaches the configured maximum load factor, and whenever
/// an insert runs off the end of the array.
///
/// ## Example
///
/// ```rust
/// # use robin_table::SpookyHash;
/// # use robin_table::Table;
/// #
/// let mut table = Table::new(SpookyHash::new()?);
/// table.add("apple", 3);
/// table.add("pear", 5);
///
/// assert_eq!(table.get("apple"), Some(&3));
/// assert_eq!(table.get("plum"), None);
/// # Ok::<(), robin_table::Error>(())
/// ```
#[derive(Clone)]
pub struct Table<V, H = DefaultHasher> {
    buckets: Vec<Bucket<V>>,
    capacity: usize,
    load: usize,
    config: TableConfig,
    hasher: H,
}

impl<V, H> Debug for Table<V, H>
where
    H: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Table")
            .field("hasher", &self.hasher)
            .field("length", &self.length())
            .field("capacity", &self.capacity)
            .field("load", &self.load)
            .field(
                "probe_distances",
                &self
                    .buckets
                    .chunks(16)
                    .map(|row| {
                        row.iter()
                            .map(|bucket| {
                                if bucket.is_occupied() {
                                    format!("{:02}", bucket.probe_distance)
                                } else {
                                    "..".to_string()
                                }
                            })
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<V> Table<V, AnyHasher> {
    /// Creates a table with default settings and a freshly keyed primitive of
    /// the given kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyGeneration`] if the OS random source fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_table::HasherKind;
    /// # use robin_table::Table;
    /// #
    /// let mut table = Table::with_kind(HasherKind::Spooky)?;
    /// table.add(b"key", "value");
    /// assert_eq!(table.get(b"key"), Some(&"value"));
    /// # Ok::<(), robin_table::Error>(())
    /// ```
    pub fn with_kind(kind: HasherKind) -> Result<Self> {
        Ok(Self::new(AnyHasher::new(kind)?))
    }
}

impl<V, H> Table<V, H>
where
    H: KeyHasher,
{
    /// Creates a table with the default configuration: 50 buckets, growth at
    /// a load factor of 0.8, shrink requests at 0.25.
    pub fn new(hasher: H) -> Self {
        let config = TableConfig::default();
        Self::from_validated(config, hasher)
    }

    /// Creates a table from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `config` fails validation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_table::SpookyHash;
    /// # use robin_table::Table;
    /// # use robin_table::TableConfig;
    /// #
    /// let config = TableConfig::default().initial_size(1000);
    /// let table: Table<u64, _> = Table::with_config(config, SpookyHash::with_seed(7))?;
    /// assert_eq!(table.length(), 1000);
    /// # Ok::<(), robin_table::Error>(())
    /// ```
    pub fn with_config(config: TableConfig, hasher: H) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_validated(config, hasher))
    }

    fn from_validated(config: TableConfig, hasher: H) -> Self {
        Self {
            buckets: empty_buckets(config.initial_size),
            capacity: usable_capacity(config.initial_size),
            load: 0,
            config,
            hasher,
        }
    }

    /// Inserts `value` under `key`.
    ///
    /// Grows the table first if the load factor has reached its maximum, and
    /// again as often as needed if the insert runs off the end of the array.
    ///
    /// # Panics
    ///
    /// Panics if a rebuild exhausts its enlargement attempts, see
    /// [`try_add`](Self::try_add).
    pub fn add(&mut self, key: impl AsRef<[u8]>, value: V) {
        if let Err(err) = self.try_add(key, value) {
            panic!("failed to insert into table: {err}");
        }
    }

    /// Inserts `value` under `key`, reporting a failure to grow instead of
    /// panicking.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GrowthExhausted`] if the table could not be rebuilt
    /// large enough to hold the entry. The entry the displacement engine was
    /// carrying at that point is dropped; it may be an entry inserted by an
    /// earlier call.
    pub fn try_add(&mut self, key: impl AsRef<[u8]>, value: V) -> Result<()> {
        let load_factor = self.load_factor();
        if load_factor >= self.config.max_load_factor || self.load >= self.capacity {
            self.grow()?;
        } else if self.length() > self.config.initial_size
            && load_factor <= self.config.min_load_factor
        {
            if let Err(err) = self.shrink() {
                log::trace!(
                    "Keeping {} buckets at load factor {load_factor:.3}: {err}",
                    self.length()
                );
            }
        }

        let hash = self.hasher.fold32(key.as_ref());
        let mut carried = match place(&mut self.buckets, self.capacity, hash, value) {
            Ok(()) => {
                self.load += 1;
                self.debug_check();
                return Ok(());
            }
            Err(carried) => carried,
        };

        for _ in 0..self.config.max_rebuild_attempts {
            log::trace!(
                "Probe ran past the end of {} buckets, growing",
                self.length()
            );
            self.grow()?;

            match place(&mut self.buckets, self.capacity, carried.hash, carried.value) {
                Ok(()) => {
                    self.load += 1;
                    self.debug_check();
                    return Ok(());
                }
                Err(next) => carried = next,
            }
        }

        log::warn!(
            "Dropping entry {:#010x} after {} growth attempts",
            carried.hash,
            self.config.max_rebuild_attempts
        );
        Err(Error::GrowthExhausted {
            length: self.length(),
            attempts: self.config.max_rebuild_attempts,
        })
    }

    /// Returns the value stored under `key`, if any.
    ///
    /// Only digests are compared: a key that was never added but shares its
    /// digest with one that was will find that entry's value.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&V> {
        let index = self.find_index(self.hasher.fold32(key.as_ref()))?;
        self.buckets[index].value.as_ref()
    }

    /// Returns a mutable reference to the value stored under `key`, if any.
    pub fn get_mut(&mut self, key: impl AsRef<[u8]>) -> Option<&mut V> {
        let index = self.find_index(self.hasher.fold32(key.as_ref()))?;
        self.buckets[index].value.as_mut()
    }

    /// Returns `true` if an entry with `key`'s digest is present.
    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.find_index(self.hasher.fold32(key.as_ref())).is_some()
    }

    fn find_index(&self, hash: u32) -> Option<usize> {
        let ideal = fast_index(hash, self.capacity);
        let bucket = &self.buckets[ideal];
        if !bucket.is_occupied() {
            return None;
        }
        if bucket.hash == hash && bucket.probe_distance == 0 {
            return Some(ideal);
        }

        // Every slot between an entry and its ideal index holds an entry
        // displaced at least as far, so the run ends at an empty slot or at
        // an entry sitting in its own ideal slot.
        for (index, bucket) in self.buckets.iter().enumerate().skip(ideal + 1) {
            if !bucket.is_occupied() || bucket.probe_distance == 0 {
                return None;
            }
            if bucket.hash == hash {
                return Some(index);
            }
        }

        None
    }

    /// Grows the bucket array to the next size of the growth policy and
    /// rehashes every entry into it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GrowthExhausted`] if the rebuild fails; the table is
    /// left unchanged.
    pub fn grow(&mut self) -> Result<()> {
        self.rebuild(next_growth_size(self.length()))
    }

    /// Rehashes every entry into a fresh array of `new_length` buckets.
    ///
    /// Entries are re-placed in physical order of the current array. If one
    /// runs off the end of the new array, the target grows by the configured
    /// initial size and placement restarts from the first entry. Targets
    /// shorter than the current length are raised to it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GrowthExhausted`] once the target has been enlarged
    /// the configured maximum number of times without success; the table is
    /// left unchanged.
    pub fn rebuild(&mut self, new_length: usize) -> Result<()> {
        let start = Instant::now();
        let old_length = self.length();
        let mut target = new_length.max(old_length);
        let mut attempts = 0;

        loop {
            let capacity = usable_capacity(target);
            if let Some(plan) = self.plan(target, capacity) {
                self.commit(plan, capacity);
                log::debug!(
                    "Rebuilt table from {old_length} to {target} buckets ({} entries) in {:?}",
                    self.load,
                    start.elapsed()
                );
                return Ok(());
            }

            if attempts == self.config.max_rebuild_attempts {
                log::warn!(
                    "Giving up rebuild of {} entries at {target} buckets after {attempts} attempts",
                    self.load
                );
                return Err(Error::GrowthExhausted {
                    length: target,
                    attempts,
                });
            }

            log::trace!(
                "Rebuild to {target} buckets ran past the end, retrying with {} more",
                self.config.initial_size
            );
            attempts += 1;
            target = target.saturating_add(self.config.initial_size);
        }
    }

    /// Lays out every live entry in an array of `length` buckets, recording
    /// the source index of each entry instead of moving its value.
    fn plan(&self, length: usize, capacity: usize) -> Option<Vec<Bucket<usize>>> {
        let mut plan = empty_buckets(length);
        for (index, bucket) in self.buckets.iter().enumerate() {
            if bucket.is_occupied() {
                place(&mut plan, capacity, bucket.hash, index).ok()?;
            }
        }

        Some(plan)
    }

    fn commit(&mut self, plan: Vec<Bucket<usize>>, capacity: usize) {
        let mut old = core::mem::take(&mut self.buckets);
        self.buckets = plan
            .into_iter()
            .map(|slot| Bucket {
                hash: slot.hash,
                probe_distance: slot.probe_distance,
                value: slot.value.and_then(|index| old[index].value.take()),
            })
            .collect();
        self.capacity = capacity;

        debug_assert_eq!(
            self.buckets.iter().filter(|b| b.is_occupied()).count(),
            self.load
        );
        self.debug_check();
    }

    /// Shrinking is not implemented; this always fails.
    ///
    /// [`add`](Self::add) requests a shrink whenever a grown table's load
    /// factor drops to the configured minimum.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::Unsupported`].
    pub fn shrink(&mut self) -> Result<()> {
        Err(Error::Unsupported {
            operation: "shrink",
        })
    }

    #[inline(always)]
    fn debug_check(&self) {
        debug_assert!(
            self.load <= self.capacity && self.capacity <= self.length(),
            "load {} / capacity {} / length {}",
            self.load,
            self.capacity,
            self.length()
        );
    }
}

impl<V, H> Table<V, H> {
    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.load
    }

    /// Returns `true` if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.load == 0
    }

    /// Physical length of the bucket array.
    pub fn length(&self) -> usize {
        self.buckets.len()
    }

    /// Number of slots that may serve as an ideal index. Always below
    /// [`length`](Self::length).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Length of the array the table was created with.
    pub fn init_size(&self) -> usize {
        self.config.initial_size
    }

    /// `len / length`, the ratio compared against the configured load
    /// factors.
    pub fn load_factor(&self) -> f64 {
        if self.buckets.is_empty() {
            0.0
        } else {
            self.load as f64 / self.buckets.len() as f64
        }
    }

    /// The table's configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// The hash primitive used for every key.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// The raw bucket array, empty slots included.
    pub fn buckets(&self) -> &[Bucket<V>] {
        &self.buckets
    }

    /// Iterates over `(digest, value)` of every entry in physical order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets.iter(),
            remaining: self.load,
        }
    }

    /// Counts entries by probe distance. Index `d` of the result holds the
    /// number of entries sitting `d` slots past their ideal index.
    ///
    /// Compiled with the `stats` feature or in tests.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> Vec<usize> {
        let mut hist = vec![0usize; self.max_probe_distance() as usize + 1];
        for bucket in self.buckets.iter().filter(|b| b.is_occupied()) {
            hist[bucket.probe_distance as usize] += 1;
        }
        hist
    }

    /// Largest probe distance of any entry, zero for an empty table.
    ///
    /// Compiled with the `stats` feature or in tests.
    #[cfg(any(test, feature = "stats"))]
    pub fn max_probe_distance(&self) -> u32 {
        self.buckets
            .iter()
            .filter(|b| b.is_occupied())
            .map(|b| b.probe_distance)
            .max()
            .unwrap_or(0)
    }

    /// Returns detailed utilization statistics.
    ///
    /// Compiled with the `stats` feature or in tests.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let length = self.length();
        let total_distance = self
            .buckets
            .iter()
            .filter(|b| b.is_occupied())
            .map(|b| b.probe_distance as u64)
            .sum::<u64>();
        let bucket_size = core::mem::size_of::<Bucket<V>>();

        DebugStats {
            load: self.load,
            capacity: self.capacity,
            length,
            load_factor: self.load_factor(),
            capacity_utilization: if self.capacity == 0 {
                0.0
            } else {
                self.load as f64 / self.capacity as f64
            },
            max_probe_distance: self.max_probe_distance(),
            mean_probe_distance: if self.load == 0 {
                0.0
            } else {
                total_distance as f64 / self.load as f64
            },
            total_bytes: length * bucket_size,
            wasted_bytes: (length - self.load) * bucket_size,
        }
    }

    /// Prints one line per probe distance to stdout: the share of entries at
    /// that distance, a bar scaled to the most common distance, and the count.
    ///
    /// Compiled with the `stats` feature or in tests.
    #[cfg(any(test, feature = "stats"))]
    pub fn print_probe_histogram(&self) {
        if self.load == 0 {
            println!("probe histogram: empty");
            return;
        }

        let hist = self.probe_histogram();
        let peak = hist.iter().copied().max().unwrap_or(0);
        println!("probe histogram ({} entries):", self.load);
        for (distance, &count) in hist.iter().enumerate() {
            let share = count as f64 * 100.0 / self.load as f64;
            println!(
                "{distance:>4} {share:>6.2}% {bar:<width$} {count}",
                bar = histogram_bar(count, peak, HISTOGRAM_WIDTH),
                width = HISTOGRAM_WIDTH,
            );
        }
    }
}

#[cfg(any(test, feature = "stats"))]
const HISTOGRAM_WIDTH: usize = 50;

/// `count` as a run of `#` out of `width`, relative to `peak`. Any non-zero
/// count gets at least one mark.
#[cfg(any(test, feature = "stats"))]
fn histogram_bar(count: usize, peak: usize, width: usize) -> String {
    if count == 0 || peak == 0 {
        return String::new();
    }
    let marks = (count as u128 * width as u128).div_ceil(peak as u128) as usize;
    "#".repeat(marks.min(width))
}

/// An iterator over the entries of a [`Table`] in physical order.
///
/// This struct is created by the [`iter`] method on [`Table`]. It yields the
/// stored digest alongside each value.
///
/// [`iter`]: Table::iter
pub struct Iter<'a, V> {
    buckets: core::slice::Iter<'a, Bucket<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (u32, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for bucket in self.buckets.by_ref() {
            if let Some(value) = bucket.value.as_ref() {
                self.remaining -= 1;
                return Some((bucket.hash, value));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<'a, V, H> IntoIterator for &'a Table<V, H> {
    type Item = (u32, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
