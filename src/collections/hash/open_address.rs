//! `OpenAddressHashTable`: a fixed-capacity hash table with quadratic
//! re-probing and per-bucket overflow chains.
//!
//! Layout:
//! - a boxed slice of buckets allocated once; the table never grows
//! - `home = key mod capacity`
//! - on a home collision the key is placed at the first `Empty` bucket of
//!   `home + i²` (`i = 1, 2, …`) and that bucket's index is appended to the
//!   home bucket's overflow chain
//!
//! Lookups never re-run the probe sequence. They check the home bucket and
//! then walk its overflow chain, so every displaced insert must register
//! itself in its home chain.
//!
//! Deleted buckets become tombstones and are never reused. A tombstoned
//! home bucket keeps its overflow chain so keys displaced from it stay
//! reachable.
//!
//! ### Performance Characteristics
//! | Operation | Complexity | Notes |
//! |-----------|------------|-------|
//! | `insert` | \(O(\text{capacity})\) worst case | Probe bounded at `capacity` steps |
//! | `find` | \(O(1 + \text{chain})\) | Home bucket + its overflow chain |
//! | `remove` | \(O(1 + \text{chain})\) | Chain erase is a linear scan |
//! | `data_at` | \(O(1)\) | Direct bucket access |

use num_traits::{PrimInt, Unsigned};
use thiserror::Error;

/// Error returned by fallible table operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HashTableError {
    /// The table already holds `capacity` elements.
    #[error("hash table is full ({capacity} elements)")]
    CapacityExceeded {
        /// Fixed table capacity.
        capacity: usize,
    },
    /// The key is already stored at `index`.
    #[error("key already present at bucket {index}")]
    DuplicateKey {
        /// Bucket currently holding the key.
        index: usize,
    },
    /// The key is not in the table.
    #[error("key not found")]
    NotFound,
    /// No `Empty` bucket is reachable from `home` by quadratic re-probing.
    #[error("no empty bucket reachable from home bucket {home} (capacity {capacity})")]
    ProbeExhausted {
        /// Home bucket of the rejected key.
        home: usize,
        /// Fixed table capacity.
        capacity: usize,
    },
}

/// Lifecycle state of a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BucketStatus {
    /// Never written.
    #[default]
    Empty,
    /// Holds a live key/value pair.
    Occupied,
    /// Held a pair that was removed; never written again.
    Tombstoned,
}

/// One slot of the table.
#[derive(Debug, Clone)]
pub struct HashBucket<K, V> {
    key: K,
    value: Option<V>,
    status: BucketStatus,
    /// Buckets holding keys whose home is this bucket but that were
    /// displaced by a collision, in insertion order.
    overflow: Vec<usize>,
}

impl<K: PrimInt, V> HashBucket<K, V> {
    fn empty() -> Self {
        Self {
            key: K::zero(),
            value: None,
            status: BucketStatus::Empty,
            overflow: Vec::new(),
        }
    }
}

impl<K: Copy, V> HashBucket<K, V> {
    /// Stored key. Meaningful only while the bucket is `Occupied`.
    pub fn key(&self) -> K {
        self.key
    }

    /// Stored value, `None` unless the bucket is `Occupied`.
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Current lifecycle state.
    pub fn status(&self) -> BucketStatus {
        self.status
    }

    /// Overflow chain recorded against this bucket as a home.
    pub fn overflow_indices(&self) -> &[usize] {
        &self.overflow
    }

    fn is_occupied_by(&self, key: K) -> bool
    where
        K: PartialEq,
    {
        self.status == BucketStatus::Occupied && self.key == key
    }
}

/// Fixed-capacity associative index from an unsigned integer key to `V`.
#[derive(Debug, Clone)]
pub struct OpenAddressHashTable<K, V> {
    buckets: Box<[HashBucket<K, V>]>,
    /// Number of `Occupied` buckets.
    len: usize,
    /// Total probe steps taken by successful inserts.
    collisions: usize,
}

impl<K, V> OpenAddressHashTable<K, V>
where
    K: PrimInt + Unsigned,
{
    /// Allocates `capacity` empty buckets.
    ///
    /// The table does not check primality; a prime capacity (see
    /// [`crate::primes::close_primes`]) reduces clustering.
    pub fn new(capacity: usize) -> Self {
        let buckets = (0..capacity).map(|_| HashBucket::empty()).collect();
        Self {
            buckets,
            len: 0,
            collisions: 0,
        }
    }

    /// Fixed number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no element is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Probe steps taken by all successful inserts so far.
    pub fn collision_count(&self) -> usize {
        self.collisions
    }

    /// `len / capacity`, or 0 for a zero-capacity table.
    #[allow(clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        if self.buckets.is_empty() {
            0.0
        } else {
            self.len as f64 / self.buckets.len() as f64
        }
    }

    /// Home bucket of `key`. Callers guarantee a non-zero capacity.
    fn home_index(&self, key: K) -> usize {
        let capacity = self.buckets.len();
        // A capacity that does not fit in `K` exceeds every key already.
        let reduced = match K::from(capacity) {
            Some(modulus) => key % modulus,
            None => key,
        };
        reduced.to_usize().unwrap_or_default()
    }

    /// Inserts `key → value` and returns the bucket it landed in.
    ///
    /// # Errors
    /// - [`HashTableError::CapacityExceeded`] if the table is full.
    /// - [`HashTableError::DuplicateKey`] if `key` is already present.
    /// - [`HashTableError::ProbeExhausted`] if re-probing reaches no
    ///   `Empty` bucket. The table is left unchanged.
    pub fn insert(&mut self, key: K, value: V) -> Result<usize, HashTableError> {
        let capacity = self.buckets.len();
        if self.len == capacity {
            return Err(HashTableError::CapacityExceeded { capacity });
        }
        if let Some(index) = self.find(key) {
            return Err(HashTableError::DuplicateKey { index });
        }

        let home = self.home_index(key);
        let target = if self.buckets[home].status == BucketStatus::Empty {
            home
        } else {
            let (slot, steps) = self.probe_empty(home)?;
            self.collisions += steps;
            self.buckets[home].overflow.push(slot);
            slot
        };

        let bucket = &mut self.buckets[target];
        bucket.key = key;
        bucket.value = Some(value);
        bucket.status = BucketStatus::Occupied;
        self.len += 1;
        Ok(target)
    }

    /// Walks `home + i²` for `i = 1..capacity` and returns the first
    /// `Empty` bucket with the number of steps taken.
    ///
    /// `(i + capacity)² ≡ i² (mod capacity)`, so every reachable bucket is
    /// visited within `capacity - 1` steps.
    fn probe_empty(&self, home: usize) -> Result<(usize, usize), HashTableError> {
        let capacity = self.buckets.len();
        // Running value of i² mod capacity: (i-1)² + 2i - 1 = i².
        let mut offset = 0usize;
        for i in 1..capacity {
            offset = (offset + 2 * i - 1) % capacity;
            let slot = (home + offset) % capacity;
            if self.buckets[slot].status == BucketStatus::Empty {
                return Ok((slot, i));
            }
        }
        Err(HashTableError::ProbeExhausted { home, capacity })
    }

    /// Returns the bucket index holding `key`.
    ///
    /// Checks the home bucket, then the home bucket's overflow chain. The
    /// probe sequence is not replayed.
    pub fn find(&self, key: K) -> Option<usize> {
        if self.buckets.is_empty() {
            return None;
        }
        let home = self.home_index(key);
        let bucket = &self.buckets[home];
        if bucket.is_occupied_by(key) {
            return Some(home);
        }
        bucket
            .overflow
            .iter()
            .copied()
            .find(|&index| self.buckets[index].is_occupied_by(key))
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: K) -> Option<&V> {
        self.find(key).and_then(|index| self.data_at(index))
    }

    /// Returns `true` if `key` is stored.
    pub fn contains_key(&self, key: K) -> bool {
        self.find(key).is_some()
    }

    /// Value of the bucket at `index`, if it is occupied.
    pub fn data_at(&self, index: usize) -> Option<&V> {
        self.buckets.get(index).and_then(HashBucket::value)
    }

    /// The bucket at `index`.
    pub fn bucket(&self, index: usize) -> Option<&HashBucket<K, V>> {
        self.buckets.get(index)
    }

    /// Overflow chain recorded against bucket `index` as a home.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn overflow_indices(&self, index: usize) -> &[usize] {
        assert!(index < self.buckets.len(), "bucket {index} out of bounds");
        &self.buckets[index].overflow
    }

    /// Removes `key`, tombstones its bucket and returns the value.
    ///
    /// If the key was displaced, its bucket index is erased from the home
    /// bucket's overflow chain.
    ///
    /// # Errors
    /// [`HashTableError::NotFound`] if `key` is absent.
    pub fn remove(&mut self, key: K) -> Result<V, HashTableError> {
        let index = self.find(key).ok_or(HashTableError::NotFound)?;
        let home = self.home_index(key);
        if index != home {
            let chain = &mut self.buckets[home].overflow;
            if let Some(pos) = chain.iter().position(|&i| i == index) {
                chain.remove(pos);
            }
        }
        let bucket = &mut self.buckets[index];
        bucket.status = BucketStatus::Tombstoned;
        self.len -= 1;
        bucket.value.take().ok_or(HashTableError::NotFound)
    }

    /// Iterates over occupied buckets as `(index, key, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, K, &V)> + '_ {
        self.buckets.iter().enumerate().filter_map(|(index, bucket)| {
            match (bucket.status, bucket.value.as_ref()) {
                (BucketStatus::Occupied, Some(value)) => Some((index, bucket.key, value)),
                _ => None,
            }
        })
    }
}
