//! Fixed-capacity collections backing the connection index.
//!
//! Collections are organized by data structure type:
//! - `hash`: the open-addressing hash table
//! - `other`: the ranking heap

pub mod hash;
pub mod other;

// Re-export commonly used types from submodules
pub use hash::{BucketStatus, HashBucket, HashTableError, OpenAddressHashTable};
pub use other::{heap_sort, HeapError, RankingHeap};
