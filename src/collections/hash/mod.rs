//! Hash-based collections.

pub mod open_address;

pub use open_address::{BucketStatus, HashBucket, HashTableError, OpenAddressHashTable};
