//! Other collections used by the ranking pass.

pub mod ranking_heap;

pub use ranking_heap::{heap_sort, HeapError, RankingHeap};
