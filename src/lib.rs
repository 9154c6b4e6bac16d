//! # `ipgraph` - Connection-Log Graph Index
//!
//! Builds an in-memory index over a directed network-connection graph
//! (nodes are IPv4 addresses, edges are observed connections with a
//! weight) and answers, for any address, how many addresses it contacted,
//! how many contacted it, and which addresses it accessed ranked by how
//! heavily those addresses access others.
//!
//! ## Architecture
//!
//! Four structures are built in one pass and must agree on which node id
//! an address resolves to:
//!
//! 1. **Sorted address index** ([`graph::SortedIpIndex`]):
//!    - `IpKey` entries sorted by numeric value
//!    - binary search from text to node id, used by build and query
//!
//! 2. **Adjacency graph** ([`AdjacencyGraph`]):
//!    - dense node ids in log order
//!    - one out-edge list of `(target, weight)` per node
//!
//! 3. **Open-addressing hash table** ([`OpenAddressHashTable`]):
//!    - fixed prime capacity chosen from [`primes::close_primes`]
//!    - quadratic re-probing with explicit per-bucket overflow chains
//!    - never resized; tombstones are never reused
//!
//! 4. **Ranking heap** ([`RankingHeap`]):
//!    - fixed-capacity max-heap sized to one node's out-degree
//!    - ranks accessed addresses by their own out-degree
//!
//! [`SummaryEngine`] owns the graph and the table for one build + query
//! cycle. Everything is single-threaded; after the build both indices are
//! read-only.
//!
//! ## Example
//!
//! ```rust
//! use ipgraph::{EngineConfig, SummaryEngine};
//!
//! let log = [
//!     "2 1",
//!     "10.0.0.1",
//!     "10.0.0.2",
//!     "10.0.0.1:5000 10.0.0.2:22 5",
//! ];
//! let engine = SummaryEngine::build(log, EngineConfig::default()).unwrap();
//!
//! let report = engine.summarize("10.0.0.1").unwrap();
//! assert_eq!(report.degree_out, 1);
//! assert_eq!(report.degree_in, 0);
//! assert_eq!(report.accessed[0].ip, "10.0.0.2");
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod collections;
pub mod engine;
pub mod graph;
pub mod net;
pub mod primes;

pub use collections::{heap_sort, HashTableError, HeapError, OpenAddressHashTable, RankingHeap};
pub use engine::{
    CapacityChoice, EngineConfig, EngineError, IndexStats, RankedNeighbor, SummaryEngine,
    SummaryError, SummaryReport,
};
pub use graph::{AdjacencyGraph, Edge, GraphConfig, GraphError};
pub use net::{IpKey, IpParseError};
