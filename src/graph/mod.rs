//! Connection graphs over dense node ids.
//!
//! Graph implementations are organized into categories:
//! - `basic`: the adjacency-list graph and its sorted address index

pub mod basic;

// Re-export commonly used types from submodules
pub use basic::{AdjacencyGraph, Edge, GraphConfig, GraphError, SortedIpIndex};
