//! Basic graph implementations.
//!
//! This module contains the adjacency-list connection graph and the sorted
//! address index it resolves endpoints through.

pub mod adjacency_graph;
pub mod sorted_index;

pub use adjacency_graph::{AdjacencyGraph, Edge, GraphConfig, GraphError};
pub use sorted_index::SortedIpIndex;
