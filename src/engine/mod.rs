//! `SummaryEngine` builds the connection graph and its hash index, then
//! answers per-address summaries.
//!
//! Build phase: log → [`AdjacencyGraph`] → [`OpenAddressHashTable`] keyed
//! by numeric address, holding a snapshot of each node after degree
//! counting. The table capacity is one of five primes just above the node
//! count, picked by the operator.
//!
//! Query phase: address → binary search → hash lookup → walk out-edges →
//! [`RankingHeap`] → ranked report.

pub mod report;

use std::io::BufRead;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collections::{HashTableError, HeapError, OpenAddressHashTable, RankingHeap};
use crate::graph::{AdjacencyGraph, GraphConfig, GraphError};
use crate::net::{IpKey, IpParseError};
use crate::primes::{close_primes, CANDIDATE_COUNT};

pub use report::{IndexStats, RankedNeighbor, SummaryReport};

/// Error that aborts an engine build.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The log could not be turned into a graph.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// The capacity selector is outside `1..=5`.
    #[error("invalid configuration: capacity choice {0} is outside 1..=5")]
    InvalidConfiguration(u8),
    /// A node could not be inserted into the hash index. With the densest
    /// capacities this is usually [`HashTableError::ProbeExhausted`].
    #[error("indexing {ip}: {source}")]
    Index {
        /// Address being inserted.
        ip: String,
        /// Table failure.
        #[source]
        source: HashTableError,
    },
}

/// Recoverable per-query failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummaryError {
    /// The queried text is not a dotted quad.
    #[error(transparent)]
    InvalidIp(#[from] IpParseError),
    /// The address is not a node of the graph.
    #[error("{0} not found in the connection log")]
    NotFoundInGraph(String),
    /// The address is in the graph but not in the hash index.
    #[error("{0} not found in the hash index")]
    NotFoundInIndex(String),
    /// The ranking heap was misused.
    #[error(transparent)]
    Heap(#[from] HeapError),
}

/// Which of the five prime candidates becomes the table capacity.
///
/// Every candidate exceeds the node count, but quadratic re-probing only
/// reaches about half of a prime-sized table. Choices 1 and 2 keep the load
/// factor near 1 and can fail with [`HashTableError::ProbeExhausted`] even
/// on small graphs whose addresses share a home bucket; choice 5 is the
/// safest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CapacityChoice(u8);

impl CapacityChoice {
    /// Smallest valid choice.
    pub const MIN: u8 = 1;
    /// Largest valid choice.
    #[allow(clippy::cast_possible_truncation)]
    pub const MAX: u8 = CANDIDATE_COUNT as u8;

    /// Validates a 1-based choice.
    ///
    /// # Errors
    /// [`EngineError::InvalidConfiguration`] outside `1..=5`.
    pub fn new(choice: u8) -> Result<Self, EngineError> {
        if (Self::MIN..=Self::MAX).contains(&choice) {
            Ok(Self(choice))
        } else {
            Err(EngineError::InvalidConfiguration(choice))
        }
    }

    /// The 1-based choice.
    pub fn get(self) -> u8 {
        self.0
    }

    fn slot(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl Default for CapacityChoice {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<u8> for CapacityChoice {
    type Error = EngineError;

    fn try_from(choice: u8) -> Result<Self, Self::Error> {
        Self::new(choice)
    }
}

impl From<CapacityChoice> for u8 {
    fn from(choice: CapacityChoice) -> Self {
        choice.0
    }
}

/// Operator configuration for one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Capacity candidate selector.
    pub capacity_choice: CapacityChoice,
    /// Graph construction options.
    pub graph: GraphConfig,
}

/// Owns the graph and its hash index for one build + query cycle.
#[derive(Debug, Clone)]
pub struct SummaryEngine {
    graph: AdjacencyGraph,
    table: OpenAddressHashTable<u32, IpKey>,
    candidates: [usize; CANDIDATE_COUNT],
    choice: CapacityChoice,
}

impl SummaryEngine {
    /// Wraps a built graph with an empty hash index of the chosen capacity.
    ///
    /// Every candidate is a prime strictly above the node count, so the
    /// table always has room for every node. Call [`Self::build_index`]
    /// before summarizing.
    pub fn new(graph: AdjacencyGraph, choice: CapacityChoice) -> Self {
        let candidates = close_primes(graph.node_count());
        let capacity = candidates[choice.slot()];
        Self {
            graph,
            table: OpenAddressHashTable::new(capacity),
            candidates,
            choice,
        }
    }

    /// Builds the graph from log lines and indexes it.
    ///
    /// # Errors
    /// Any [`EngineError`]; nothing partial is returned.
    pub fn build<I, S>(lines: I, config: EngineConfig) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let graph = AdjacencyGraph::build(lines, config.graph)?;
        Self::indexed(graph, config.capacity_choice)
    }

    /// Builds from a buffered reader. See [`Self::build`].
    ///
    /// # Errors
    /// Any [`EngineError`].
    pub fn from_reader<R: BufRead>(reader: R, config: EngineConfig) -> Result<Self, EngineError> {
        let graph = AdjacencyGraph::from_reader(reader, config.graph)?;
        Self::indexed(graph, config.capacity_choice)
    }

    /// Builds from a log file. See [`Self::build`].
    ///
    /// # Errors
    /// Any [`EngineError`], including a wrapped
    /// [`GraphError::FileNotFound`].
    pub fn from_path(path: impl AsRef<Path>, config: EngineConfig) -> Result<Self, EngineError> {
        let graph = AdjacencyGraph::from_path(path, config.graph)?;
        Self::indexed(graph, config.capacity_choice)
    }

    fn indexed(graph: AdjacencyGraph, choice: CapacityChoice) -> Result<Self, EngineError> {
        let mut engine = Self::new(graph, choice);
        engine.build_index()?;
        Ok(engine)
    }

    /// Inserts every node into a fresh hash index, keyed by numeric address.
    ///
    /// Nodes are inserted in ascending address order. Rebuilding replaces
    /// the previous index and its collision count.
    ///
    /// # Errors
    /// [`EngineError::Index`] wrapping the first failed insert.
    pub fn build_index(&mut self) -> Result<(), EngineError> {
        let mut table = OpenAddressHashTable::new(self.capacity());
        for key in self.graph.index().iter() {
            table
                .insert(key.value(), key.clone())
                .map_err(|source| EngineError::Index {
                    ip: key.text().to_owned(),
                    source,
                })?;
        }
        self.table = table;
        #[cfg(feature = "tracing")]
        tracing::info!(
            capacity = self.table.capacity(),
            elements = self.table.len(),
            collisions = self.table.collision_count(),
            "hash index built"
        );
        Ok(())
    }

    /// Summarizes one address: its degrees and the addresses it accessed,
    /// ranked by their own out-degree.
    ///
    /// # Errors
    /// - [`SummaryError::InvalidIp`] if `ip` is not a dotted quad.
    /// - [`SummaryError::NotFoundInGraph`] if the address is not a node.
    /// - [`SummaryError::NotFoundInIndex`] if the graph and the hash index
    ///   disagree (index not built, or a build bug).
    pub fn summarize(&self, ip: &str) -> Result<SummaryReport, SummaryError> {
        #[cfg(feature = "tracing")]
        tracing::debug!(ip, "summarizing");
        let entry = self
            .graph
            .lookup(ip)?
            .ok_or_else(|| SummaryError::NotFoundInGraph(ip.trim().to_owned()))?;

        let Some(snapshot) = self
            .table
            .find(entry.value())
            .and_then(|slot| self.table.data_at(slot))
        else {
            #[cfg(feature = "tracing")]
            tracing::warn!(ip = entry.text(), "address missing from hash index");
            return Err(SummaryError::NotFoundInIndex(entry.text().to_owned()));
        };

        let mut heap = RankingHeap::with_capacity(snapshot.degree_out());
        for edge in self.graph.out_edges(entry.node_id()) {
            let neighbor = self.graph.lookup_node(edge.target).ok_or_else(|| {
                SummaryError::NotFoundInGraph(
                    self.graph.node_text(edge.target).unwrap_or_default().to_owned(),
                )
            })?;
            heap.push(RankedNeighbor {
                ip: neighbor.text().to_owned(),
                node_id: neighbor.node_id(),
                degree_out: neighbor.degree_out(),
                weight: edge.weight,
            })?;
        }

        let mut accessed = Vec::with_capacity(heap.len());
        while !heap.is_empty() {
            accessed.push(heap.pop()?);
        }

        Ok(SummaryReport {
            ip: snapshot.text().to_owned(),
            node_id: snapshot.node_id(),
            degree_in: snapshot.degree_in(),
            degree_out: snapshot.degree_out(),
            collisions: self.table.collision_count(),
            capacity: self.table.capacity(),
            accessed,
        })
    }

    /// The connection graph.
    pub fn graph(&self) -> &AdjacencyGraph {
        &self.graph
    }

    /// The hash index.
    pub fn table(&self) -> &OpenAddressHashTable<u32, IpKey> {
        &self.table
    }

    /// The five prime capacity candidates for this graph's node count.
    pub fn capacity_candidates(&self) -> [usize; CANDIDATE_COUNT] {
        self.candidates
    }

    /// The operator's capacity choice.
    pub fn capacity_choice(&self) -> CapacityChoice {
        self.choice
    }

    /// Selected hash table capacity.
    pub fn capacity(&self) -> usize {
        self.candidates[self.choice.slot()]
    }

    /// Collisions observed while building the hash index.
    pub fn collision_count(&self) -> usize {
        self.table.collision_count()
    }

    /// Capacity, fill and collisions of the hash index.
    pub fn index_stats(&self) -> IndexStats {
        IndexStats {
            choice: self.choice.get(),
            candidates: self.candidates,
            capacity: self.table.capacity(),
            elements: self.table.len(),
            collisions: self.table.collision_count(),
            load_factor: self.table.load_factor(),
        }
    }
}
