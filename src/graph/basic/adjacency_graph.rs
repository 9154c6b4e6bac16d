//! A directed, weighted adjacency-list graph over dense node ids, built
//! from a connection log.
//!
//! Node ids are assigned in node-line order. Out-edges live in one owned
//! `Vec<Edge>` per node. A [`SortedIpIndex`] resolves edge endpoints from
//! text to node id during the build and carries the degree counters.
//!
//! ### Performance Characteristics
//! | Operation | Complexity | Notes |
//! |-----------|------------|-------|
//! | `build` | \(O(n \log n + m \log n)\) | One sort, two binary searches per edge |
//! | `binary_search` | \(O(\log n)\) | Over the sorted index |
//! | `out_edges` | \(O(1)\) | Slice of the adjacency list |

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::basic::sorted_index::SortedIpIndex;
use crate::net::{parse_edge_line, parse_header, parse_ipv4_value, IpKey, IpParseError, LogFormatError};

/// Error returned while building or querying a graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The log file does not exist.
    #[error("log file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    /// The log could not be read.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The input ended before any header line.
    #[error("empty input: missing `<node_count> <edge_count>` header")]
    MissingHeader,
    /// A header or edge line could not be split into its fields.
    #[error("line {line}: {source}")]
    MalformedInput {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        #[source]
        source: LogFormatError,
    },
    /// The input ended before the declared number of lines.
    #[error("header declares {expected} {section} lines but only {found} are present")]
    MissingLines {
        /// `"node"` or `"edge"`.
        section: &'static str,
        /// Count declared by the header.
        expected: usize,
        /// Lines actually read.
        found: usize,
    },
    /// A node line or edge endpoint is not a valid IPv4 literal.
    #[error("line {line}: {source}")]
    InvalidIp {
        /// 1-based line number.
        line: usize,
        /// Parse failure.
        #[source]
        source: IpParseError,
    },
    /// Two node lines name the same address.
    #[error("duplicate node {ip} (node ids {first} and {second})")]
    DuplicateNode {
        /// Canonical address text.
        ip: String,
        /// Lower node id.
        first: usize,
        /// Higher node id.
        second: usize,
    },
    /// An edge names an address absent from the node section.
    #[error("line {line}: edge endpoint {ip} is not a known node")]
    UnknownEndpoint {
        /// 1-based line number.
        line: usize,
        /// Endpoint text as written.
        ip: String,
    },
    /// Undirected or unweighted graphs are reserved and not implemented.
    #[error("unsupported graph mode (directed: {directed}, weighted: {weighted})")]
    UnsupportedMode {
        /// Requested directedness.
        directed: bool,
        /// Requested weighting.
        weighted: bool,
    },
}

/// Construction-time graph options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Edges are one-way. Only `true` is supported.
    pub directed: bool,
    /// Edges carry a weight. Only `true` is supported.
    pub weighted: bool,
    /// Fail on edges naming unknown nodes instead of skipping them.
    pub strict_edges: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            directed: true,
            weighted: true,
            strict_edges: true,
        }
    }
}

/// One out-edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Node id of the destination.
    pub target: usize,
    /// Connection weight from the log.
    pub weight: i64,
}

#[derive(Debug, Clone)]
struct NodeLabel {
    text: String,
    value: u32,
}

/// A directed connection graph keyed by dense node ids.
#[derive(Debug, Clone)]
pub struct AdjacencyGraph {
    config: GraphConfig,
    nodes: Vec<NodeLabel>,
    adjacency: Vec<Vec<Edge>>,
    index: SortedIpIndex,
    edge_count: usize,
    skipped_edges: usize,
}

impl AdjacencyGraph {
    /// Builds a graph from log lines.
    ///
    /// The first non-blank line is the header, then `node_count` node
    /// lines, then `edge_count` edge lines. Blank lines are ignored;
    /// lines past the declared edges are ignored with a warning.
    ///
    /// # Errors
    /// Any [`GraphError`] except `FileNotFound`/`Io`. No partial graph is
    /// returned.
    pub fn build<I, S>(lines: I, config: GraphConfig) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GraphBuilder::new(config)?;
        for (i, line) in lines.into_iter().enumerate() {
            builder.feed(i + 1, line.as_ref())?;
        }
        builder.finish()
    }

    /// Builds a graph from a buffered reader.
    ///
    /// # Errors
    /// As [`AdjacencyGraph::build`], plus [`GraphError::Io`] on read failure.
    pub fn from_reader<R: BufRead>(reader: R, config: GraphConfig) -> Result<Self, GraphError> {
        let mut builder = GraphBuilder::new(config)?;
        for (i, line) in reader.lines().enumerate() {
            builder.feed(i + 1, &line?)?;
        }
        builder.finish()
    }

    /// Builds a graph from a log file.
    ///
    /// # Errors
    /// [`GraphError::FileNotFound`] if `path` does not exist, otherwise as
    /// [`AdjacencyGraph::from_reader`].
    pub fn from_path(path: impl AsRef<Path>, config: GraphConfig) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => GraphError::FileNotFound(path.to_path_buf()),
            _ => GraphError::Io(err),
        })?;
        Self::from_reader(BufReader::new(file), config)
    }

    /// Options the graph was built with.
    pub fn config(&self) -> GraphConfig {
        self.config
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges stored.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Edges dropped because an endpoint was unknown (lenient mode only).
    pub fn skipped_edges(&self) -> usize {
        self.skipped_edges
    }

    /// Address text of `node`.
    pub fn node_text(&self, node: usize) -> Option<&str> {
        self.nodes.get(node).map(|label| label.text.as_str())
    }

    /// Numeric address of `node`.
    pub fn node_value(&self, node: usize) -> Option<u32> {
        self.nodes.get(node).map(|label| label.value)
    }

    /// The sorted address index.
    pub fn index(&self) -> &SortedIpIndex {
        &self.index
    }

    /// Resolves an address to its node id by binary search.
    ///
    /// # Errors
    /// [`IpParseError`] if `ip` is not a dotted quad.
    pub fn binary_search(&self, ip: &str) -> Result<Option<usize>, IpParseError> {
        Ok(self.lookup(ip)?.map(IpKey::node_id))
    }

    /// Resolves an address to its indexed entry (with degree counters).
    ///
    /// # Errors
    /// [`IpParseError`] if `ip` is not a dotted quad.
    pub fn lookup(&self, ip: &str) -> Result<Option<&IpKey>, IpParseError> {
        let value = parse_ipv4_value(ip)?;
        Ok(self.index.lookup(value))
    }

    /// Indexed entry of `node`, re-resolved through the sorted index.
    pub fn lookup_node(&self, node: usize) -> Option<&IpKey> {
        self.node_value(node).and_then(|value| self.index.lookup(value))
    }

    /// Out-edges of `node`, in log order.
    ///
    /// # Panics
    /// Panics if `node` is out of bounds.
    pub fn out_edges(&self, node: usize) -> &[Edge] {
        assert!(node < self.adjacency.len(), "node {node} out of bounds");
        &self.adjacency[node]
    }

    /// Out-neighbors of `node`, in log order, repeated per edge.
    ///
    /// # Panics
    /// Panics if `node` is out of bounds.
    pub fn out_neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.out_edges(node).iter().map(|edge| edge.target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Header,
    Nodes,
    Edges,
    Done,
}

/// Line-at-a-time build state.
struct GraphBuilder {
    graph: AdjacencyGraph,
    phase: Phase,
    expected_nodes: usize,
    expected_edges: usize,
    edges_read: usize,
    trailing_lines: usize,
}

impl GraphBuilder {
    fn new(config: GraphConfig) -> Result<Self, GraphError> {
        if !config.directed || !config.weighted {
            return Err(GraphError::UnsupportedMode {
                directed: config.directed,
                weighted: config.weighted,
            });
        }
        Ok(Self {
            graph: AdjacencyGraph {
                config,
                nodes: Vec::new(),
                adjacency: Vec::new(),
                index: SortedIpIndex::default(),
                edge_count: 0,
                skipped_edges: 0,
            },
            phase: Phase::Header,
            expected_nodes: 0,
            expected_edges: 0,
            edges_read: 0,
            trailing_lines: 0,
        })
    }

    fn feed(&mut self, line_no: usize, line: &str) -> Result<(), GraphError> {
        if line.trim().is_empty() {
            return Ok(());
        }
        match self.phase {
            Phase::Header => self.read_header(line_no, line),
            Phase::Nodes => self.read_node(line_no, line),
            Phase::Edges => self.read_edge(line_no, line),
            Phase::Done => {
                self.trailing_lines += 1;
                Ok(())
            }
        }
    }

    fn read_header(&mut self, line_no: usize, line: &str) -> Result<(), GraphError> {
        let header = parse_header(line).map_err(|source| GraphError::MalformedInput {
            line: line_no,
            source,
        })?;
        #[cfg(feature = "tracing")]
        tracing::info!(
            nodes = header.node_count,
            edges = header.edge_count,
            "reading connection log"
        );
        self.expected_nodes = header.node_count;
        self.expected_edges = header.edge_count;
        // Storage grows with the node lines actually read; the header's
        // counts are not trusted for allocation.
        self.phase = Phase::Nodes;
        if header.node_count == 0 {
            self.end_nodes()?;
        }
        Ok(())
    }

    fn read_node(&mut self, line_no: usize, line: &str) -> Result<(), GraphError> {
        let node_id = self.graph.nodes.len();
        let key = IpKey::new(line, node_id).map_err(|source| GraphError::InvalidIp {
            line: line_no,
            source,
        })?;
        self.graph.nodes.push(NodeLabel {
            text: key.text().to_owned(),
            value: key.value(),
        });
        self.graph.adjacency.push(Vec::new());
        self.graph.index.push(key);
        if self.graph.nodes.len() == self.expected_nodes {
            self.end_nodes()?;
        }
        Ok(())
    }

    /// Sorts the index; edges may only be resolved after this.
    fn end_nodes(&mut self) -> Result<(), GraphError> {
        self.graph.index.seal()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(nodes = self.graph.index.len(), "address index sorted");
        self.phase = if self.expected_edges == 0 {
            Phase::Done
        } else {
            Phase::Edges
        };
        Ok(())
    }

    fn resolve(&self, line_no: usize, ip: &str) -> Result<Option<usize>, GraphError> {
        let value = parse_ipv4_value(ip).map_err(|source| GraphError::InvalidIp {
            line: line_no,
            source,
        })?;
        match self.graph.index.binary_search(value) {
            Some(position) => Ok(Some(position)),
            None if self.graph.config.strict_edges => Err(GraphError::UnknownEndpoint {
                line: line_no,
                ip: ip.to_owned(),
            }),
            None => {
                #[cfg(feature = "tracing")]
                tracing::warn!(line = line_no, ip, "skipping edge with unknown endpoint");
                Ok(None)
            }
        }
    }

    fn read_edge(&mut self, line_no: usize, line: &str) -> Result<(), GraphError> {
        let record = parse_edge_line(line).map_err(|source| GraphError::MalformedInput {
            line: line_no,
            source,
        })?;
        self.edges_read += 1;
        if self.edges_read == self.expected_edges {
            self.phase = Phase::Done;
        }

        let source = self.resolve(line_no, record.source)?;
        let target = self.resolve(line_no, record.target)?;
        let (Some(source), Some(target)) = (source, target) else {
            self.graph.skipped_edges += 1;
            return Ok(());
        };

        let u = {
            let key = self.graph.index.entry_mut(source);
            key.increment_degree_out();
            key.node_id()
        };
        let v = {
            let key = self.graph.index.entry_mut(target);
            key.increment_degree_in();
            key.node_id()
        };

        self.graph.adjacency[u].push(Edge {
            target: v,
            weight: record.weight,
        });
        self.graph.edge_count += 1;
        Ok(())
    }

    fn finish(self) -> Result<AdjacencyGraph, GraphError> {
        match self.phase {
            Phase::Header => return Err(GraphError::MissingHeader),
            Phase::Nodes => {
                return Err(GraphError::MissingLines {
                    section: "node",
                    expected: self.expected_nodes,
                    found: self.graph.nodes.len(),
                })
            }
            Phase::Edges => {
                return Err(GraphError::MissingLines {
                    section: "edge",
                    expected: self.expected_edges,
                    found: self.edges_read,
                })
            }
            Phase::Done => {}
        }
        #[cfg(feature = "tracing")]
        {
            if self.trailing_lines > 0 {
                tracing::warn!(
                    lines = self.trailing_lines,
                    "ignoring lines past the declared edge count"
                );
            }
            tracing::info!(
                nodes = self.graph.node_count(),
                edges = self.graph.edge_count,
                skipped = self.graph.skipped_edges,
                "connection graph built"
            );
        }
        Ok(self.graph)
    }
}
