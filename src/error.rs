use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

/// Violations of the graph model's invariants
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GraphError {
    #[error("Node index {index} out of range for {node_count} nodes")]
    OutOfRange { index: usize, node_count: usize },
    #[error("Node {node} lists neighbour {neighbour} more than once")]
    DuplicateNeighbour { node: usize, neighbour: usize },
    #[error("Node {node} lists {neighbour}, which does not list it back")]
    Asymmetric { node: usize, neighbour: usize },
}

/// Problems found while reading a single record of a graph file
///
/// These are diagnostics: the offending token or line is skipped and
/// parsing continues.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error("line {line}: invalid token '{token}'")]
    InvalidToken { line: usize, token: String },
    #[error("line {line}: neighbour {neighbour} not in [0, {node_count})")]
    NeighbourOutOfRange {
        line: usize,
        neighbour: i64,
        node_count: usize,
    },
    #[error("line {line}: neighbour {neighbour} listed more than once")]
    DuplicateNeighbour { line: usize, neighbour: usize },
    #[error("line {line}: invalid node id '{token}'")]
    InvalidNodeId { line: usize, token: String },
    #[error("line {line}: node {node} already defined")]
    DuplicateNode { line: usize, node: usize },
    #[error("line {line}: tab separator not found, skipping line")]
    MissingTab { line: usize },
}

/// Failure to produce a graph at all
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("Failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid header '{0}', expected '<node_count> <line_count>'")]
    Header(String),
    #[error("Cannot allocate a graph with {node_count} nodes")]
    TooLarge {
        node_count: usize,
        #[source]
        source: TryReserveError,
    },
}

/// Failure to decode a graph shipped across a process boundary
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum WireError {
    #[error("Buffer ended after {len} values, expected more")]
    Truncated { len: usize },
    #[error("Invalid value {value} at position {pos}")]
    Invalid { pos: usize, value: i64 },
    #[error("{extra} trailing values after the last node")]
    Trailing { extra: usize },
    #[error("Unsupported record version {0}")]
    UnsupportedVersion(u32),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Failures that abort a whole batch run
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DispatchError {
    #[error("Worker {worker} failed to receive the reference graph")]
    Transport {
        worker: usize,
        #[source]
        source: WireError,
    },
    #[error("Failed to build the worker pool")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error(transparent)]
    Load(#[from] LoadError),
}
