use std::collections::TryReserveError;
use std::fmt;

use ahash::AHashSet;
use itertools::Itertools;
use petgraph::{
    graph::{IndexType, UnGraph},
    visit::{EdgeRef, NodeIndexable},
};

use crate::error::GraphError;

/// Undirected graph stored as adjacency lists
///
/// Nodes are the indices `0..node_count()`. Adjacency is expected to be
/// symmetric, i.e. `v` is listed as a neighbour of `u` if and only if
/// `u` is listed as a neighbour of `v`. Construction only enforces
/// index bounds, use [Graph::validate] to check the remaining
/// invariants.
///
/// # Example
///
/// ```rust
/// use vf2pp::graph::Graph;
///
/// let mut g = Graph::new(3);
/// g.set_neighbours(0, vec![1, 2]).unwrap();
/// g.set_neighbours(1, vec![0]).unwrap();
/// g.set_neighbours(2, vec![0]).unwrap();
/// assert_eq!(g.degree(0), 2);
/// assert!(g.validate().is_ok());
///
/// // the same graph from its edge list
/// let h = Graph::from_edges(3, [(0, 1), (0, 2)]).unwrap();
/// assert_eq!(g, h);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Graph {
    nodes: Vec<Node>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
struct Node {
    neighbours: Vec<usize>,
}

impl Graph {
    /// Graph with `n` isolated nodes
    pub fn new(n: usize) -> Self {
        Self {
            nodes: vec![Node::default(); n],
        }
    }

    /// Like [Graph::new], but fails if the nodes cannot be allocated
    pub fn try_new(n: usize) -> Result<Self, TryReserveError> {
        let mut nodes = Vec::new();
        nodes.try_reserve_exact(n)?;
        nodes.resize_with(n, Node::default);
        Ok(Self { nodes })
    }

    /// Build a graph from a list of undirected edges
    ///
    /// Each edge is recorded on both endpoints, a self loop only once.
    pub fn from_edges<I>(n: usize, edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut g = Self::new(n);
        for (a, b) in edges {
            g.check_index(a)?;
            g.check_index(b)?;
            g.nodes[a].neighbours.push(b);
            if a != b {
                g.nodes[b].neighbours.push(a);
            }
        }
        Ok(g)
    }

    /// Replace the neighbour list of `node`
    pub fn set_neighbours(
        &mut self,
        node: usize,
        neighbours: Vec<usize>,
    ) -> Result<(), GraphError> {
        self.check_index(node)?;
        for &v in &neighbours {
            self.check_index(v)?;
        }
        self.nodes[node].neighbours = neighbours;
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of undirected edges, counting a self loop once
    pub fn edge_count(&self) -> usize {
        let loops = (0..self.node_count())
            .filter(|&u| self.has_self_loop(u))
            .count();
        let total: usize = self.nodes.iter().map(|n| n.neighbours.len()).sum();
        (total - loops) / 2 + loops
    }

    /// Neighbours of `node` in insertion order
    ///
    /// Panics if `node` is out of range.
    pub fn neighbours(&self, node: usize) -> &[usize] {
        &self.nodes[node].neighbours
    }

    pub fn degree(&self, node: usize) -> usize {
        self.nodes[node].neighbours.len()
    }

    pub fn has_neighbour(&self, node: usize, neighbour: usize) -> bool {
        self.nodes[node].neighbours.contains(&neighbour)
    }

    pub fn has_self_loop(&self, node: usize) -> bool {
        self.has_neighbour(node, node)
    }

    /// All node degrees in ascending order
    pub fn degrees(&self) -> Vec<usize> {
        self.nodes.iter().map(|n| n.neighbours.len()).sorted().collect()
    }

    /// Check for duplicate neighbours and asymmetric adjacency
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut adjacent = AHashSet::with_capacity(
            self.nodes.iter().map(|n| n.neighbours.len()).sum(),
        );
        for (u, node) in self.nodes.iter().enumerate() {
            for &v in &node.neighbours {
                self.check_index(v)?;
                if !adjacent.insert((u, v)) {
                    return Err(GraphError::DuplicateNeighbour {
                        node: u,
                        neighbour: v,
                    });
                }
            }
        }
        for (u, node) in self.nodes.iter().enumerate() {
            if let Some(&v) =
                node.neighbours.iter().find(|&&v| !adjacent.contains(&(v, u)))
            {
                return Err(GraphError::Asymmetric {
                    node: u,
                    neighbour: v,
                });
            }
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), GraphError> {
        if index < self.node_count() {
            Ok(())
        } else {
            Err(GraphError::OutOfRange {
                index,
                node_count: self.node_count(),
            })
        }
    }
}

impl<N, E, Ix: IndexType> From<&UnGraph<N, E, Ix>> for Graph {
    fn from(g: &UnGraph<N, E, Ix>) -> Self {
        let mut nodes = vec![Node::default(); g.node_count()];
        for e in g.edge_references() {
            let a = g.to_index(e.source());
            let b = g.to_index(e.target());
            nodes[a].neighbours.push(b);
            if a != b {
                nodes[b].neighbours.push(a);
            }
        }
        // parallel edges collapse into a single adjacency
        for node in &mut nodes {
            node.neighbours =
                node.neighbours.iter().copied().sorted().dedup().collect();
        }
        Self { nodes }
    }
}

impl<N, E, Ix: IndexType> From<UnGraph<N, E, Ix>> for Graph {
    fn from(g: UnGraph<N, E, Ix>) -> Self {
        Self::from(&g)
    }
}

/// Writes the graph in the text format read by [crate::text::parse_graph]
impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.node_count(), self.node_count())?;
        for (id, node) in self.nodes.iter().enumerate() {
            writeln!(f, "{id}\t{}", node.neighbours.iter().join(" "))?;
        }
        Ok(())
    }
}
