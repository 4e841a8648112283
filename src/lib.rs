//! Undirected graph isomorphism.
//!
//! Implements the [VF2++](https://doi.org/10.1016/j.dam.2018.02.018)
//! algorithm: the nodes of the reference graph are put into a fixed
//! matching order, then a backtracking search extends a partial mapping
//! one node at a time, only ever proposing candidates that agree with
//! the already mapped neighbourhood.
//!
//! # Example
//!
//! ```rust
//! use vf2pp::prelude::*;
//!
//! let triangle = Graph::from_edges(3, [(0, 1), (1, 2), (2, 0)]).unwrap();
//! let relabelled = Graph::from_edges(3, [(2, 1), (0, 2), (1, 0)]).unwrap();
//! let path = Graph::from_edges(3, [(0, 1), (1, 2)]).unwrap();
//!
//! let outcome = is_isomorphic(&triangle, &relabelled);
//! let iso = outcome.isomorphism().unwrap();
//! assert!(iso.is_valid_for(&triangle, &relabelled));
//!
//! assert!(!triangle.is_isomorphic_to(&path));
//!
//! // petgraph graphs work too
//! use petgraph::graph::UnGraph;
//! let g1 = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2)]);
//! let g2 = UnGraph::<(), ()>::from_edges([(0, 1), (0, 2)]);
//! assert!(g1.is_isomorphic_to(&g2));
//! ```
//!
//! Many candidates can be checked against one reference graph in
//! parallel with a [Dispatcher](dispatch::Dispatcher).
//!
//! # Features
//!
//! * `cli` (default): Builds the `vf2pp` command line tool.
//!
//! * `serde-1`: Enables serialisation of
//!              [GraphRecord](wire::GraphRecord) and
//!              [Isomorphism](search::Isomorphism) objects using
//!              [serde](https://crates.io/crates/serde).
//!
//! To enable features `feature1`, `feature2` add the following to
//! your Cargo.toml:
//! ```toml
//! [dependencies]
//! vf2pp = { version = "0.1", features = ["feature1", "feature2"] }
//! ```
pub mod candidates;
mod cmp;
pub mod dispatch;
pub mod error;
pub mod graph;
pub mod iso;
pub mod mapping;
pub mod ordering;
pub mod prelude;
pub mod search;
pub mod text;
pub mod wire;

pub use cmp::IsIdentical;
pub use iso::{IsIsomorphic, TryIntoIsomorphism};
pub use search::{is_isomorphic, Isomorphism, Outcome};
