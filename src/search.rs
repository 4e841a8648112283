//! Backtracking search for an isomorphism between two graphs.
use log::{debug, trace};

use crate::candidates::find_candidates;
use crate::error::GraphError;
use crate::graph::Graph;
use crate::mapping::{Mapping, State};
use crate::ordering::matching_order;

/// Result of an isomorphism query
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The graphs are isomorphic, with a witness
    Isomorphic(Isomorphism),
    NotIsomorphic,
    /// At least one of the graphs violates the graph invariants
    Failed(GraphError),
}

impl Outcome {
    pub fn is_isomorphic(&self) -> bool {
        matches!(self, Outcome::Isomorphic(_))
    }

    pub fn isomorphism(&self) -> Option<&Isomorphism> {
        match self {
            Outcome::Isomorphic(iso) => Some(iso),
            _ => None,
        }
    }

    pub fn into_result(self) -> Result<Option<Isomorphism>, GraphError> {
        match self {
            Outcome::Isomorphic(iso) => Ok(Some(iso)),
            Outcome::NotIsomorphic => Ok(None),
            Outcome::Failed(err) => Err(err),
        }
    }
}

/// Bijection from reference nodes to candidate nodes preserving adjacency
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Isomorphism(Vec<usize>);

impl Isomorphism {
    /// Image of reference node `u`
    pub fn get(&self, u: usize) -> Option<usize> {
        self.0.get(u).copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check that this is a bijection from the nodes of `reference` to the
    /// nodes of `candidate` that maps neighbours to neighbours and
    /// non-neighbours to non-neighbours
    pub fn is_valid_for(&self, reference: &Graph, candidate: &Graph) -> bool {
        let n = reference.node_count();
        if self.len() != n || candidate.node_count() != n {
            return false;
        }
        let mut hit = vec![false; n];
        for &v in &self.0 {
            if v >= n || std::mem::replace(&mut hit[v], true) {
                return false;
            }
        }
        (0..n).all(|u| {
            let fu = self.0[u];
            reference.degree(u) == candidate.degree(fu)
                && reference
                    .neighbours(u)
                    .iter()
                    .all(|&w| candidate.has_neighbour(fu, self.0[w]))
        })
    }

    fn from_complete(mapping: &Mapping, n: usize) -> Self {
        debug_assert!(mapping.is_complete());
        Self(
            (0..n)
                .filter_map(|u| mapping.forward(u))
                .collect(),
        )
    }
}

impl From<Isomorphism> for Vec<usize> {
    fn from(iso: Isomorphism) -> Self {
        iso.0
    }
}

/// One level of the search: a reference node and the candidates for it
#[derive(Debug)]
struct Frame {
    node: usize,
    candidates: Vec<usize>,
    // candidates before this position have been tried
    next: usize,
}

impl Frame {
    fn new(node: usize, candidates: Vec<usize>) -> Self {
        Self {
            node,
            candidates,
            next: 0,
        }
    }

    fn next_candidate(&mut self) -> Option<usize> {
        let v = *self.candidates.get(self.next)?;
        self.next += 1;
        Some(v)
    }
}

/// VF2++ search engine for one pair of graphs
///
/// The engine owns all transient search state, the graphs are only
/// borrowed. After a run that does not find an isomorphism, [Vf2pp::state]
/// is back to its initial value.
///
/// # Example
///
/// ```rust
/// use vf2pp::graph::Graph;
/// use vf2pp::search::Vf2pp;
///
/// let g1 = Graph::from_edges(3, [(0, 1), (1, 2), (2, 0)]).unwrap();
/// let g2 = Graph::from_edges(3, [(0, 2), (2, 1), (1, 0)]).unwrap();
/// let mut search = Vf2pp::new(&g1, &g2);
/// let outcome = search.run();
/// let iso = outcome.isomorphism().unwrap();
/// assert!(iso.is_valid_for(&g1, &g2));
/// ```
#[derive(Debug)]
pub struct Vf2pp<'a> {
    reference: &'a Graph,
    candidate: &'a Graph,
    state: State,
    visited: usize,
}

impl<'a> Vf2pp<'a> {
    pub fn new(reference: &'a Graph, candidate: &'a Graph) -> Self {
        Self {
            reference,
            candidate,
            state: State::new(candidate.node_count()),
            visited: 0,
        }
    }

    /// Search state after the last run
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Number of partial mappings visited in the last run
    pub fn visited(&self) -> usize {
        self.visited
    }

    pub fn run(&mut self) -> Outcome {
        let n = self.reference.node_count();
        self.state = State::new(self.candidate.node_count());
        self.visited = 0;

        if n == 0 || self.candidate.node_count() == 0 {
            debug!("Empty graph, no search");
            return Outcome::NotIsomorphic;
        }
        if n != self.candidate.node_count() {
            debug!(
                "Node counts differ ({n} vs {}), no search",
                self.candidate.node_count()
            );
            return Outcome::NotIsomorphic;
        }
        if let Err(err) = self
            .reference
            .validate()
            .and_then(|_| self.candidate.validate())
        {
            debug!("Invalid graph: {err}");
            return Outcome::Failed(err);
        }

        let order = matching_order(self.reference);
        trace!("Matching order: {order:?}");
        let outcome = self.search(&order);
        debug!("Search finished after {} states: {outcome:?}", self.visited);
        outcome
    }

    fn search(&mut self, order: &[usize]) -> Outcome {
        let n = order.len();
        let mut stack = vec![self.frame(order[0])];

        while !stack.is_empty() {
            // every frame below the top holds one mapped pair
            let depth = stack.len() - 1;
            debug_assert_eq!(self.state.mapping().len(), depth);
            let Some(frame) = stack.last_mut() else {
                break;
            };
            let u = frame.node;

            let Some(v) = frame.next_candidate() else {
                trace!("Backtrack from node {u} at depth {depth}");
                stack.pop();
                if let Some(parent) = stack.last() {
                    self.state.unassign(self.candidate, parent.node);
                    debug_assert!(
                        self.state.free_set_is_consistent(self.candidate)
                    );
                }
                continue;
            };
            self.visited += 1;

            if depth == n - 1 {
                // All earlier pairs agree on degree and on adjacency to
                // earlier nodes, so the forced last pair completes an
                // isomorphism.
                trace!("Map last node {u} -> {v}");
                self.state.commit(u, v);
                return Outcome::Isomorphic(Isomorphism::from_complete(
                    self.state.mapping(),
                    n,
                ));
            }

            trace!("Map {u} -> {v} at depth {depth}");
            self.state.assign(self.candidate, u, v);
            debug_assert!(self.state.free_set_is_consistent(self.candidate));
            let next = self.frame(order[depth + 1]);
            stack.push(next);
        }
        Outcome::NotIsomorphic
    }

    fn frame(&self, u: usize) -> Frame {
        let candidates =
            find_candidates(self.reference, self.candidate, &self.state, u);
        trace!("Candidates for {u}: {candidates:?}");
        Frame::new(u, candidates)
    }
}

/// Decide whether `reference` and `candidate` are isomorphic
///
/// Graphs of different sizes and empty graphs are never isomorphic.
pub fn is_isomorphic(reference: &Graph, candidate: &Graph) -> Outcome {
    Vf2pp::new(reference, candidate).run()
}
