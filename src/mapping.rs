//! Transient search state: the partial mapping between the two graphs
//! and the set of free, isolated candidate nodes.
use crate::graph::Graph;

/// Partial bijection between reference and candidate nodes
///
/// `forward[u] == Some(v)` if and only if `backward[v] == Some(u)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mapping {
    forward: Vec<Option<usize>>,
    backward: Vec<Option<usize>>,
    len: usize,
}

impl Mapping {
    /// Empty mapping between graphs with `n` nodes each
    pub fn new(n: usize) -> Self {
        Self {
            forward: vec![None; n],
            backward: vec![None; n],
            len: 0,
        }
    }

    /// Partner of reference node `u`
    pub fn forward(&self, u: usize) -> Option<usize> {
        self.forward[u]
    }

    /// Partner of candidate node `v`
    pub fn backward(&self, v: usize) -> Option<usize> {
        self.backward[v]
    }

    pub fn is_mapped_reference(&self, u: usize) -> bool {
        self.forward[u].is_some()
    }

    pub fn is_mapped_candidate(&self, v: usize) -> bool {
        self.backward[v].is_some()
    }

    /// Number of mapped pairs
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_complete(&self) -> bool {
        self.len == self.forward.len()
    }

    pub(crate) fn insert(&mut self, u: usize, v: usize) {
        debug_assert!(self.forward[u].is_none());
        debug_assert!(self.backward[v].is_none());
        self.forward[u] = Some(v);
        self.backward[v] = Some(u);
        self.len += 1;
    }

    pub(crate) fn remove(&mut self, u: usize) -> Option<usize> {
        let v = self.forward[u].take()?;
        debug_assert_eq!(self.backward[v], Some(u));
        self.backward[v] = None;
        self.len -= 1;
        Some(v)
    }
}

/// Membership flags for candidate nodes that are unmapped and have no
/// mapped neighbour
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FreeSet {
    free: Vec<bool>,
}

impl FreeSet {
    /// All `n` nodes free
    pub fn new(n: usize) -> Self {
        Self {
            free: vec![true; n],
        }
    }

    pub fn contains(&self, v: usize) -> bool {
        self.free[v]
    }

    pub fn is_full(&self) -> bool {
        self.free.iter().all(|&f| f)
    }

    pub fn len(&self) -> usize {
        self.free.iter().filter(|&&f| f).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `v` has just been mapped: it and all its neighbours stop being free
    fn update(&mut self, g: &Graph, v: usize) {
        for &w in g.neighbours(v) {
            self.free[w] = false;
        }
        self.free[v] = false;
    }

    /// Inverse of [FreeSet::update] once `v` has been unmapped again
    fn restore(&mut self, g: &Graph, mapping: &Mapping, v: usize) {
        let has_mapped_neighbour = |w: usize| {
            g.neighbours(w).iter().any(|&x| mapping.is_mapped_candidate(x))
        };
        for &w in g.neighbours(v) {
            if !mapping.is_mapped_candidate(w) && !has_mapped_neighbour(w) {
                self.free[w] = true;
            }
        }
        if !has_mapped_neighbour(v) {
            self.free[v] = true;
        }
    }
}

/// Mapping and free set, only ever changed together
///
/// Every [State::assign] has to be undone by exactly one
/// [State::unassign] of the same reference node, in LIFO order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
    mapping: Mapping,
    free: FreeSet,
}

impl State {
    pub fn new(n: usize) -> Self {
        Self {
            mapping: Mapping::new(n),
            free: FreeSet::new(n),
        }
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn free(&self) -> &FreeSet {
        &self.free
    }

    /// Map reference node `u` to candidate node `v`
    pub(crate) fn assign(&mut self, candidate: &Graph, u: usize, v: usize) {
        self.mapping.insert(u, v);
        self.free.update(candidate, v);
    }

    /// Undo the mapping of reference node `u`, returning its former partner
    pub(crate) fn unassign(
        &mut self,
        candidate: &Graph,
        u: usize,
    ) -> Option<usize> {
        let v = self.mapping.remove(u)?;
        self.free.restore(candidate, &self.mapping, v);
        Some(v)
    }

    /// Record the final pair without touching the free set
    pub(crate) fn commit(&mut self, u: usize, v: usize) {
        self.mapping.insert(u, v);
    }

    /// Recompute the free set from scratch and compare
    pub(crate) fn free_set_is_consistent(&self, candidate: &Graph) -> bool {
        (0..candidate.node_count()).all(|v| {
            let expected = !self.mapping.is_mapped_candidate(v)
                && !candidate
                    .neighbours(v)
                    .iter()
                    .any(|&w| self.mapping.is_mapped_candidate(w));
            self.free.contains(v) == expected
        })
    }
}
