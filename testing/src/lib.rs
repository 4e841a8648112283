use petgraph::{
    algo::connected_components,
    graph::{NodeIndex, UnGraph},
    visit::{EdgeRef, NodeIndexable},
};
use rand::{
    distributions::{Bernoulli, Uniform},
    prelude::*,
    seq::SliceRandom,
};
use rand_distr::Normal;
use rand_xoshiro::Xoshiro256Plus;

/// Endless supply of small random connected simple graphs
pub struct GraphIter {
    rng: Xoshiro256Plus,
    node_distr: Uniform<usize>,
    edge_distr: Normal<f64>,
}

impl Default for GraphIter {
    fn default() -> Self {
        Self {
            rng: Xoshiro256Plus::seed_from_u64(0),
            node_distr: Uniform::from(1..10),
            edge_distr: Normal::new(0.5, 1.0).unwrap(),
        }
    }
}

impl Iterator for GraphIter {
    type Item = UnGraph<(), ()>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let nnodes = self.node_distr.sample(&mut self.rng);
            let mut g =
                UnGraph::<(), ()>::with_capacity(nnodes, nnodes * nnodes / 2);
            for _ in 0..nnodes {
                g.add_node(());
            }
            for i in 0..nnodes {
                for j in (i + 1)..nnodes {
                    let nedges = self
                        .edge_distr
                        .sample(&mut self.rng)
                        .clamp(0.0, 1.0)
                        .round();
                    if nedges > 0.0 {
                        g.add_edge(NodeIndex::new(i), NodeIndex::new(j), ());
                    }
                }
            }
            if connected_components(&g) == 1 {
                return Some(g);
            }
        }
    }
}

/// Random simple graph on `n` nodes, each edge present with probability `p`
pub fn random_graph<R: Rng>(n: usize, p: f64, rng: &mut R) -> UnGraph<(), ()> {
    let edge = Bernoulli::new(p).unwrap();
    let mut g = UnGraph::<(), ()>::with_capacity(n, 0);
    for _ in 0..n {
        g.add_node(());
    }
    for i in 0..n {
        for j in (i + 1)..n {
            if edge.sample(rng) {
                g.add_edge(NodeIndex::new(i), NodeIndex::new(j), ());
            }
        }
    }
    g
}

/// Copy of `g` with randomly permuted node labels
pub fn randomize_labels<R: Rng>(
    g: &UnGraph<(), ()>,
    rng: &mut R,
) -> UnGraph<(), ()> {
    let mut labels = Vec::from_iter(0..g.node_count());
    labels.shuffle(rng);
    let mut edges = Vec::from_iter(g.edge_references().map(|e| {
        (
            labels[g.to_index(e.source())] as u32,
            labels[g.to_index(e.target())] as u32,
        )
    }));
    edges.shuffle(rng);
    let mut res = UnGraph::<(), ()>::with_capacity(g.node_count(), edges.len());
    for _ in 0..g.node_count() {
        res.add_node(());
    }
    res.extend_with_edges(edges);
    res
}

/// Degree-preserving double edge switch
///
/// Picks two edges `a - b` and `c - d` on four distinct nodes and replaces
/// them by `a - d` and `c - b`, provided neither exists yet. Returns an
/// unchanged copy if no switch is possible after a few attempts.
pub fn edge_switch<R: Rng>(
    g: &UnGraph<(), ()>,
    rng: &mut R,
) -> UnGraph<(), ()> {
    let mut edges = Vec::from_iter(
        g.edge_references()
            .map(|e| (g.to_index(e.source()), g.to_index(e.target()))),
    );
    let connected = |edges: &[(usize, usize)], x: usize, y: usize| {
        edges
            .iter()
            .any(|&(s, t)| (s, t) == (x, y) || (s, t) == (y, x))
    };
    if edges.len() >= 2 {
        for _ in 0..20 {
            let i = rng.gen_range(0..edges.len());
            let j = rng.gen_range(0..edges.len());
            let (a, b) = edges[i];
            let (c, d) = edges[j];
            if i == j || a == c || a == d || b == c || b == d {
                continue;
            }
            if connected(&edges, a, d) || connected(&edges, c, b) {
                continue;
            }
            edges[i] = (a, d);
            edges[j] = (c, b);
            break;
        }
    }
    let mut res = UnGraph::<(), ()>::with_capacity(g.node_count(), edges.len());
    for _ in 0..g.node_count() {
        res.add_node(());
    }
    res.extend_with_edges(edges.into_iter().map(|(s, t)| (s as u32, t as u32)));
    res
}
