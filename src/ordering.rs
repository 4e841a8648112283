//! Order in which reference nodes are matched.
use std::cmp::Reverse;

use log::trace;

use crate::graph::Graph;

/// Matching order for the nodes of `g`
///
/// Starting from the unordered node of highest degree (lowest index on
/// ties), the connected component is traversed breadth-first. Each BFS
/// layer is appended sorted by descending degree, keeping discovery order
/// among nodes of equal degree. This is repeated until every node has been
/// placed, so the result is always a permutation of `0..g.node_count()`.
pub fn matching_order(g: &Graph) -> Vec<usize> {
    let n = g.node_count();
    let mut order = Vec::with_capacity(n);
    let mut ordered = vec![false; n];

    while order.len() < n {
        let Some(root) = (0..n)
            .filter(|&u| !ordered[u])
            .max_by_key(|&u| (g.degree(u), Reverse(u)))
        else {
            break;
        };
        trace!("New BFS root {root} with degree {}", g.degree(root));
        ordered[root] = true;
        order.push(root);

        let mut layer = vec![root];
        while !layer.is_empty() {
            let mut next = Vec::new();
            for &u in &layer {
                for &v in g.neighbours(u) {
                    if !ordered[v] {
                        ordered[v] = true;
                        next.push(v);
                    }
                }
            }
            next.sort_by_key(|&v| Reverse(g.degree(v)));
            order.extend_from_slice(&next);
            layer = next;
        }
    }
    debug_assert_eq!(order.len(), n);
    order
}
