use itertools::Itertools;

use crate::graph::Graph;

/// Check if two objects are identical
pub trait IsIdentical {
    fn is_identical(&self, other: &Self) -> bool;
}

/// Two graphs are identical if they have the same number of nodes and
/// each node has the same set of neighbours, in whatever order.
impl IsIdentical for Graph {
    fn is_identical(&self, other: &Self) -> bool {
        self.node_count() == other.node_count()
            && (0..self.node_count()).all(|u| {
                self.degree(u) == other.degree(u)
                    && self
                        .neighbours(u)
                        .iter()
                        .sorted()
                        .eq(other.neighbours(u).iter().sorted())
            })
    }
}
