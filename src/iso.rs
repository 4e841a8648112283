use petgraph::graph::{IndexType, UnGraph};

use crate::error::GraphError;
use crate::graph::Graph;
use crate::search::{is_isomorphic, Isomorphism};

/// Try to find an isomorphism between two graphs
pub trait TryIntoIsomorphism {
    type Error;

    fn try_isomorphism(
        &self,
        other: &Self,
    ) -> Result<Option<Isomorphism>, Self::Error>;
}

/// Check whether two graphs are isomorphic
///
/// Graphs that cannot be compared, for example because their adjacency
/// is not symmetric, are reported as not isomorphic.
pub trait IsIsomorphic {
    fn is_isomorphic_to(&self, other: &Self) -> bool;
}

impl<T: TryIntoIsomorphism> IsIsomorphic for T {
    fn is_isomorphic_to(&self, other: &Self) -> bool {
        matches!(self.try_isomorphism(other), Ok(Some(_)))
    }
}

impl TryIntoIsomorphism for Graph {
    type Error = GraphError;

    fn try_isomorphism(
        &self,
        other: &Self,
    ) -> Result<Option<Isomorphism>, Self::Error> {
        is_isomorphic(self, other).into_result()
    }
}

/// Node weights and edge weights are ignored, parallel edges count once
impl<N, E, Ix: IndexType> TryIntoIsomorphism for UnGraph<N, E, Ix> {
    type Error = GraphError;

    fn try_isomorphism(
        &self,
        other: &Self,
    ) -> Result<Option<Isomorphism>, Self::Error> {
        Graph::from(self).try_isomorphism(&Graph::from(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::algo::is_isomorphic;
    use rand::prelude::*;
    use testing::{randomize_labels, GraphIter};

    use rand_xoshiro::Xoshiro256Plus;

    use log::debug;

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn tree() {
        let g1 = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2)]);
        let g2 = UnGraph::<(), ()>::from_edges([(0, 1), (0, 2)]);
        let g3 = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 0)]);
        assert!(g1.is_isomorphic_to(&g2));
        assert!(!g1.is_isomorphic_to(&g3));
        let iso = g1.try_isomorphism(&g2).unwrap().unwrap();
        assert_eq!(iso.get(1), Some(0));
    }

    #[test]
    fn weights_ignored() {
        let g1 = UnGraph::<u8, u8>::from_edges([(0, 1, 3), (1, 2, 4)]);
        let g2 = UnGraph::<u8, u8>::from_edges([(2, 1, 0), (0, 1, 0)]);
        assert!(g1.is_isomorphic_to(&g2));
    }

    #[test]
    fn invalid() {
        let mut g = Graph::new(2);
        g.set_neighbours(0, vec![1]).unwrap();
        let h = Graph::from_edges(2, [(0, 1)]).unwrap();
        assert!(matches!(
            h.try_isomorphism(&g),
            Err(GraphError::Asymmetric { .. })
        ));
        assert!(!h.is_isomorphic_to(&g));
    }

    #[test]
    fn random_undirected() {
        log_init();

        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let graphs = GraphIter::default();

        for g in graphs.take(1000) {
            debug!("Initial graph: {g:#?}");
            let gg = randomize_labels(&g, &mut rng);
            debug!("Randomised graph: {gg:#?}");
            assert!(is_isomorphic(&g, &gg));
            assert!(g.is_isomorphic_to(&gg));
            assert!(gg.is_isomorphic_to(&g));
        }
    }
}
