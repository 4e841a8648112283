//! Candidate generation for the next reference node.
use crate::graph::Graph;
use crate::mapping::State;

/// Candidate nodes in `candidate` that reference node `u` can be mapped to
///
/// A candidate is unmapped and agrees with `u` on degree and on having a
/// self loop. Beyond that, with `p1, .., pk` the partners of the already
/// mapped neighbours of `u`:
///
/// * for k = 0 the candidate must be free, i.e. have no mapped neighbour
///   itself,
/// * for k > 0 the candidate must be adjacent to every `pi`.
///
/// The returned candidates are in ascending order for k = 0 and otherwise
/// in the neighbour order of the partner with the lowest degree.
pub fn find_candidates(
    reference: &Graph,
    candidate: &Graph,
    state: &State,
    u: usize,
) -> Vec<usize> {
    let mapping = state.mapping();
    let degree = reference.degree(u);
    let self_loop = reference.has_self_loop(u);
    let compatible = |v: usize| {
        !mapping.is_mapped_candidate(v)
            && candidate.degree(v) == degree
            && candidate.has_self_loop(v) == self_loop
    };

    let mut partners: Vec<usize> = reference
        .neighbours(u)
        .iter()
        .filter_map(|&w| mapping.forward(w))
        .collect();
    // intersect starting from the smallest neighbourhood
    partners.sort_by_key(|&p| candidate.degree(p));

    match partners.as_slice() {
        [] => (0..candidate.node_count())
            .filter(|&v| state.free().contains(v) && compatible(v))
            .collect(),
        [p] => candidate
            .neighbours(*p)
            .iter()
            .copied()
            .filter(|&v| compatible(v))
            .collect(),
        [first, rest @ ..] => candidate
            .neighbours(*first)
            .iter()
            .copied()
            .filter(|&v| {
                compatible(v)
                    && rest.iter().all(|&p| candidate.has_neighbour(p, v))
            })
            .collect(),
    }
}
