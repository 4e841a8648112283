//! Graph encodings for shipping a graph to another worker.
//!
//! [flatten] produces one contiguous integer buffer:
//! `[N, then per node: id, partner or -1, degree, degree neighbour ids]`.
//! [GraphRecord] is the self-describing alternative, versioned and
//! independent of the buffer layout.
use crate::error::{GraphError, WireError};
use crate::graph::Graph;
use crate::mapping::Mapping;

/// Current [GraphRecord] version
pub const RECORD_VERSION: u32 = 1;

const UNMAPPED: i64 = -1;

/// Encode `g` as a flat integer buffer
///
/// If `mapping` is given, each node's slot holds its partner in the
/// opposite graph, otherwise all slots are unmapped.
pub fn flatten(g: &Graph, mapping: Option<&Mapping>) -> Vec<i64> {
    let n = g.node_count();
    let total_neighbours: usize = (0..n).map(|u| g.degree(u)).sum();
    let mut flat = Vec::with_capacity(1 + 3 * n + total_neighbours);
    flat.push(n as i64);
    for u in 0..n {
        let partner = mapping
            .and_then(|m| m.forward(u))
            .map_or(UNMAPPED, |v| v as i64);
        flat.push(u as i64);
        flat.push(partner);
        flat.push(g.degree(u) as i64);
        flat.extend(g.neighbours(u).iter().map(|&v| v as i64));
    }
    flat
}

/// Decode a buffer produced by [flatten]
///
/// Mapping slots are checked but not restored, a decoded graph always
/// starts out unmapped.
pub fn unflatten(flat: &[i64]) -> Result<Graph, WireError> {
    let mut reader = Reader { flat, pos: 0 };
    // every node takes at least three values
    let n = reader.index(flat.len())?;
    let mut g = Graph::new(n);
    for u in 0..n {
        let pos = reader.pos;
        let id = reader.index(n)?;
        if id != u {
            return Err(WireError::Invalid {
                pos,
                value: id as i64,
            });
        }
        let pos = reader.pos;
        let partner = reader.next()?;
        if partner != UNMAPPED && !(0..n as i64).contains(&partner) {
            return Err(WireError::Invalid {
                pos,
                value: partner,
            });
        }
        let degree = reader.index(flat.len())?;
        let neighbours = (0..degree)
            .map(|_| reader.index(n))
            .collect::<Result<Vec<_>, _>>()?;
        g.set_neighbours(u, neighbours)?;
    }
    if reader.pos < flat.len() {
        return Err(WireError::Trailing {
            extra: flat.len() - reader.pos,
        });
    }
    Ok(g)
}

struct Reader<'a> {
    flat: &'a [i64],
    pos: usize,
}

impl Reader<'_> {
    fn next(&mut self) -> Result<i64, WireError> {
        let value = *self.flat.get(self.pos).ok_or(WireError::Truncated {
            len: self.flat.len(),
        })?;
        self.pos += 1;
        Ok(value)
    }

    // non-negative value below `bound`
    fn index(&mut self, bound: usize) -> Result<usize, WireError> {
        let pos = self.pos;
        let value = self.next()?;
        usize::try_from(value)
            .ok()
            .filter(|&v| v < bound)
            .ok_or(WireError::Invalid { pos, value })
    }
}

/// Versioned, self-describing graph record
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphRecord {
    pub version: u32,
    pub nodes: Vec<NodeRecord>,
}

#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeRecord {
    pub id: usize,
    pub neighbours: Vec<usize>,
}

impl From<&Graph> for GraphRecord {
    fn from(g: &Graph) -> Self {
        let nodes = (0..g.node_count())
            .map(|id| NodeRecord {
                id,
                neighbours: g.neighbours(id).to_vec(),
            })
            .collect();
        Self {
            version: RECORD_VERSION,
            nodes,
        }
    }
}

impl TryFrom<GraphRecord> for Graph {
    type Error = WireError;

    /// Nodes may come in any order, but their ids must be exactly
    /// `0..nodes.len()`
    fn try_from(record: GraphRecord) -> Result<Self, Self::Error> {
        if record.version != RECORD_VERSION {
            return Err(WireError::UnsupportedVersion(record.version));
        }
        let n = record.nodes.len();
        let mut g = Graph::new(n);
        let mut seen = vec![false; n];
        for node in record.nodes {
            if node.id >= n || std::mem::replace(&mut seen[node.id], true) {
                return Err(GraphError::OutOfRange {
                    index: node.id,
                    node_count: n,
                }
                .into());
            }
            g.set_neighbours(node.id, node.neighbours)?;
        }
        Ok(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmp::IsIdentical;

    use rand::prelude::*;
    use rand_xoshiro::Xoshiro256Plus;
    use testing::{random_graph, GraphIter};

    #[test]
    fn layout() {
        let g = Graph::from_edges(3, [(0, 1), (1, 2)]).unwrap();
        assert_eq!(
            flatten(&g, None),
            vec![3, 0, -1, 1, 1, 1, -1, 2, 0, 2, 2, -1, 1, 1]
        );
    }

    #[test]
    fn layout_with_mapping() {
        let g = Graph::from_edges(2, [(0, 1)]).unwrap();
        let mut mapping = Mapping::new(2);
        mapping.insert(0, 1);
        let flat = flatten(&g, Some(&mapping));
        assert_eq!(flat, vec![2, 0, 1, 1, 1, 1, -1, 1, 0]);
        assert!(unflatten(&flat).unwrap().is_identical(&g));
    }

    #[test]
    fn round_trip() {
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let graphs = GraphIter::default()
            .take(200)
            .chain((0..50).map(|n| random_graph(n % 12, 0.3, &mut rng)));
        for g in graphs {
            let g = Graph::from(&g);
            let back = unflatten(&flatten(&g, None)).unwrap();
            assert!(back.is_identical(&g));
            assert_eq!(back, g);

            let back = Graph::try_from(GraphRecord::from(&g)).unwrap();
            assert_eq!(back, g);
        }
    }

    #[test]
    fn empty() {
        let g = Graph::new(0);
        assert_eq!(flatten(&g, None), vec![0]);
        assert_eq!(unflatten(&[0]).unwrap(), g);
    }

    #[test]
    fn malformed() {
        assert_eq!(unflatten(&[]), Err(WireError::Truncated { len: 0 }));
        assert_eq!(
            unflatten(&[-2]),
            Err(WireError::Invalid { pos: 0, value: -2 })
        );
        // truncated neighbour list
        assert_eq!(
            unflatten(&[2, 0, -1, 1, 1, 1, -1, 1]),
            Err(WireError::Truncated { len: 8 })
        );
        // neighbour out of range
        assert_eq!(
            unflatten(&[2, 0, -1, 1, 5, 1, -1, 1, 0]),
            Err(WireError::Invalid { pos: 4, value: 5 })
        );
        // ids out of order
        assert_eq!(
            unflatten(&[2, 1, -1, 0, 0, -1, 0]),
            Err(WireError::Invalid { pos: 1, value: 1 })
        );
        // partner out of range
        assert_eq!(
            unflatten(&[1, 0, 3, 0]),
            Err(WireError::Invalid { pos: 2, value: 3 })
        );
        assert_eq!(
            unflatten(&[1, 0, -1, 0, 7]),
            Err(WireError::Trailing { extra: 1 })
        );
    }

    #[test]
    fn record_version() {
        let g = Graph::from_edges(2, [(0, 1)]).unwrap();
        let mut record = GraphRecord::from(&g);
        record.nodes.reverse();
        assert_eq!(Graph::try_from(record.clone()).unwrap(), g);
        record.version = 0;
        assert_eq!(
            Graph::try_from(record),
            Err(WireError::UnsupportedVersion(0))
        );
    }
}
