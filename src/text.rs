//! Plain text graph files.
//!
//! The first line holds the number of nodes and the number of lines,
//! separated by a space. Every following line holds a node id, a tab, and
//! the space separated ids of its neighbours:
//!
//! ```text
//! 3 3
//! 0	1 2
//! 1	0
//! 2	0
//! ```
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use log::{debug, warn};

use crate::error::{LoadError, ParseError};
use crate::graph::Graph;

/// A graph together with the problems found while reading it
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Parsed {
    pub graph: Graph,
    pub diagnostics: Vec<ParseError>,
}

/// Read a graph file
pub fn read_graph(path: impl AsRef<Path>) -> Result<Parsed, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    let parsed = parse_graph(&text)?;
    debug!(
        "Read {} with {} nodes and {} diagnostics",
        path.display(),
        parsed.graph.node_count(),
        parsed.diagnostics.len()
    );
    Ok(parsed)
}

/// Parse a graph in text format
///
/// Only a missing or malformed header, or a node count too large to
/// allocate, is fatal. Malformed neighbour tokens, out-of-range or
/// repeated neighbours are skipped, and so are lines with an invalid or
/// repeated node id. Each of these is logged and recorded in
/// [Parsed::diagnostics].
pub fn parse_graph(text: &str) -> Result<Parsed, LoadError> {
    let mut lines = text.lines();
    let header = lines.next().unwrap_or_default();
    let node_count = parse_header(header)?;

    let too_large = |source| LoadError::TooLarge { node_count, source };
    let mut graph = Graph::try_new(node_count).map_err(too_large)?;
    let mut defined = Vec::new();
    defined.try_reserve_exact(node_count).map_err(too_large)?;
    defined.resize(node_count, false);
    let mut diagnostics = Vec::new();
    let mut report = |err: ParseError| {
        warn!("{err}");
        diagnostics.push(err);
    };

    for (idx, line) in lines.enumerate() {
        // line numbers start at 1 and count the header
        let lineno = idx + 2;
        let Some((id, rest)) = line.split_once('\t') else {
            if idx == 0 && !line.trim().is_empty() {
                report(ParseError::MissingTab { line: lineno });
            }
            continue;
        };
        let node = match id.trim().parse::<usize>() {
            Ok(node) if node < node_count => node,
            _ => {
                report(ParseError::InvalidNodeId {
                    line: lineno,
                    token: id.to_owned(),
                });
                continue;
            }
        };
        if std::mem::replace(&mut defined[node], true) {
            report(ParseError::DuplicateNode { line: lineno, node });
            continue;
        }

        let mut neighbours = Vec::new();
        for token in rest.split_whitespace() {
            let neighbour = match token.parse::<i64>() {
                Ok(v) => v,
                Err(_) => {
                    report(ParseError::InvalidToken {
                        line: lineno,
                        token: token.to_owned(),
                    });
                    continue;
                }
            };
            let Some(neighbour) = usize::try_from(neighbour)
                .ok()
                .filter(|&v| v < node_count)
            else {
                report(ParseError::NeighbourOutOfRange {
                    line: lineno,
                    neighbour,
                    node_count,
                });
                continue;
            };
            if neighbours.contains(&neighbour) {
                report(ParseError::DuplicateNeighbour {
                    line: lineno,
                    neighbour,
                });
                continue;
            }
            neighbours.push(neighbour);
        }
        // indices were checked above
        if let Err(err) = graph.set_neighbours(node, neighbours) {
            warn!("line {lineno}: {err}");
        }
    }
    Ok(Parsed { graph, diagnostics })
}

fn parse_header(header: &str) -> Result<usize, LoadError> {
    let mut fields = header.split_whitespace();
    let node_count = fields.next().and_then(|f| f.parse::<usize>().ok());
    let line_count = fields.next().and_then(|f| f.parse::<usize>().ok());
    match (node_count, line_count, fields.next()) {
        (Some(n), Some(_), None) => Ok(n),
        _ => Err(LoadError::Header(header.to_owned())),
    }
}

/// Write `g` in text format
pub fn write_graph<W: Write>(g: &Graph, mut out: W) -> io::Result<()> {
    write!(out, "{g}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmp::IsIdentical;

    use rand::prelude::*;
    use rand_xoshiro::Xoshiro256Plus;

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn parse() {
        log_init();
        let parsed = parse_graph("3 3\n0\t1 2\n1\t0\n2\t0\n").unwrap();
        assert!(parsed.diagnostics.is_empty());
        let expected = Graph::from_edges(3, [(0, 1), (0, 2)]).unwrap();
        assert_eq!(parsed.graph, expected);
    }

    #[test]
    fn crlf_and_blank_lines() {
        let parsed = parse_graph("2 2\r\n0\t1\r\n\r\n1\t0 \r\n").unwrap();
        assert!(parsed.diagnostics.is_empty());
        assert_eq!(parsed.graph.neighbours(0), &[1]);
        assert_eq!(parsed.graph.neighbours(1), &[0]);
    }

    #[test]
    fn bad_header() {
        assert!(matches!(parse_graph(""), Err(LoadError::Header(_))));
        assert!(matches!(parse_graph("3\n"), Err(LoadError::Header(_))));
        assert!(matches!(parse_graph("x 3\n"), Err(LoadError::Header(_))));
        assert!(matches!(parse_graph("3 3 3\n"), Err(LoadError::Header(_))));
    }

    #[test]
    fn huge_node_count() {
        let err = parse_graph("18446744073709551615 1\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::TooLarge {
                node_count: usize::MAX,
                ..
            }
        ));
    }

    #[test]
    fn skip_bad_tokens() {
        log_init();
        let text = "3 3\n0\t1 x 2 7 -1 1\n1\t0\n2\t0\n";
        let parsed = parse_graph(text).unwrap();
        assert_eq!(parsed.graph.neighbours(0), &[1, 2]);
        assert_eq!(
            parsed.diagnostics,
            vec![
                ParseError::InvalidToken {
                    line: 2,
                    token: "x".to_owned()
                },
                ParseError::NeighbourOutOfRange {
                    line: 2,
                    neighbour: 7,
                    node_count: 3
                },
                ParseError::NeighbourOutOfRange {
                    line: 2,
                    neighbour: -1,
                    node_count: 3
                },
                ParseError::DuplicateNeighbour {
                    line: 2,
                    neighbour: 1
                },
            ]
        );
    }

    #[test]
    fn skip_bad_lines() {
        log_init();
        let text = "2 4\n0 1\n0\t1\n0\t\nz\t1\n1\t0\n";
        let parsed = parse_graph(text).unwrap();
        assert_eq!(parsed.graph.neighbours(0), &[1]);
        assert_eq!(parsed.graph.neighbours(1), &[0]);
        assert_eq!(
            parsed.diagnostics,
            vec![
                ParseError::MissingTab { line: 2 },
                ParseError::DuplicateNode { line: 4, node: 0 },
                ParseError::InvalidNodeId {
                    line: 5,
                    token: "z".to_owned()
                },
            ]
        );
    }

    #[test]
    fn missing_file() {
        let err = read_graph("/nonexistent/graph.txt").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn write_then_parse() {
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        for g in testing::GraphIter::default().take(200) {
            let g = Graph::from(&testing::randomize_labels(&g, &mut rng));
            let mut buf = Vec::new();
            write_graph(&g, &mut buf).unwrap();
            let text = String::from_utf8(buf).unwrap();
            let parsed = parse_graph(&text).unwrap();
            assert!(parsed.diagnostics.is_empty());
            assert!(parsed.graph.is_identical(&g));
        }
    }
}
