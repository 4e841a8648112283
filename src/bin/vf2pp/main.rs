//! Command line front end for the VF2++ isomorphism checker.
mod args;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, trace, warn};
use vf2pp::dispatch::{DispatchConfig, Dispatcher};
use vf2pp::error::GraphError;
use vf2pp::graph::Graph;
use vf2pp::search::{is_isomorphic, Outcome};
use vf2pp::text::read_graph;

use args::{Args, Command};

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    match args.command {
        Command::Compare {
            reference,
            candidate,
        } => compare(&reference, &candidate),
        Command::Batch {
            manifest,
            workers,
            graph_dir,
        } => batch(&manifest, workers, graph_dir),
    }
}

fn load(path: &Path) -> Result<Graph> {
    let parsed = read_graph(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    trace!(
        "{} with {} nodes and {} edges:\n{}",
        path.display(),
        parsed.graph.node_count(),
        parsed.graph.edge_count(),
        parsed.graph
    );
    Ok(parsed.graph)
}

/// Result line for one candidate, failed searches count as not isomorphic
fn result_line(name: &str, outcome: &Outcome) -> String {
    let verdict = if outcome.is_isomorphic() {
        "are isomorphic"
    } else {
        "are not isomorphic"
    };
    format!("Reference and {name} {verdict}")
}

/// Candidates whose search failed, with the reason
fn failures<'a>(
    names: &[&'a str],
    outcomes: &'a [Outcome],
) -> Vec<(&'a str, &'a GraphError)> {
    names
        .iter()
        .zip(outcomes)
        .filter_map(|(&name, outcome)| match outcome {
            Outcome::Failed(err) => Some((name, err)),
            _ => None,
        })
        .collect()
}

fn compare(reference: &Path, candidate: &Path) -> Result<()> {
    let start = Instant::now();
    let outcome = is_isomorphic(&load(reference)?, &load(candidate)?);
    let name = candidate.display().to_string();
    if let Outcome::Failed(err) = &outcome {
        warn!("Search failed for {name}: {err}");
    }
    println!("{}", result_line(&name, &outcome));
    info!("Comparison took {:.6}s", start.elapsed().as_secs_f64());
    Ok(())
}

fn batch(
    manifest: &Path,
    workers: Option<usize>,
    graph_dir: Option<PathBuf>,
) -> Result<()> {
    let start = Instant::now();
    let listing = fs::read_to_string(manifest).with_context(|| {
        format!("Failed to read manifest {}", manifest.display())
    })?;
    let mut names = listing.split_whitespace();
    let Some(reference_name) = names.next() else {
        bail!("Manifest {} lists no graphs", manifest.display());
    };
    let dir = graph_dir.unwrap_or_else(|| {
        manifest.parent().map(Path::to_path_buf).unwrap_or_default()
    });

    let reference = load(&dir.join(reference_name))?;
    let names: Vec<_> = names.collect();
    let candidates = names
        .iter()
        .map(|name| load(&dir.join(name)))
        .collect::<Result<Vec<_>>>()?;

    let mut config = DispatchConfig::default();
    if let Some(workers) = workers {
        config.workers = workers;
    }
    let dispatcher = Dispatcher::new(config)?;
    let report = dispatcher.run(&reference, &candidates)?;

    for (name, err) in failures(&names, &report.outcomes) {
        warn!("Search failed for {name}: {err}");
    }
    for (name, outcome) in names.iter().zip(&report.outcomes) {
        println!("{}", result_line(name, outcome));
    }
    for timing in &report.timings {
        println!("{},{:.6}", timing.worker, timing.elapsed.as_secs_f64());
    }
    println!("coordinator,{:.6}", start.elapsed().as_secs_f64());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_traces_graph() {
        let _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::Trace)
            .try_init();

        let path = std::env::temp_dir()
            .join(format!("vf2pp-load-{}.txt", std::process::id()));
        fs::write(&path, "3 3\n0\t1\n1\t0 2\n2\t1\n").unwrap();
        let g = load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(g, Graph::from_edges(3, [(0, 1), (1, 2)]).unwrap());

        assert!(load(&path).is_err());
    }

    #[test]
    fn batch_reports_failed_search() {
        let reference = Graph::from_edges(3, [(0, 1), (1, 2)]).unwrap();
        let relabelled = Graph::from_edges(3, [(2, 0), (0, 1)]).unwrap();
        let mut asymmetric = Graph::new(3);
        asymmetric.set_neighbours(0, vec![1]).unwrap();
        asymmetric.set_neighbours(1, vec![0, 2]).unwrap();
        let triangle =
            Graph::from_edges(3, [(0, 1), (1, 2), (2, 0)]).unwrap();

        let names = ["relabelled", "asymmetric", "triangle"];
        let candidates = [relabelled, asymmetric, triangle];
        let dispatcher =
            Dispatcher::new(DispatchConfig { workers: 2 }).unwrap();
        let report = dispatcher.run(&reference, &candidates).unwrap();

        let lines: Vec<_> = names
            .iter()
            .zip(&report.outcomes)
            .map(|(name, outcome)| result_line(name, outcome))
            .collect();
        assert_eq!(
            lines,
            [
                "Reference and relabelled are isomorphic",
                "Reference and asymmetric are not isomorphic",
                "Reference and triangle are not isomorphic",
            ]
        );
        assert_eq!(
            failures(&names, &report.outcomes),
            [(
                "asymmetric",
                &GraphError::Asymmetric {
                    node: 1,
                    neighbour: 2
                }
            )]
        );
    }
}
