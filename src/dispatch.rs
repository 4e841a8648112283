//! Running many independent queries against one reference graph.
use std::time::{Duration, Instant};

use log::{debug, info};
use rayon::prelude::*;

use crate::error::DispatchError;
use crate::graph::Graph;
use crate::search::{is_isomorphic, Outcome};
use crate::wire::{flatten, unflatten};

/// Worker pool settings
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Number of worker threads, at least one
    pub workers: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self { workers }
    }
}

/// Time a worker spent on all graphs assigned to it
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WorkerTiming {
    pub worker: usize,
    pub queries: usize,
    pub elapsed: Duration,
}

/// Results of a batch run, in candidate order
#[derive(Clone, Debug, PartialEq)]
pub struct BatchReport {
    pub outcomes: Vec<Outcome>,
    pub timings: Vec<WorkerTiming>,
    pub elapsed: Duration,
}

/// Round-robin dispatcher of isomorphism queries
///
/// The reference graph is encoded once and every worker decodes its own
/// copy, so workers share no graph state. Candidate `i` goes to worker
/// `i % workers`, which processes its share sequentially.
///
/// # Example
///
/// ```rust
/// use vf2pp::dispatch::{DispatchConfig, Dispatcher};
/// use vf2pp::graph::Graph;
///
/// let reference = Graph::from_edges(3, [(0, 1), (1, 2)]).unwrap();
/// let candidates = vec![
///     Graph::from_edges(3, [(0, 2), (2, 1)]).unwrap(),
///     Graph::from_edges(3, [(0, 1), (1, 2), (2, 0)]).unwrap(),
/// ];
/// let dispatcher = Dispatcher::new(DispatchConfig { workers: 2 }).unwrap();
/// let report = dispatcher.run(&reference, &candidates).unwrap();
/// assert!(report.outcomes[0].is_isomorphic());
/// assert!(!report.outcomes[1].is_isomorphic());
/// ```
#[derive(Debug)]
pub struct Dispatcher {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl Dispatcher {
    pub fn new(config: DispatchConfig) -> Result<Self, DispatchError> {
        let workers = config.workers.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("vf2pp-worker-{i}"))
            .build()?;
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn run(
        &self,
        reference: &Graph,
        candidates: &[Graph],
    ) -> Result<BatchReport, DispatchError> {
        self.run_encoded(&flatten(reference, None), candidates)
    }

    /// Run with an already encoded reference graph
    pub fn run_encoded(
        &self,
        reference: &[i64],
        candidates: &[Graph],
    ) -> Result<BatchReport, DispatchError> {
        let start = Instant::now();
        let assignments = round_robin(candidates.len(), self.workers);
        debug!(
            "Dispatching {} candidates to {} workers",
            candidates.len(),
            self.workers
        );

        let results = self.pool.install(|| {
            assignments
                .into_par_iter()
                .enumerate()
                .map(|(worker, assigned)| {
                    run_worker(worker, reference, candidates, assigned)
                })
                .collect::<Result<Vec<_>, _>>()
        })?;

        let mut outcomes = vec![Outcome::NotIsomorphic; candidates.len()];
        let mut timings = Vec::with_capacity(results.len());
        for (timing, results) in results {
            for (idx, outcome) in results {
                outcomes[idx] = outcome;
            }
            timings.push(timing);
        }
        let elapsed = start.elapsed();
        info!(
            "Batch of {} queries finished in {:.4}s",
            candidates.len(),
            elapsed.as_secs_f64()
        );
        Ok(BatchReport {
            outcomes,
            timings,
            elapsed,
        })
    }
}

type WorkerResult = (WorkerTiming, Vec<(usize, Outcome)>);

fn run_worker(
    worker: usize,
    reference: &[i64],
    candidates: &[Graph],
    assigned: Vec<usize>,
) -> Result<WorkerResult, DispatchError> {
    let start = Instant::now();
    let reference = unflatten(reference)
        .map_err(|source| DispatchError::Transport { worker, source })?;
    let results: Vec<_> = assigned
        .into_iter()
        .map(|idx| {
            let outcome = is_isomorphic(&reference, &candidates[idx]);
            debug!(
                "Worker {worker}: candidate {idx} isomorphic: {}",
                outcome.is_isomorphic()
            );
            (idx, outcome)
        })
        .collect();
    let timing = WorkerTiming {
        worker,
        queries: results.len(),
        elapsed: start.elapsed(),
    };
    Ok((timing, results))
}

/// Candidate indices for each worker, `i` going to worker `i % workers`
fn round_robin(candidates: usize, workers: usize) -> Vec<Vec<usize>> {
    let mut assignments = vec![Vec::new(); workers];
    for i in 0..candidates {
        assignments[i % workers].push(i);
    }
    assignments
}

#[cfg(test)]
mod tests {
    use super::*;

    use petgraph::algo::is_isomorphic as petgraph_is_isomorphic;
    use rand::prelude::*;
    use rand_xoshiro::Xoshiro256Plus;
    use testing::{edge_switch, randomize_labels, GraphIter};

    #[test]
    fn assignment() {
        assert_eq!(round_robin(5, 2), vec![vec![0, 2, 4], vec![1, 3]]);
        assert_eq!(round_robin(1, 3), vec![vec![0], vec![], vec![]]);
    }

    #[test]
    fn batch() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let reference = GraphIter::default().nth(10).unwrap();
        let mut candidates = Vec::new();
        let mut expected = Vec::new();
        for i in 0..40 {
            let mut g = randomize_labels(&reference, &mut rng);
            if i % 3 == 0 {
                g = edge_switch(&g, &mut rng);
            }
            expected.push(petgraph_is_isomorphic(&reference, &g));
            candidates.push(Graph::from(&g));
        }
        let reference = Graph::from(&reference);

        let dispatcher =
            Dispatcher::new(DispatchConfig { workers: 3 }).unwrap();
        let report = dispatcher.run(&reference, &candidates).unwrap();
        let found: Vec<_> =
            report.outcomes.iter().map(|o| o.is_isomorphic()).collect();
        assert_eq!(found, expected);
        assert_eq!(report.timings.len(), 3);
        assert_eq!(
            report.timings.iter().map(|t| t.queries).sum::<usize>(),
            candidates.len()
        );
    }

    #[test]
    fn size_mismatch_and_empty_batch() {
        let reference = Graph::from_edges(2, [(0, 1)]).unwrap();
        let dispatcher =
            Dispatcher::new(DispatchConfig { workers: 0 }).unwrap();
        assert_eq!(dispatcher.workers(), 1);

        let report = dispatcher.run(&reference, &[]).unwrap();
        assert!(report.outcomes.is_empty());

        let report = dispatcher.run(&reference, &[Graph::new(3)]).unwrap();
        assert_eq!(report.outcomes, vec![Outcome::NotIsomorphic]);
    }

    #[test]
    fn transport_failure() {
        let dispatcher =
            Dispatcher::new(DispatchConfig { workers: 2 }).unwrap();
        let err = dispatcher
            .run_encoded(&[3, 0, -1], &[Graph::new(3)])
            .unwrap_err();
        assert!(matches!(err, DispatchError::Transport { .. }));
    }
}
