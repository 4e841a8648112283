use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

/// VF2++ graph isomorphism checker
#[derive(Parser, Debug)]
#[command(name = "vf2pp")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Increase log verbosity, may be repeated. `RUST_LOG` takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check whether two graph files describe isomorphic graphs
    Compare {
        /// Reference graph file
        reference: PathBuf,
        /// Candidate graph file
        candidate: PathBuf,
    },
    /// Compare many candidate graphs against one reference graph
    Batch {
        /// Whitespace separated list of graph files, the reference first
        manifest: PathBuf,
        /// Number of worker threads [default: available parallelism]
        #[arg(short, long)]
        workers: Option<usize>,
        /// Directory the listed files are relative to [default: the
        /// manifest's directory]
        #[arg(short, long)]
        graph_dir: Option<PathBuf>,
    },
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
