//! NSGA-II driver for real-coded two-objective search.
//!
//! Purpose
//! - Evolve fixed-length real genomes against an injected evaluator:
//!   binary-tournament parents, SBX crossover, polynomial mutation, fast
//!   non-dominated sort, crowding-distance truncation.
//!
//! Why this design
//! - The evaluator is a plain `Fn(&[f64]) -> Vec<f64>` (minimization on every
//!   component); the driver knows nothing about geometry or daylight.
//! - Evaluations are independent per individual and fan out over a scoped
//!   rayon pool; everything else (selection, variation, ranking, logging)
//!   runs on the driver thread in memory-layout order, so a single-worker
//!   run with a fixed seed is bit-reproducible.
//!
//! Code cross-refs: `fitness::DaylightEvaluator` (the production evaluator),
//! `ops` (variation operators), `sort` (ranking).

mod driver;
mod ops;
mod sort;
mod types;

pub use driver::Nsga2;
pub use types::{dominates, Individual, NsgaCfg, NsgaError};
