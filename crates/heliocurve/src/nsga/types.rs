use std::fmt;
use std::path::PathBuf;

/// One population member: genome, objective vector, and the selection
/// bookkeeping assigned by ranking.
#[derive(Clone, Debug)]
pub struct Individual {
    pub genes: Vec<f64>,
    /// Empty until evaluated; all components are minimized.
    pub objectives: Vec<f64>,
    /// 0 = Pareto front.
    pub rank: usize,
    /// Crowding distance; +inf at front boundaries.
    pub crowding: f64,
}

impl Individual {
    pub fn new(genes: Vec<f64>) -> Self {
        Self {
            genes,
            objectives: Vec::new(),
            rank: 0,
            crowding: 0.0,
        }
    }

    /// Scalarization used only for the per-generation "best genes" log.
    pub fn objective_sum(&self) -> f64 {
        self.objectives.iter().sum()
    }
}

/// Strict Pareto dominance: no component worse, at least one strictly better.
pub fn dominates(p: &Individual, q: &Individual) -> bool {
    let mut strictly_better = false;
    for (a, b) in p.objectives.iter().zip(q.objectives.iter()) {
        if a > b {
            return false;
        }
        if a < b {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Driver configuration. `lower`/`upper` fix the genome length.
#[derive(Clone, Debug)]
pub struct NsgaCfg {
    pub population: usize,
    pub generations: usize,
    pub crossover_rate: f64,
    /// Per-gene mutation probability.
    pub mutation_rate: f64,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub eta_crossover: f64,
    pub eta_mutation: f64,
    pub seed: u64,
    /// Evaluation parallelism; 0 or 1 runs everything on the driver thread.
    pub workers: usize,
    /// When set, per-generation front-0 and best-genes CSVs land here.
    pub log_dir: Option<PathBuf>,
}

impl NsgaCfg {
    /// Defaults around the given bounds: population 50, 100 generations,
    /// crossover 0.9, mutation 1/L, both distribution indices 20.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Self {
        let l = lower.len().max(1);
        Self {
            population: 50,
            generations: 100,
            crossover_rate: 0.9,
            mutation_rate: 1.0 / l as f64,
            lower,
            upper,
            eta_crossover: 20.0,
            eta_mutation: 20.0,
            seed: 0,
            workers: 1,
            log_dir: None,
        }
    }
}

/// Errors surfaced at construction or while writing generation logs.
#[derive(Debug)]
pub enum NsgaError {
    EmptyGenome,
    BoundsMismatch { lower: usize, upper: usize },
    InvalidBound { index: usize },
    PopulationTooSmall { population: usize },
    WorkerPool { reason: String },
    Log { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for NsgaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NsgaError::EmptyGenome => write!(f, "genome length must be positive"),
            NsgaError::BoundsMismatch { lower, upper } => write!(
                f,
                "bound lengths differ: {lower} lower vs {upper} upper entries"
            ),
            NsgaError::InvalidBound { index } => {
                write!(f, "lower bound exceeds upper bound at gene {index}")
            }
            NsgaError::PopulationTooSmall { population } => {
                write!(f, "population must hold at least 2 individuals, got {population}")
            }
            NsgaError::WorkerPool { reason } => write!(f, "worker pool setup failed: {reason}"),
            NsgaError::Log { path, source } => {
                write!(f, "writing generation log {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for NsgaError {}
