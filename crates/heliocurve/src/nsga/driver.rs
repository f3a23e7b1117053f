//! The generational loop: init, variation, evaluation, selection, logging.

use std::fmt::Write as _;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::ops::{binary_tournament, polynomial_mutation, sbx_crossover};
use super::sort::{assign_crowding, fast_non_dominated_sort};
use super::types::{Individual, NsgaCfg, NsgaError};

/// NSGA-II driver over an injected evaluator.
///
/// The evaluator maps a genome to a minimized objective vector and must be
/// total: borderline inputs yield a legal (possibly penalty) vector, never a
/// panic or an error.
pub struct Nsga2<F> {
    cfg: NsgaCfg,
    eval: F,
    rng: StdRng,
    pool: Option<rayon::ThreadPool>,
}

impl<F> Nsga2<F>
where
    F: Fn(&[f64]) -> Vec<f64> + Sync,
{
    /// Validate the configuration and seed the RNG. Fails fast; no partial
    /// state survives an error.
    pub fn new(cfg: NsgaCfg, eval: F) -> Result<Self, NsgaError> {
        if cfg.lower.is_empty() {
            return Err(NsgaError::EmptyGenome);
        }
        if cfg.lower.len() != cfg.upper.len() {
            return Err(NsgaError::BoundsMismatch {
                lower: cfg.lower.len(),
                upper: cfg.upper.len(),
            });
        }
        if let Some(index) = (0..cfg.lower.len()).find(|&i| cfg.lower[i] > cfg.upper[i]) {
            return Err(NsgaError::InvalidBound { index });
        }
        if cfg.population < 2 {
            return Err(NsgaError::PopulationTooSmall {
                population: cfg.population,
            });
        }
        let pool = if cfg.workers > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(cfg.workers)
                    .build()
                    .map_err(|e| NsgaError::WorkerPool {
                        reason: e.to_string(),
                    })?,
            )
        } else {
            None
        };
        let rng = StdRng::seed_from_u64(cfg.seed);
        Ok(Self {
            cfg,
            eval,
            rng,
            pool,
        })
    }

    /// Run the full generational loop; returns the final population with
    /// ranks and crowding distances assigned.
    pub fn run(&mut self) -> Result<Vec<Individual>, NsgaError> {
        let genome_len = self.cfg.lower.len();
        tracing::info!(
            population = self.cfg.population,
            generations = self.cfg.generations,
            genome_len,
            workers = self.cfg.workers,
            seed = self.cfg.seed,
            "evolution start"
        );
        let mut pop: Vec<Individual> = (0..self.cfg.population)
            .map(|_| {
                let genes = (0..genome_len)
                    .map(|g| {
                        let (lo, hi) = (self.cfg.lower[g], self.cfg.upper[g]);
                        lo + self.rng.gen::<f64>() * (hi - lo)
                    })
                    .collect();
                Individual::new(genes)
            })
            .collect();
        self.evaluate(&mut pop);
        rank_population(&mut pop);

        for gen in 0..self.cfg.generations {
            let mut offspring = self.make_offspring(&pop);
            self.evaluate(&mut offspring);
            pop.append(&mut offspring);
            pop = select_next(pop, self.cfg.population);
            self.log_generation(gen, &pop)?;
            let front0 = pop.iter().filter(|i| i.rank == 0).count();
            let best = pop
                .iter()
                .map(Individual::objective_sum)
                .fold(f64::INFINITY, f64::min);
            tracing::debug!(generation = gen, front0, best_sum = best, "generation done");
        }
        Ok(pop)
    }

    /// Evaluate unevaluated members, fanning out per individual when a worker
    /// pool is configured.
    fn evaluate(&self, inds: &mut [Individual]) {
        let eval = &self.eval;
        match &self.pool {
            Some(pool) => pool.install(|| {
                inds.par_iter_mut().for_each(|ind| {
                    if ind.objectives.is_empty() {
                        ind.objectives = eval(&ind.genes);
                    }
                });
            }),
            None => {
                for ind in inds.iter_mut() {
                    if ind.objectives.is_empty() {
                        ind.objectives = eval(&ind.genes);
                    }
                }
            }
        }
    }

    fn make_offspring(&mut self, pop: &[Individual]) -> Vec<Individual> {
        let cfg = &self.cfg;
        let rng = &mut self.rng;
        let mut offspring = Vec::with_capacity(cfg.population);
        while offspring.len() < cfg.population {
            let a = binary_tournament(rng, pop);
            let b = binary_tournament(rng, pop);
            let (mut c1, mut c2) = sbx_crossover(
                rng,
                &pop[a].genes,
                &pop[b].genes,
                &cfg.lower,
                &cfg.upper,
                cfg.eta_crossover,
                cfg.crossover_rate,
            );
            polynomial_mutation(rng, &mut c1, &cfg.lower, &cfg.upper, cfg.eta_mutation, cfg.mutation_rate);
            polynomial_mutation(rng, &mut c2, &cfg.lower, &cfg.upper, cfg.eta_mutation, cfg.mutation_rate);
            offspring.push(Individual::new(c1));
            if offspring.len() < cfg.population {
                offspring.push(Individual::new(c2));
            }
        }
        offspring
    }

    fn log_generation(&self, gen: usize, pop: &[Individual]) -> Result<(), NsgaError> {
        let Some(dir) = &self.cfg.log_dir else {
            return Ok(());
        };
        let io_err = |path: &Path, source: std::io::Error| NsgaError::Log {
            path: path.to_path_buf(),
            source,
        };
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

        let num_objectives = pop.first().map_or(0, |i| i.objectives.len());
        let genome_len = self.cfg.lower.len();
        let mut front = String::new();
        let header: Vec<String> = (0..num_objectives)
            .map(|m| format!("f{m}"))
            .chain((0..genome_len).map(|g| format!("g{g}")))
            .collect();
        front.push_str(&header.join(","));
        front.push('\n');
        for ind in pop.iter().filter(|i| i.rank == 0) {
            let row: Vec<String> = ind
                .objectives
                .iter()
                .chain(ind.genes.iter())
                .map(|v| format!("{v}"))
                .collect();
            front.push_str(&row.join(","));
            front.push('\n');
        }
        let front_path = dir.join(format!("gen_{gen}_front0.csv"));
        std::fs::write(&front_path, front).map_err(|e| io_err(&front_path, e))?;

        if let Some(best) = pop.iter().min_by(|a, b| {
            a.objective_sum()
                .partial_cmp(&b.objective_sum())
                .unwrap_or(std::cmp::Ordering::Equal)
        }) {
            let mut line = String::new();
            for (i, g) in best.genes.iter().enumerate() {
                if i > 0 {
                    line.push(',');
                }
                let _ = write!(line, "{g}");
            }
            let best_path = dir.join(format!("gen_{gen}_bestGenes.csv"));
            std::fs::write(&best_path, line).map_err(|e| io_err(&best_path, e))?;
        }
        Ok(())
    }
}

/// Rank + crowd an already evaluated population in place.
fn rank_population(pop: &mut [Individual]) {
    let fronts = fast_non_dominated_sort(pop);
    for (rank, front) in fronts.iter().enumerate() {
        for &i in front {
            pop[i].rank = rank;
        }
    }
    for front in &fronts {
        assign_crowding(pop, front);
    }
}

/// Environmental selection: fill from the best fronts, truncating the first
/// overflowing front by decreasing crowding distance.
fn select_next(mut combined: Vec<Individual>, target: usize) -> Vec<Individual> {
    let fronts = fast_non_dominated_sort(&combined);
    for (rank, front) in fronts.iter().enumerate() {
        for &i in front {
            combined[i].rank = rank;
        }
    }
    for front in &fronts {
        assign_crowding(&mut combined, front);
    }

    let mut next: Vec<Individual> = Vec::with_capacity(target);
    for front in &fronts {
        if next.len() == target {
            break;
        }
        if next.len() + front.len() <= target {
            next.extend(front.iter().map(|&i| combined[i].clone()));
        } else {
            let mut rest = front.clone();
            rest.sort_by(|&a, &b| {
                combined[b]
                    .crowding
                    .partial_cmp(&combined[a].crowding)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            let room = target - next.len();
            next.extend(rest.into_iter().take(room).map(|i| combined[i].clone()));
        }
    }
    next
}
