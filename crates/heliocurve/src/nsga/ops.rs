//! Variation operators: tournament selection, SBX, polynomial mutation.

use rand::Rng;

use super::types::Individual;

/// Parents closer than this per gene skip recombination for that gene.
const SBX_EQ_EPS: f64 = 1e-14;

/// Binary tournament: lower rank wins, ties go to the larger crowding
/// distance, full ties keep the first draw.
pub(crate) fn binary_tournament<R: Rng>(rng: &mut R, pop: &[Individual]) -> usize {
    let a = rng.gen_range(0..pop.len());
    let b = rng.gen_range(0..pop.len());
    if pop[b].rank < pop[a].rank
        || (pop[b].rank == pop[a].rank && pop[b].crowding > pop[a].crowding)
    {
        b
    } else {
        a
    }
}

/// Simulated binary crossover (bounded, single-beta form).
///
/// One Bernoulli(`rate`) trial decides the whole pair; on failure the parents
/// are cloned. Children are clamped to the bounds.
pub(crate) fn sbx_crossover<R: Rng>(
    rng: &mut R,
    p1: &[f64],
    p2: &[f64],
    lower: &[f64],
    upper: &[f64],
    eta: f64,
    rate: f64,
) -> (Vec<f64>, Vec<f64>) {
    let mut c1 = p1.to_vec();
    let mut c2 = p2.to_vec();
    if rng.gen::<f64>() > rate {
        return (c1, c2);
    }
    for g in 0..c1.len() {
        let (x1, x2) = (p1[g], p2[g]);
        if (x1 - x2).abs() <= SBX_EQ_EPS {
            continue;
        }
        let (lo, hi) = (lower[g], upper[g]);
        let y1 = x1.min(x2);
        let y2 = x1.max(x2);
        let u: f64 = rng.gen();
        let beta = 1.0 + 2.0 * (y1 - lo) / (y2 - y1);
        let alpha = 2.0 - beta.powf(-(eta + 1.0));
        let beta_q = if u <= 1.0 / alpha {
            (u * alpha).powf(1.0 / (eta + 1.0))
        } else {
            (1.0 / (2.0 - u * alpha)).powf(1.0 / (eta + 1.0))
        };
        let child_lo = 0.5 * ((y1 + y2) - beta_q * (y2 - y1));
        let child_hi = 0.5 * ((y1 + y2) + beta_q * (y2 - y1));
        let (a, b) = if rng.gen::<bool>() {
            (child_hi, child_lo)
        } else {
            (child_lo, child_hi)
        };
        c1[g] = a.clamp(lo, hi);
        c2[g] = b.clamp(lo, hi);
    }
    (c1, c2)
}

/// Polynomial mutation, one Bernoulli(`rate`) trial per gene.
pub(crate) fn polynomial_mutation<R: Rng>(
    rng: &mut R,
    genes: &mut [f64],
    lower: &[f64],
    upper: &[f64],
    eta: f64,
    rate: f64,
) {
    for g in 0..genes.len() {
        if rng.gen::<f64>() >= rate {
            continue;
        }
        let (lo, hi) = (lower[g], upper[g]);
        let span = hi - lo;
        if span <= 0.0 {
            continue;
        }
        let x = genes[g];
        let d1 = (x - lo) / span;
        let d2 = (hi - x) / span;
        let u: f64 = rng.gen();
        let exp = 1.0 / (eta + 1.0);
        let dq = if u < 0.5 {
            (2.0 * u + (1.0 - 2.0 * u) * (1.0 - d1).powf(eta + 1.0)).powf(exp) - 1.0
        } else {
            1.0 - (2.0 * (1.0 - u) + 2.0 * (u - 0.5) * (1.0 - d2).powf(eta + 1.0)).powf(exp)
        };
        genes[g] = (x + dq * span).clamp(lo, hi);
    }
}
