//! Fast non-dominated sort and crowding distance.

use super::types::{dominates, Individual};

/// Rank the population into Pareto fronts (front 0 first). Every index
/// appears in exactly one front; front 0 is never empty for nonempty input.
pub(crate) fn fast_non_dominated_sort(pop: &[Individual]) -> Vec<Vec<usize>> {
    let n = pop.len();
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut domination_count = vec![0usize; n];
    let mut fronts: Vec<Vec<usize>> = vec![Vec::new()];

    for p in 0..n {
        for q in 0..n {
            if p == q {
                continue;
            }
            if dominates(&pop[p], &pop[q]) {
                dominated_by[p].push(q);
            } else if dominates(&pop[q], &pop[p]) {
                domination_count[p] += 1;
            }
        }
        if domination_count[p] == 0 {
            fronts[0].push(p);
        }
    }

    let mut current = 0;
    while !fronts[current].is_empty() {
        let mut next: Vec<usize> = Vec::new();
        for &p in &fronts[current] {
            for &q in &dominated_by[p] {
                domination_count[q] -= 1;
                if domination_count[q] == 0 {
                    next.push(q);
                }
            }
        }
        fronts.push(next);
        current += 1;
    }
    fronts.pop();
    fronts
}

/// Assign crowding distances within one front. Boundary members on each
/// objective get +inf; interior members accumulate normalized gaps.
pub(crate) fn assign_crowding(pop: &mut [Individual], front: &[usize]) {
    for &i in front {
        pop[i].crowding = 0.0;
    }
    if front.len() < 2 {
        for &i in front {
            pop[i].crowding = f64::INFINITY;
        }
        return;
    }
    let num_objectives = pop[front[0]].objectives.len();
    let mut order: Vec<usize> = front.to_vec();
    for m in 0..num_objectives {
        order.sort_by(|&a, &b| {
            pop[a].objectives[m]
                .partial_cmp(&pop[b].objectives[m])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let first = order[0];
        let last = order[order.len() - 1];
        let span = pop[last].objectives[m] - pop[first].objectives[m];
        pop[first].crowding = f64::INFINITY;
        pop[last].crowding = f64::INFINITY;
        if span <= 0.0 {
            continue;
        }
        for w in order.windows(3) {
            let (prev, mid, next) = (w[0], w[1], w[2]);
            if pop[mid].crowding.is_finite() {
                pop[mid].crowding +=
                    (pop[next].objectives[m] - pop[prev].objectives[m]) / span;
            }
        }
    }
}
