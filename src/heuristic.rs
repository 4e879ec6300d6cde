//! Step-size heuristics: enumeration, scoring and diversity.

use crate::landscape::Landscape;
use crate::search::climb;
use crate::stats::Accumulator;
use anyhow::{Context, Result, bail};
use std::{collections::BTreeSet, fmt};

/// Ordered list of distinct step sizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Heuristic(Vec<usize>);

impl Heuristic {
    /// Build a heuristic from non-empty, positive and distinct `steps`.
    pub fn new(steps: Vec<usize>) -> Result<Self> {
        if steps.is_empty() {
            bail!("heuristic has no steps");
        }
        if steps.contains(&0) {
            bail!("heuristic step must be positive");
        }
        let distinct: BTreeSet<usize> = steps.iter().copied().collect();
        if distinct.len() != steps.len() {
            bail!("heuristic steps must be distinct, got {steps:?}");
        }
        Ok(Self(steps))
    }

    pub fn steps(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steps: Vec<_> = self.0.iter().map(|step| step.to_string()).collect();
        write!(f, "({})", steps.join(", "))
    }
}

/// Heuristic together with its expected outcome on a landscape.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredHeuristic {
    pub heuristic: Heuristic,
    pub score: f64,
}

/// Number of heuristics with `k` distinct steps out of `1..=l`, saturating at `u128::MAX`.
pub fn count(k: usize, l: usize) -> u128 {
    if k > l {
        return 0;
    }
    (l - k + 1..=l).fold(1u128, |acc, factor| acc.saturating_mul(factor as u128))
}

/// All ordered selections of `k` distinct step sizes from `1..=l`, in lexicographic order.
pub fn enumerate(k: usize, l: usize) -> Vec<Heuristic> {
    let capacity = usize::try_from(count(k, l)).unwrap_or(0);
    let mut heu_vec = Vec::with_capacity(capacity);
    let mut steps = Vec::with_capacity(k);
    let mut used = vec![false; l + 1];
    extend_permutations(k, l, &mut steps, &mut used, &mut heu_vec);
    heu_vec
}

fn extend_permutations(
    k: usize,
    l: usize,
    steps: &mut Vec<usize>,
    used: &mut [bool],
    heu_vec: &mut Vec<Heuristic>,
) {
    if steps.len() == k {
        heu_vec.push(Heuristic(steps.clone()));
        return;
    }
    for step in 1..=l {
        if used[step] {
            continue;
        }
        used[step] = true;
        steps.push(step);
        extend_permutations(k, l, steps, used, heu_vec);
        steps.pop();
        used[step] = false;
    }
}

/// Mean value reached by climbing with `heuristic` from every position of `landscape`.
///
/// # Errors
/// Returns an error if the landscape or the heuristic is empty.
pub fn score(heuristic: &Heuristic, landscape: &Landscape) -> Result<f64> {
    if landscape.is_empty() {
        bail!("cannot score a heuristic on an empty landscape");
    }
    if heuristic.is_empty() {
        bail!("cannot score a heuristic without steps");
    }

    let mut acc = Accumulator::new();
    for start in 0..landscape.len() {
        let result = climb(landscape, start, heuristic.steps())
            .with_context(|| format!("failed to climb with {heuristic}"))?;
        acc.add(result.value);
    }
    Ok(acc.mean())
}

/// Score every heuristic, keeping enumeration order.
pub fn score_all(heu_vec: Vec<Heuristic>, landscape: &Landscape) -> Result<Vec<ScoredHeuristic>> {
    heu_vec
        .into_iter()
        .map(|heuristic| {
            let score = score(&heuristic, landscape)?;
            Ok(ScoredHeuristic { heuristic, score })
        })
        .collect()
}

/// Fraction of positions at which the two heuristics use different steps.
pub fn diversity(heu_a: &Heuristic, heu_b: &Heuristic) -> f64 {
    let k = heu_a.len().max(heu_b.len());
    if k == 0 {
        return 0.0;
    }
    let n_same = heu_a
        .steps()
        .iter()
        .zip(heu_b.steps())
        .filter(|(a, b)| a == b)
        .count();
    (k - n_same) as f64 / k as f64
}

/// Mean diversity over all ordered pairs of distinct members, `0.0` for fewer than two.
pub fn mean_diversity(heu_vec: &[&Heuristic]) -> f64 {
    let mut acc = Accumulator::new();
    for (i_a, heu_a) in heu_vec.iter().enumerate() {
        for (i_b, heu_b) in heu_vec.iter().enumerate() {
            if i_a != i_b {
                acc.add(diversity(heu_a, heu_b));
            }
        }
    }
    if acc.is_empty() { 0.0 } else { acc.mean() }
}

/// Share of the `l` possible step sizes used by at least one heuristic.
pub fn coverage(heu_vec: &[&Heuristic], l: usize) -> f64 {
    if l == 0 {
        return 0.0;
    }
    let distinct: BTreeSet<usize> = heu_vec
        .iter()
        .flat_map(|heuristic| heuristic.steps().iter().copied())
        .collect();
    distinct.len() as f64 / l as f64
}
