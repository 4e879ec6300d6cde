//! Circular solution landscapes.

use anyhow::{Context, Result, bail};
use rand::prelude::*;
use rand_distr::Uniform;
use std::ops::Range;

/// Ring of values agents search to maximize.
///
/// Indexing wraps around, so position `n` is position `0` again.
#[derive(Debug, Clone, PartialEq)]
pub struct Landscape {
    vals: Vec<f64>,
}

impl Landscape {
    /// Build a landscape from explicit values.
    pub fn from_vals(vals: Vec<f64>) -> Result<Self> {
        if vals.is_empty() {
            bail!("landscape must have at least one value");
        }
        Ok(Self { vals })
    }

    /// Draw a landscape of `n` values in `range`.
    ///
    /// With `smoothness == 0` every value is drawn independently. Otherwise
    /// values are drawn at anchor points on average `smoothness` apart and the
    /// positions in between are linearly interpolated, closing the ring back
    /// onto the first value.
    pub fn generate<R: Rng + ?Sized>(
        n: usize,
        smoothness: usize,
        range: Range<f64>,
        rng: &mut R,
    ) -> Result<Self> {
        if n == 0 {
            bail!("landscape length must be positive");
        }
        let val_dist = Uniform::new(range.start, range.end).context("invalid value range")?;

        if smoothness == 0 {
            let vals = (0..n).map(|_| val_dist.sample(rng)).collect();
            return Ok(Self { vals });
        }

        let max_gap = smoothness
            .checked_mul(2)
            .with_context(|| format!("invalid smoothness {smoothness}"))?;
        let gap_dist = Uniform::new(0, max_gap).context("invalid smoothness")?;

        // One extra slot for the point that closes the ring.
        let n_slots = n.checked_add(1).context("landscape length too large")?;
        let mut anchors: Vec<Option<f64>> = vec![None; n_slots];
        let mut i_anc: usize = 0;
        while i_anc < n {
            anchors[i_anc] = Some(val_dist.sample(rng));
            i_anc = i_anc.saturating_add(1 + gap_dist.sample(rng));
        }
        if anchors[n - 1].is_none() {
            anchors[n] = anchors[0];
        }

        let mut vals = interpolate(&anchors);
        vals.truncate(n);

        Ok(Self { vals })
    }

    pub fn len(&self) -> usize {
        self.vals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vals.is_empty()
    }

    /// Value at `idx`, wrapping around the ring.
    pub fn get(&self, idx: usize) -> f64 {
        self.vals[idx % self.vals.len()]
    }

    /// Highest value anywhere on the ring.
    pub fn max(&self) -> f64 {
        self.vals.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn vals(&self) -> &[f64] {
        &self.vals
    }
}

/// Linearly fill the gaps between anchors.
///
/// The first slot must hold an anchor. Slots after the last anchor take its value.
fn interpolate(anchors: &[Option<f64>]) -> Vec<f64> {
    let mut vals = Vec::with_capacity(anchors.len());
    let mut prev: Option<(usize, f64)> = None;

    for (idx, anchor) in anchors.iter().enumerate() {
        let Some(val) = *anchor else {
            continue;
        };
        if let Some((prev_idx, prev_val)) = prev {
            let span = (idx - prev_idx) as f64;
            for gap_idx in prev_idx + 1..idx {
                let frac = (gap_idx - prev_idx) as f64 / span;
                vals.push(prev_val + frac * (val - prev_val));
            }
        }
        vals.push(val);
        prev = Some((idx, val));
    }

    if let Some((_, last_val)) = prev {
        vals.resize(anchors.len(), last_val);
    }

    vals
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha12Rng;

    fn max_jump(landscape: &Landscape) -> f64 {
        let n = landscape.len();
        (0..n)
            .map(|idx| (landscape.get(idx + 1) - landscape.get(idx)).abs())
            .fold(0.0, f64::max)
    }

    #[test]
    fn generated_landscape_has_exact_length_and_range() {
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        for n in [1, 2, 3, 10, 97] {
            for smoothness in [0, 1, 2, 5, 40] {
                let landscape = Landscape::generate(n, smoothness, 0.0..100.0, &mut rng).unwrap();
                assert_eq!(landscape.len(), n);
                assert!(landscape.vals().iter().all(|&v| (0.0..100.0).contains(&v)));
            }
        }
    }

    #[test]
    fn get_wraps_around_the_ring() {
        let landscape = Landscape::from_vals(vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(landscape.get(3), 1.0);
        assert_eq!(landscape.get(7), 2.0);
        assert_eq!(landscape.max(), 3.0);
    }

    fn assert_close(vals: &[f64], exp_vals: &[f64]) {
        assert_eq!(vals.len(), exp_vals.len());
        for (val, exp_val) in vals.iter().zip(exp_vals) {
            assert!((val - exp_val).abs() < 1e-12, "{vals:?} != {exp_vals:?}");
        }
    }

    #[test]
    fn interpolation_closes_the_ring() {
        let anchors = [Some(0.0), None, Some(4.0), None, None, Some(0.0)];
        assert_close(
            &interpolate(&anchors),
            &[0.0, 2.0, 4.0, 8.0 / 3.0, 4.0 / 3.0, 0.0],
        );
    }

    #[test]
    fn interpolation_fills_trailing_gap_with_last_anchor() {
        let anchors = [Some(1.0), None, Some(3.0), None];
        assert_close(&interpolate(&anchors), &[1.0, 2.0, 3.0, 3.0]);
    }

    #[test]
    fn smoothing_reduces_jumps() {
        let mut smooth_jumps = 0.0;
        let mut rugged_jumps = 0.0;
        for seed in 0..32 {
            let mut rng = ChaCha12Rng::seed_from_u64(seed);
            let smooth = Landscape::generate(12, 4, 0.0..100.0, &mut rng).unwrap();
            let mut rng = ChaCha12Rng::seed_from_u64(seed);
            let rugged = Landscape::generate(12, 0, 0.0..100.0, &mut rng).unwrap();
            smooth_jumps += max_jump(&smooth);
            rugged_jumps += max_jump(&rugged);
        }
        assert!(smooth_jumps < rugged_jumps);
    }

    #[test]
    fn smoothing_reduces_jumps_on_a_small_ring() {
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let smooth = Landscape::generate(12, 4, 0.0..100.0, &mut rng).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let rugged = Landscape::generate(12, 0, 0.0..100.0, &mut rng).unwrap();
        assert!(max_jump(&smooth) <= max_jump(&rugged));
    }

    #[test]
    fn oversized_smoothness_is_rejected() {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        assert!(Landscape::generate(10, usize::MAX, 0.0..100.0, &mut rng).is_err());
        let landscape = Landscape::generate(10, usize::MAX / 2, 0.0..100.0, &mut rng).unwrap();
        assert_eq!(landscape.len(), 10);
    }

    #[test]
    fn smooth_landscape_is_linear_between_anchors() {
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let landscape = Landscape::generate(200, 6, 0.0..100.0, &mut rng).unwrap();
        // Away from anchors the second difference vanishes, so most points are collinear.
        let n_linear = (1..199)
            .filter(|&idx| {
                let curv = landscape.get(idx - 1) - 2.0 * landscape.get(idx) + landscape.get(idx + 1);
                curv.abs() < 1e-9
            })
            .count();
        assert!(n_linear > 100);
    }

    #[test]
    fn same_seed_gives_same_landscape() {
        let mut rng_a = ChaCha12Rng::seed_from_u64(3);
        let mut rng_b = ChaCha12Rng::seed_from_u64(3);
        let a = Landscape::generate(50, 3, 0.0..100.0, &mut rng_a).unwrap();
        let b = Landscape::generate(50, 3, 0.0..100.0, &mut rng_b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_landscape_is_rejected() {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        assert!(Landscape::generate(0, 0, 0.0..100.0, &mut rng).is_err());
        assert!(Landscape::from_vals(Vec::new()).is_err());
    }
}
