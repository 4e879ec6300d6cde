//! Hill climbing over a landscape with a fixed list of step sizes.

use crate::landscape::Landscape;
use anyhow::{Result, bail};

/// Final position and value reached by a single climb.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Climb {
    pub position: usize,
    pub value: f64,
}

/// Climb from `start` using `steps` until no step improves the current value.
///
/// Each pass tries every step in order from the current position, moving
/// whenever the value at the candidate position is strictly higher, so later
/// steps in a pass start from wherever earlier steps led. The climb stops
/// after a pass that leaves the value unchanged. The returned position is
/// wrapped into `0..n`.
///
/// # Errors
/// Returns an error if the climb keeps improving for more passes than the
/// landscape has distinct values, which cannot happen for a correct walk.
pub fn climb(landscape: &Landscape, start: usize, steps: &[usize]) -> Result<Climb> {
    let n = landscape.len();
    let mut current = start % n;
    let mut last_value = landscape.get(current);

    // Every pass but the last strictly raises the value.
    let max_passes = n + 1;
    for _ in 0..max_passes {
        let old_value = last_value;
        for &step in steps {
            let candidate = (current + step % n) % n;
            let new_value = landscape.get(candidate);
            if new_value > last_value {
                last_value = new_value;
                current = candidate;
            }
        }
        if last_value == old_value {
            return Ok(Climb {
                position: current,
                value: last_value,
            });
        }
    }

    bail!("invariant violation: climb from {start} did not converge within {max_passes} passes")
}
