use crate::model::History;
use anyhow::{Context, Result, bail};

/// Index of the generation at which surviving houses are counted.
///
/// This is the second-to-last generation of a run of `n_gen` generations.
pub fn measured_generation(n_gen: usize) -> Result<usize> {
    if n_gen < 2 {
        bail!("run must have at least 2 generations, but has {n_gen}");
    }
    Ok(n_gen - 2)
}

/// Fraction of the initial houses lost by the measured generation of `history`.
///
/// # Errors
/// Returns an error if `initial_house_count` is zero, if `history` has
/// fewer than two generations, or if the measured grid has no columns.
pub fn fraction_houses_burned(history: &History, initial_house_count: usize) -> Result<f64> {
    let i_gen = measured_generation(history.len()).context("history is too short")?;
    let grid = history
        .get(i_gen)
        .with_context(|| format!("history has no generation {i_gen}"))?;
    if grid.settlement_x().is_none() {
        bail!("generation {i_gen} has no settlement column");
    }
    fraction_burned(grid.house_count(), initial_house_count)
}

/// Fraction of houses lost given the surviving and initial house counts.
pub fn fraction_burned(surviving_houses: usize, initial_house_count: usize) -> Result<f64> {
    if initial_house_count == 0 {
        bail!("initial house count must be positive");
    }
    if surviving_houses > initial_house_count {
        bail!("surviving houses ({surviving_houses}) exceed initial houses ({initial_house_count})");
    }
    Ok(1.0 - surviving_houses as f64 / initial_house_count as f64)
}
