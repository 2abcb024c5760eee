use crate::config::Config;
use crate::engine::{initialize, run_from, seeded_rng};
use crate::stats::{Accumulator, AccumulatorReport};
use anyhow::{Context, Result, bail};
use clap::ValueEnum;

/// Parameter varied by a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum SweepParam {
    ProbLightning,
    ProbTreeImmune,
    ProbHouseImmune,
    TimeToBurn,
    ForestDensity,
    HouseDensity,
}

impl SweepParam {
    pub fn name(self) -> &'static str {
        match self {
            SweepParam::ProbLightning => "prob_lightning",
            SweepParam::ProbTreeImmune => "prob_tree_immune",
            SweepParam::ProbHouseImmune => "prob_house_immune",
            SweepParam::TimeToBurn => "time_to_burn",
            SweepParam::ForestDensity => "forest_density",
            SweepParam::HouseDensity => "house_density",
        }
    }

    /// Values taken by the parameter: burn lengths 1 to 10, probabilities 0.0 to 1.0 by 0.1.
    pub fn values(self) -> Vec<f64> {
        match self {
            SweepParam::TimeToBurn => (1..=10).map(f64::from).collect(),
            _ => (0..=10).map(|i| f64::from(i) / 10.0).collect(),
        }
    }

    fn apply(self, cfg: &mut Config, val: f64) {
        match self {
            SweepParam::ProbLightning => cfg.model.prob_lightning = val,
            SweepParam::ProbTreeImmune => cfg.model.prob_tree_immune = val,
            SweepParam::ProbHouseImmune => cfg.model.prob_house_immune = val,
            SweepParam::TimeToBurn => cfg.model.time_to_burn = val as u32,
            SweepParam::ForestDensity => cfg.init.forest_density = val,
            SweepParam::HouseDensity => cfg.init.house_density = val,
        }
    }
}

/// Burned-fraction statistics for one parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    pub val: f64,
    pub report: AccumulatorReport,
    /// Runs discarded because the settlement column started empty.
    pub n_skipped: usize,
}

/// Average the fraction of houses burned over `n_runs` runs per parameter value.
///
/// With a seed, run `i_run` of every value is seeded with `seed + i_run`.
pub fn sweep(
    base: &Config,
    param: SweepParam,
    n_runs: usize,
    seed: Option<u64>,
) -> Result<Vec<SweepPoint>> {
    if n_runs == 0 {
        bail!("number of runs must be positive");
    }

    let name = param.name();
    let mut points = Vec::new();
    for val in param.values() {
        let mut cfg = base.clone();
        param.apply(&mut cfg, val);
        cfg.run.keep_history = false;
        cfg.validate()
            .with_context(|| format!("invalid config for {name} = {val}"))?;

        let mut acc = Accumulator::new();
        let mut n_skipped = 0;
        for i_run in 0..n_runs {
            let mut rng = seeded_rng(seed.map(|seed| seed.wrapping_add(i_run as u64)))?;

            let initial = initialize(&cfg, &mut rng).context("failed to initialize landscape")?;
            if initial.house_count() == 0 {
                log::warn!("skipped run {i_run} for {name} = {val}: no houses");
                n_skipped += 1;
                continue;
            }

            let outcome = run_from(&cfg, initial, &mut rng)
                .with_context(|| format!("failed run {i_run} for {name} = {val}"))?;
            acc.add(outcome.fraction_burned);
        }

        let report = acc.report();
        log::info!(
            "{name} = {val:.1}: mean {:.4}, std dev {:.4}",
            report.mean,
            report.std_dev
        );
        points.push(SweepPoint {
            val,
            report,
            n_skipped,
        });
    }

    Ok(points)
}
