use crate::config::Config;
use crate::engine::{Outcome, run, seeded_rng};
use crate::model::Category;
use crate::sweep::{SweepParam, SweepPoint, sweep};
use anyhow::{Context, Result};
use std::path::Path;

/// Entry point of the command line front end.
///
/// Holds the validated configuration and dispatches runs and sweeps.
pub struct Manager {
    cfg: Config,
}

impl Manager {
    /// Load the configuration from `config_file`, or use the defaults when absent.
    pub fn new<P: AsRef<Path>>(config_file: Option<P>) -> Result<Self> {
        let cfg = match config_file {
            Some(file) => {
                let file = file.as_ref();
                let cfg = Config::from_file(file).context("failed to construct cfg")?;
                log::info!("loaded {file:?}");
                cfg
            }
            None => Config::default(),
        };
        log::info!("{cfg:#?}");

        Ok(Self { cfg })
    }

    pub fn cfg(&self) -> &Config {
        &self.cfg
    }

    /// Run one simulation; `seed` overrides the configured seed.
    pub fn run_simulation(&self, seed: Option<u64>) -> Result<Outcome> {
        let mut rng = seeded_rng(seed.or(self.cfg.run.seed))?;

        let outcome = run(&self.cfg, &mut rng).context("failed to run simulation")?;
        log::info!(
            "{} of {} houses survived",
            outcome.surviving_houses,
            outcome.initial_house_count
        );

        if let Some(history) = &outcome.history {
            for (i_gen, grid) in history.iter().enumerate() {
                log::debug!(
                    "generation {i_gen}: {} trees, {} burning\n{grid}",
                    grid.count(Category::Tree),
                    grid.count(Category::Burning)
                );
            }
        }

        Ok(outcome)
    }

    /// Sweep `param` over its range; `seed` overrides the configured seed.
    pub fn run_sweep(
        &self,
        param: SweepParam,
        n_runs: usize,
        seed: Option<u64>,
    ) -> Result<Vec<SweepPoint>> {
        sweep(&self.cfg, param, n_runs, seed.or(self.cfg.run.seed))
            .with_context(|| format!("failed to sweep {}", param.name()))
    }
}
