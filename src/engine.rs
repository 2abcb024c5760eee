use crate::analysis::{fraction_burned, measured_generation};
use crate::config::{Config, SpreadRule};
use crate::model::{Category, Cell, Grid, History};
use anyhow::{Context, Result, bail};
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;
use rand_distr::{Bernoulli, Uniform};

/// Result of a complete run.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Houses standing at generation 0.
    pub initial_house_count: usize,
    /// Houses standing at the measured generation.
    pub surviving_houses: usize,
    /// Fraction of the initial houses lost, in `[0, 1]`.
    pub fraction_burned: f64,
    /// Every generation, when `keep_history` is set.
    pub history: Option<History>,
}

/// Create the random number generator of a run.
///
/// Seeded from `seed` when given, from the OS otherwise.
pub fn seeded_rng(seed: Option<u64>) -> Result<ChaCha12Rng> {
    match seed {
        Some(seed) => Ok(ChaCha12Rng::seed_from_u64(seed)),
        None => ChaCha12Rng::try_from_os_rng().context("failed to seed rng from the OS"),
    }
}

/// Generate the landscape at generation 0.
///
/// Forest columns hold trees with probability `forest_density`,
/// the settlement column holds houses with probability `house_density`.
pub fn initialize<R: Rng + ?Sized>(cfg: &Config, rng: &mut R) -> Result<Grid> {
    cfg.validate().context("failed to validate config")?;

    let tree_dist = Bernoulli::new(cfg.init.forest_density)?;
    let house_dist = Bernoulli::new(cfg.init.house_density)?;

    let width = cfg.grid.width;
    let height = cfg.grid.height;
    let grid = Grid::from_fn(width, height, |x, _| {
        if x < width - 1 {
            if tree_dist.sample(rng) {
                Cell::Tree
            } else {
                Cell::Empty
            }
        } else if house_dist.sample(rng) {
            Cell::House
        } else {
            Cell::Empty
        }
    });

    Ok(grid)
}

/// Compute the generation following `prev`.
pub fn advance<R: Rng + ?Sized>(prev: &Grid, cfg: &Config, rng: &mut R) -> Result<Grid> {
    let transition = Transition::new(cfg).context("failed to construct transition")?;
    check_dims(prev, cfg)?;
    Ok(transition.apply(prev, rng))
}

/// Initialize a landscape and simulate it for `n_gen` generations.
pub fn run<R: Rng + ?Sized>(cfg: &Config, rng: &mut R) -> Result<Outcome> {
    let initial = initialize(cfg, rng).context("failed to initialize landscape")?;
    run_from(cfg, initial, rng)
}

/// Simulate a given generation-0 landscape for `n_gen` generations.
///
/// # Errors
/// Returns an error if the configuration is invalid, if the grid does not
/// match the configured dimensions, or if the settlement column has no houses.
pub fn run_from<R: Rng + ?Sized>(cfg: &Config, initial: Grid, rng: &mut R) -> Result<Outcome> {
    let transition = Transition::new(cfg).context("failed to construct transition")?;

    check_dims(&initial, cfg)?;

    let initial_house_count = initial.house_count();
    if initial_house_count == 0 {
        bail!("settlement column must hold at least one house");
    }

    let n_gen = cfg.run.n_gen;
    let i_gen_measured = measured_generation(n_gen)?;

    let mut history = cfg.run.keep_history.then(|| History::new(initial.clone()));
    let mut measured = (i_gen_measured == 0).then(|| initial.clone());

    let mut grid = initial;
    for i_gen in 1..n_gen {
        let next = transition.apply(&grid, rng);
        log::debug!(
            "generation {i_gen}: {} burning, {} houses",
            next.count(Category::Burning),
            next.house_count()
        );

        if i_gen == i_gen_measured {
            measured = Some(next.clone());
        }
        if let Some(history) = &mut history {
            history.push(next.clone());
        }
        grid = next;
    }

    let measured = measured.context("measured generation was never reached")?;
    let surviving_houses = measured.house_count();
    let fraction_burned = fraction_burned(surviving_houses, initial_house_count)?;

    Ok(Outcome {
        initial_house_count,
        surviving_houses,
        fraction_burned,
        history,
    })
}

fn check_dims(grid: &Grid, cfg: &Config) -> Result<()> {
    if (grid.width(), grid.height()) != (cfg.grid.width, cfg.grid.height) {
        bail!(
            "grid must be {}x{}, but is {}x{}",
            cfg.grid.width,
            cfg.grid.height,
            grid.width(),
            grid.height()
        );
    }
    Ok(())
}

/// Per-generation update rule with its distributions built once.
struct Transition {
    tree_immune_dist: Bernoulli,
    house_immune_dist: Bernoulli,
    lightning_dist: Bernoulli,
    // Absent when the western half of the grid has no column.
    strike_x_dist: Option<Uniform<usize>>,
    strike_y_dist: Uniform<usize>,
    time_to_burn: u32,
    spread: SpreadRule,
}

impl Transition {
    fn new(cfg: &Config) -> Result<Self> {
        cfg.validate().context("failed to validate config")?;

        let strike_x_dist = match cfg.grid.width / 2 {
            0 => None,
            n_col => Some(Uniform::new(0, n_col)?),
        };

        Ok(Self {
            tree_immune_dist: Bernoulli::new(cfg.model.prob_tree_immune)?,
            house_immune_dist: Bernoulli::new(cfg.model.prob_house_immune)?,
            lightning_dist: Bernoulli::new(cfg.model.prob_lightning)?,
            strike_x_dist,
            strike_y_dist: Uniform::new(0, cfg.grid.height)?,
            time_to_burn: cfg.model.time_to_burn,
            spread: cfg.model.spread,
        })
    }

    fn apply<R: Rng + ?Sized>(&self, prev: &Grid, rng: &mut R) -> Grid {
        let mut next = Grid::new(prev.width(), prev.height());

        // Every cell reads only from the previous generation.
        for x in 0..prev.width() {
            for y in 0..prev.height() {
                next.set(x, y, self.next_cell(prev, x, y, rng));
            }
        }

        self.strike_lightning(prev, &mut next, rng);

        next
    }

    fn next_cell<R: Rng + ?Sized>(&self, prev: &Grid, x: usize, y: usize, rng: &mut R) -> Cell {
        match prev.get(x, y) {
            Cell::Tree if self.exposed(prev, x, y) => {
                if self.tree_immune_dist.sample(rng) {
                    Cell::Tree
                } else {
                    Cell::Burning(0)
                }
            }
            Cell::House if self.exposed(prev, x, y) => {
                if self.house_immune_dist.sample(rng) {
                    Cell::House
                } else {
                    Cell::Burning(0)
                }
            }
            Cell::Burning(stage) if stage < self.time_to_burn => Cell::Burning(stage + 1),
            Cell::Burning(_) => Cell::Empty,
            cell => cell,
        }
    }

    fn exposed(&self, prev: &Grid, x: usize, y: usize) -> bool {
        match self.spread {
            SpreadRule::AnyStage => prev.neighbor_on_fire(x, y),
            SpreadRule::IgnitionOnly => prev.neighbors(x, y).any(|cell| cell == Cell::Burning(0)),
        }
    }

    fn strike_lightning<R: Rng + ?Sized>(&self, prev: &Grid, next: &mut Grid, rng: &mut R) {
        if !self.lightning_dist.sample(rng) {
            return;
        }
        let Some(strike_x_dist) = &self.strike_x_dist else {
            return;
        };

        let x = strike_x_dist.sample(rng);
        let y = self.strike_y_dist.sample(rng);
        if prev.get(x, y) == Cell::Tree {
            log::trace!("lightning ignited ({x}, {y})");
            next.set(x, y, Cell::Burning(0));
        }
    }
}
